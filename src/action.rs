/*
 * Output actions. Each action lights a fixed set of lamps, so the whole
 * intersection is described by one `OutputPattern` per action. Whatever the
 * action, every lamp not named in its pattern is dark.
 *
 * During the pedestrian clearing sequence the walk lamp alternates between
 * `Walk` and `WalkOff`, with both car directions held on red throughout.
 */

use crate::signals::{Lamp, OutputPattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    SouthGreen,
    SouthYellow,
    WestGreen,
    WestYellow,
    Walk,
    WalkOff,
}

const CARS_RED: OutputPattern = OutputPattern::EMPTY
    .with(Lamp::SouthRed)
    .with(Lamp::WestRed);

impl Action {
    pub const fn pattern(self) -> OutputPattern {
        match self {
            Action::SouthGreen => OutputPattern::EMPTY
                .with(Lamp::SouthGreen)
                .with(Lamp::WestRed)
                .with(Lamp::DontWalk),
            Action::SouthYellow => OutputPattern::EMPTY
                .with(Lamp::SouthYellow)
                .with(Lamp::WestRed)
                .with(Lamp::DontWalk),
            Action::WestGreen => OutputPattern::EMPTY
                .with(Lamp::WestGreen)
                .with(Lamp::SouthRed)
                .with(Lamp::DontWalk),
            Action::WestYellow => OutputPattern::EMPTY
                .with(Lamp::WestYellow)
                .with(Lamp::SouthRed)
                .with(Lamp::DontWalk),
            Action::Walk => CARS_RED.with(Lamp::Walk),
            Action::WalkOff => CARS_RED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Action; 6] = [
        Action::SouthGreen,
        Action::SouthYellow,
        Action::WestGreen,
        Action::WestYellow,
        Action::Walk,
        Action::WalkOff,
    ];

    #[test]
    fn every_action_is_safe() {
        for action in ALL {
            assert!(action.pattern().is_safe(), "{action:?}");
        }
    }

    #[test]
    fn one_lamp_per_car_direction() {
        let south = [Lamp::SouthGreen, Lamp::SouthYellow, Lamp::SouthRed];
        let west = [Lamp::WestGreen, Lamp::WestYellow, Lamp::WestRed];
        for action in ALL {
            let pattern = action.pattern();
            assert_eq!(south.iter().filter(|l| pattern.is_lit(**l)).count(), 1);
            assert_eq!(west.iter().filter(|l| pattern.is_lit(**l)).count(), 1);
        }
    }

    #[test]
    fn walk_off_only_darkens_the_pedestrian_signals() {
        let walk = Action::Walk.pattern();
        let off = Action::WalkOff.pattern();
        assert!(walk.is_lit(Lamp::Walk));
        assert!(!off.is_lit(Lamp::Walk));
        assert!(!off.is_lit(Lamp::DontWalk));
        assert_eq!(walk.bits() & !(1 << Lamp::Walk as u32), off.bits());
    }

    #[test]
    fn car_phases_show_dont_walk() {
        for action in &ALL[..4] {
            assert!(action.pattern().is_lit(Lamp::DontWalk));
        }
    }
}
