/*
 * The signals exchanged between the controller and the hardware.
 *
 * On the input side there are three sensors: the east/west car detector, the
 * north/south car detector and the pedestrian button. A snapshot of all three
 * is an `Input`, which is one of exactly eight values. Transition rows are
 * arrays indexed by that value, so the compiler makes sure every row answers
 * every combination.
 *
 * On the output side there are eight lamps: three per car direction and two
 * pedestrian signals. An `OutputPattern` says which lamps are lit. It does not
 * know about wiring; `levels()` maps the logical pattern onto pin levels,
 * taking care of lamps that are wired active-low.
 */

use core::fmt;
use enum_ordinalize::Ordinalize;

/// Sensor snapshot. Bit 0 is the east/west car detector, bit 1 the
/// north/south car detector and bit 2 the pedestrian request.
#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Input {
    Idle,
    West,
    South,
    WestSouth,
    Pedestrian,
    PedestrianWest,
    PedestrianSouth,
    PedestrianWestSouth,
}

const WEST_BIT: u8 = 0b001;
const SOUTH_BIT: u8 = 0b010;
const PEDESTRIAN_BIT: u8 = 0b100;

impl Input {
    /// Anything above the low three bits is not a sensor and is ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & (WEST_BIT | SOUTH_BIT | PEDESTRIAN_BIT) {
            0 => Input::Idle,
            1 => Input::West,
            2 => Input::South,
            3 => Input::WestSouth,
            4 => Input::Pedestrian,
            5 => Input::PedestrianWest,
            6 => Input::PedestrianSouth,
            _ => Input::PedestrianWestSouth,
        }
    }

    pub const fn from_sensors(west: bool, south: bool, pedestrian: bool) -> Self {
        let mut bits = 0;
        if west {
            bits |= WEST_BIT;
        }
        if south {
            bits |= SOUTH_BIT;
        }
        if pedestrian {
            bits |= PEDESTRIAN_BIT;
        }
        Self::from_bits(bits)
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn west(self) -> bool {
        self.bits() & WEST_BIT != 0
    }

    pub const fn south(self) -> bool {
        self.bits() & SOUTH_BIT != 0
    }

    pub const fn pedestrian(self) -> bool {
        self.bits() & PEDESTRIAN_BIT != 0
    }
}

#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Lamp {
    // North/south lane.
    SouthGreen,
    SouthYellow,
    SouthRed,

    // East/west lane.
    WestGreen,
    WestYellow,
    WestRed,

    // Pedestrian crossing.
    DontWalk,
    Walk,
}

/// The set of lamps that are lit, one bit per `Lamp` ordinal.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputPattern(u8);

impl OutputPattern {
    /// Every lamp dark.
    pub const EMPTY: OutputPattern = OutputPattern(0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with(self, lamp: Lamp) -> Self {
        OutputPattern(self.0 | 1 << (lamp as u32))
    }

    pub const fn is_lit(self, lamp: Lamp) -> bool {
        self.0 & 1 << (lamp as u32) != 0
    }

    /*
     * A pattern is unsafe when it could invite two streams of traffic into the
     * junction at the same time, or when it tells one stream two different
     * things. Yellow is a "stop if you can" and is never considered to
     * conflict with the cross direction's red.
     */
    pub const fn conflicts(self) -> bool {
        let south_green = self.is_lit(Lamp::SouthGreen);
        let west_green = self.is_lit(Lamp::WestGreen);
        let walk = self.is_lit(Lamp::Walk);

        (south_green && west_green)
            || (south_green && self.is_lit(Lamp::SouthRed))
            || (west_green && self.is_lit(Lamp::WestRed))
            || (walk && (south_green || west_green))
            || (walk && self.is_lit(Lamp::DontWalk))
    }

    pub const fn is_safe(self) -> bool {
        !self.conflicts()
    }

    /// Pin levels for this pattern, `true` meaning high. Lamps flagged in
    /// `active_lows` are lit by driving their pin low.
    pub fn levels(
        self,
        active_lows: &[bool; Lamp::VARIANT_COUNT],
    ) -> [bool; Lamp::VARIANT_COUNT] {
        let mut levels = [false; Lamp::VARIANT_COUNT];
        for lamp in Lamp::VARIANTS.iter().copied() {
            let i = lamp.ordinal();
            levels[i] = self.is_lit(lamp) != active_lows[i];
        }
        levels
    }
}

impl fmt::Debug for OutputPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputPattern({:#010b})", self.0)
    }
}
