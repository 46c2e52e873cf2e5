//! The transition table of the intersection.
//!
//! One row per [`State`], in ordinal order. A row names the output action the
//! state shows, how long it is held before the sensors are sampled again, and
//! the next state for each of the eight possible [`Input`] snapshots. The table
//! is const data; the controller only ever moves a cursor over it.

use core::fmt;

use embassy_time::Duration;
use enum_ordinalize::Ordinalize;

use crate::action::Action;
use crate::signals::{Input, OutputPattern};
use crate::state::State;
use crate::state::State::{
    GoPedestrians, GoSouth, GoWest, WaitPedestriansPhase1Off, WaitPedestriansPhase1Yellow,
    WaitPedestriansPhase2Off, WaitPedestriansPhase2Yellow, WaitSouth, WaitWest,
};

/// Hold time of the ordinary car and walk phases.
pub const LONG_HOLD: Duration = Duration::from_millis(500);
/// Hold time of each step of the pedestrian clearing sequence.
pub const SHORT_HOLD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub state: State,
    pub action: Action,
    pub hold: Duration,
    pub next: [State; Input::VARIANT_COUNT],
}

pub struct Table {
    entries: [Entry; State::VARIANT_COUNT],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// The row at `slot` describes `state`, so lookups by state go wrong.
    MisplacedEntry { slot: usize, state: State },
    UnsafeOutput { state: State, pattern: OutputPattern },
    ZeroHold { state: State },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MisplacedEntry { slot, state } => {
                write!(f, "row {slot} holds the entry for {state:?}")
            }
            TableError::UnsafeOutput { state, pattern } => {
                write!(f, "{state:?} shows conflicting lamps {pattern:?}")
            }
            TableError::ZeroHold { state } => write!(f, "{state:?} has no hold time"),
        }
    }
}

impl Table {
    pub const fn new(entries: [Entry; State::VARIANT_COUNT]) -> Self {
        Table { entries }
    }

    pub fn entry(&self, state: State) -> &Entry {
        &self.entries[state.ordinal()]
    }

    pub fn next(&self, state: State, input: Input) -> State {
        self.entry(state).next[input.ordinal()]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /*
     * Every (state, input) pair has a next state by construction: the rows
     * are arrays of `State` indexed by `Input`. What the types cannot check is
     * that each row sits in its own state's slot and that what the row shows
     * is safe to show, so that is checked once at startup.
     */
    pub fn verify(&self) -> Result<(), TableError> {
        for (slot, entry) in self.entries.iter().enumerate() {
            if entry.state.ordinal() != slot {
                return Err(TableError::MisplacedEntry {
                    slot,
                    state: entry.state,
                });
            }

            check_pattern(entry.state, entry.action.pattern())?;

            if entry.hold == Duration::from_ticks(0) {
                return Err(TableError::ZeroHold { state: entry.state });
            }
        }
        Ok(())
    }
}

// Every `Action` is safe today; this keeps an edit to `Action::pattern` from
// reaching the lamps unnoticed.
fn check_pattern(state: State, pattern: OutputPattern) -> Result<(), TableError> {
    if pattern.conflicts() {
        return Err(TableError::UnsafeOutput { state, pattern });
    }
    Ok(())
}

const fn entry(
    state: State,
    action: Action,
    hold: Duration,
    next: [State; Input::VARIANT_COUNT],
) -> Entry {
    Entry {
        state,
        action,
        hold,
        next,
    }
}

// Columns: Idle, West, South, WestSouth, Pedestrian, PedestrianWest,
// PedestrianSouth, PedestrianWestSouth.
#[rustfmt::skip]
pub static INTERSECTION: Table = Table::new([
    entry(GoSouth, Action::SouthGreen, LONG_HOLD,
        [GoSouth, WaitSouth, GoSouth, WaitSouth, WaitSouth, WaitSouth, WaitSouth, WaitSouth]),
    entry(WaitSouth, Action::SouthYellow, LONG_HOLD,
        [GoWest, GoWest, GoWest, GoWest, GoPedestrians, GoWest, GoPedestrians, GoWest]),
    entry(GoWest, Action::WestGreen, LONG_HOLD,
        [GoWest, GoWest, WaitWest, WaitWest, WaitWest, WaitWest, WaitWest, WaitWest]),
    entry(WaitWest, Action::WestYellow, LONG_HOLD,
        [GoPedestrians, GoPedestrians, GoSouth, GoSouth, GoPedestrians, GoPedestrians, GoPedestrians, GoPedestrians]),
    entry(GoPedestrians, Action::Walk, LONG_HOLD,
        [GoPedestrians, WaitPedestriansPhase1Yellow, WaitPedestriansPhase1Yellow, WaitPedestriansPhase1Yellow,
         GoPedestrians, WaitPedestriansPhase1Yellow, WaitPedestriansPhase1Yellow, WaitPedestriansPhase1Yellow]),
    entry(WaitPedestriansPhase1Yellow, Action::WalkOff, SHORT_HOLD,
        [WaitPedestriansPhase1Off; Input::VARIANT_COUNT]),
    entry(WaitPedestriansPhase1Off, Action::Walk, SHORT_HOLD,
        [WaitPedestriansPhase2Yellow; Input::VARIANT_COUNT]),
    entry(WaitPedestriansPhase2Yellow, Action::WalkOff, SHORT_HOLD,
        [WaitPedestriansPhase2Off; Input::VARIANT_COUNT]),
    entry(WaitPedestriansPhase2Off, Action::Walk, SHORT_HOLD,
        [GoSouth, GoSouth, GoSouth, GoWest, GoSouth, GoSouth, GoSouth, GoSouth]),
]);
