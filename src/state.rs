use enum_ordinalize::Ordinalize;

/// Control phases of the intersection. The ordinal is the row of the state in
/// the transition table.
#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum State {
    GoSouth,
    WaitSouth,
    GoWest,
    WaitWest,
    GoPedestrians,
    WaitPedestriansPhase1Yellow,
    WaitPedestriansPhase1Off,
    WaitPedestriansPhase2Yellow,
    WaitPedestriansPhase2Off,
}

/// The only way out of `GoPedestrians`, in order.
pub const CLEARING_SEQUENCE: [State; 4] = [
    State::WaitPedestriansPhase1Yellow,
    State::WaitPedestriansPhase1Off,
    State::WaitPedestriansPhase2Yellow,
    State::WaitPedestriansPhase2Off,
];

impl State {
    pub const INITIAL: State = State::GoSouth;

    pub fn is_clearing(&self) -> bool {
        match self {
            State::WaitPedestriansPhase1Yellow
            | State::WaitPedestriansPhase1Off
            | State::WaitPedestriansPhase2Yellow
            | State::WaitPedestriansPhase2Off => true,
            State::GoSouth
            | State::WaitSouth
            | State::GoWest
            | State::WaitWest
            | State::GoPedestrians => false,
        }
    }

    /// States in which some car stream has a green.
    pub fn is_car_green(&self) -> bool {
        matches!(self, State::GoSouth | State::GoWest)
    }
}
