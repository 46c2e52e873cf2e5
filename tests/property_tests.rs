//! Safety properties of the intersection table, checked exhaustively where the
//! space is small and with proptest over random sensor histories otherwise.

use crossing_fsm::sim::{Event, SimulatedHal};
use crossing_fsm::state::CLEARING_SEQUENCE;
use crossing_fsm::{Controller, INTERSECTION, Input, Lamp, State};
use embassy_futures::block_on;
use enum_ordinalize::Ordinalize;
use proptest::prelude::*;

const MAX_STEPS: usize = 64;

type TraceHal = SimulatedHal<{ 3 * MAX_STEPS + 8 }>;

prop_compose! {
    fn arbitrary_input()(bits in 0..8u8) -> Input {
        Input::from_bits(bits)
    }
}

fn arbitrary_state() -> impl Strategy<Value = State> {
    (0..State::VARIANT_COUNT).prop_map(|ordinal| State::VARIANTS[ordinal])
}

/// Runs the controller over `inputs` and returns every state it was in,
/// starting with the initial one.
fn trace(inputs: &[Input]) -> (Vec<State>, TraceHal) {
    let hal = TraceHal::with_inputs(inputs).unwrap();
    let mut controller = Controller::new(hal, &INTERSECTION).unwrap();

    let mut states = vec![controller.state()];
    for _ in inputs {
        states.push(block_on(controller.step()).unwrap().to);
    }
    (states, controller.into_hal())
}

#[test]
fn table_is_total_and_stays_in_range() {
    for state in State::VARIANTS.iter().copied() {
        for bits in 0..8u8 {
            let next = INTERSECTION.next(state, Input::from_bits(bits));
            assert!(State::VARIANTS.contains(&next));
        }
    }
}

#[test]
fn every_state_is_reachable_from_go_south() {
    let mut seen = [false; State::VARIANT_COUNT];
    let mut frontier = vec![State::INITIAL];
    seen[State::INITIAL.ordinal()] = true;

    while let Some(state) = frontier.pop() {
        for input in Input::VARIANTS.iter().copied() {
            let next = INTERSECTION.next(state, input);
            if !seen[next.ordinal()] {
                seen[next.ordinal()] = true;
                frontier.push(next);
            }
        }
    }

    assert!(seen.iter().all(|s| *s));
}

#[test]
fn no_state_shows_conflicting_lamps() {
    for entry in INTERSECTION.entries() {
        let pattern = entry.action.pattern();
        assert!(
            !(pattern.is_lit(Lamp::SouthGreen) && pattern.is_lit(Lamp::WestGreen)),
            "{:?}",
            entry.state
        );
        assert!(
            !(pattern.is_lit(Lamp::SouthGreen) && pattern.is_lit(Lamp::SouthRed)),
            "{:?}",
            entry.state
        );
        assert!(
            !(pattern.is_lit(Lamp::WestGreen) && pattern.is_lit(Lamp::WestRed)),
            "{:?}",
            entry.state
        );
    }
}

#[test]
fn go_pedestrians_only_leaves_into_the_clearing_sequence() {
    for input in Input::VARIANTS.iter().copied() {
        let next = INTERSECTION.next(State::GoPedestrians, input);
        assert!(
            next == State::GoPedestrians || next == CLEARING_SEQUENCE[0],
            "{input:?} -> {next:?}"
        );
    }
    for pair in CLEARING_SEQUENCE.windows(2) {
        for input in Input::VARIANTS.iter().copied() {
            assert_eq!(INTERSECTION.next(pair[0], input), pair[1]);
        }
    }
}

proptest! {
    #[test]
    fn next_state_is_deterministic(state in arbitrary_state(), input in arbitrary_input()) {
        prop_assert_eq!(INTERSECTION.next(state, input), INTERSECTION.next(state, input));
    }

    #[test]
    fn walk_is_always_cleared_in_four_steps(
        inputs in prop::collection::vec(arbitrary_input(), 1..MAX_STEPS)
    ) {
        let (states, _) = trace(&inputs);

        for (i, pair) in states.windows(2).enumerate() {
            if pair[0] == State::GoPedestrians && pair[1] != State::GoPedestrians {
                let clearing = &states[i + 1..states.len().min(i + 5)];
                prop_assert_eq!(clearing, &CLEARING_SEQUENCE[..clearing.len()]);
            }
            if pair[1].is_car_green() {
                prop_assert!(pair[0] != State::GoPedestrians);
            }
        }
    }

    #[test]
    fn cycles_are_write_hold_sample(
        inputs in prop::collection::vec(arbitrary_input(), 1..MAX_STEPS)
    ) {
        let (states, hal) = trace(&inputs);
        let events = hal.events();

        prop_assert_eq!(events.len(), 3 * inputs.len());
        for ((cycle, state), input) in events.chunks(3).zip(&states).zip(&inputs) {
            let entry = INTERSECTION.entry(*state);
            prop_assert_eq!(cycle[0], Event::Output(entry.action.pattern()));
            prop_assert_eq!(cycle[1], Event::Delay(entry.hold));
            prop_assert_eq!(cycle[2], Event::Sample(*input));
        }
    }

    #[test]
    fn every_pattern_written_is_safe(
        inputs in prop::collection::vec(arbitrary_input(), 1..MAX_STEPS)
    ) {
        let (_, hal) = trace(&inputs);
        for pattern in hal.outputs() {
            prop_assert!(pattern.is_safe(), "{:?}", pattern);
        }
    }
}
