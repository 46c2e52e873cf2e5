/*
 * Pins of the DESPI-M02 board as seen by the intersection controller.
 *
 * `Board` is the firmware's `TrafficHal`: it maps the eight logical lamps onto
 * the board's two light legs plus two pedestrian outputs, turns the two car
 * detectors into snapshot bits, and waits on the embassy timer. Everything
 * that knows about STM32 pins lives here; `main.rs` only wires it up.
 *
 * The lamps and the car detectors are plain GPIO owned by `Board`, which the
 * controller owns in turn. The pedestrian button is different: a press is
 * short, much shorter than a hold, and would be missed by a sampling loop. A
 * separate task watches the button and latches a request, which the board
 * reports in every snapshot until the walk lamp has been shown.
 */

use core::sync::atomic::{AtomicBool, Ordering};

use crossing_fsm::{Input, Lamp, OutputPattern, TrafficHal};
use embassy_futures::select::{Either, select};
use embassy_stm32::{
    exti::{Channel, ExtiInput},
    gpio::{Input as InputPin, Level, Output, Pin, Pull, Speed},
};
use embassy_time::{Duration, Timer};
use enum_ordinalize::Ordinalize;

/// Lamps lit by driving the pin low, by `Lamp` ordinal.
const ACTIVE_LOWS: [bool; Lamp::VARIANT_COUNT] = [false; Lamp::VARIANT_COUNT];

/// Contacts must be quiet this long before a press counts.
pub const DEBOUNCE: Duration = Duration::from_millis(20);

static PEDESTRIAN_REQUEST: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BoardError {
    /// The output data register of this lamp does not hold the level just
    /// written. This checks the register write only; a blown lamp or a pin
    /// shorted outside the chip is not detected.
    OutputRegister(Lamp),
}

pub struct Board {
    lamps: [Output<'static>; Lamp::VARIANT_COUNT],
    west_detector: InputPin<'static>,
    south_detector: InputPin<'static>,
}

impl Board {
    /*
     * South is the board's leg A and west its leg B. Every lamp starts dark;
     * the car detectors are active-high with pull-downs, the on-board button
     * is active-low.
     */
    pub fn new(p: embassy_stm32::Peripherals) -> (Self, ExtiInput<'static>) {
        // In `Lamp` ordinal order.
        let lamps: [Output; Lamp::VARIANT_COUNT] = [
            Output::new(p.PB7.degrade(), Level::Low, Speed::Low),
            Output::new(p.PB9.degrade(), Level::Low, Speed::Low),
            Output::new(p.PE1.degrade(), Level::Low, Speed::Low),
            Output::new(p.PE0.degrade(), Level::Low, Speed::Low),
            Output::new(p.PB8.degrade(), Level::Low, Speed::Low),
            Output::new(p.PB6.degrade(), Level::Low, Speed::Low),
            Output::new(p.PC6.degrade(), Level::Low, Speed::Low),
            Output::new(p.PC7.degrade(), Level::Low, Speed::Low),
        ];

        let board = Board {
            lamps,
            west_detector: InputPin::new(p.PA0.degrade(), Pull::Down),
            south_detector: InputPin::new(p.PA1.degrade(), Pull::Down),
        };

        let button = ExtiInput::new(p.PE11.degrade(), p.EXTI11.degrade(), Pull::Up);

        (board, button)
    }
}

impl TrafficHal for Board {
    type Error = BoardError;

    async fn read_inputs(&mut self) -> Result<Input, BoardError> {
        Ok(Input::from_sensors(
            self.west_detector.is_high(),
            self.south_detector.is_high(),
            PEDESTRIAN_REQUEST.load(Ordering::Relaxed),
        ))
    }

    async fn apply_output(&mut self, pattern: OutputPattern) -> Result<(), BoardError> {
        let levels = pattern.levels(&ACTIVE_LOWS);
        for (output, high) in self.lamps.iter_mut().zip(levels) {
            output.set_level(if high { Level::High } else { Level::Low });
        }

        // Output data register sanity check, not a lamp fault detector.
        for lamp in Lamp::VARIANTS.iter().copied() {
            if self.lamps[lamp.ordinal()].is_set_high() != levels[lamp.ordinal()] {
                return Err(BoardError::OutputRegister(lamp));
            }
        }

        // The request has been served.
        if pattern.is_lit(Lamp::Walk) {
            PEDESTRIAN_REQUEST.store(false, Ordering::Relaxed);
        }

        Ok(())
    }

    async fn delay(&mut self, duration: Duration) {
        Timer::after(duration).await;
    }
}

// A press is only latched once the contacts have been quiet for `debounce`
// and the button is still down. Bounces during the window restart it.
#[embassy_executor::task]
pub async fn pedestrian_button_task(mut button: ExtiInput<'static>, debounce: Duration) -> ! {
    loop {
        button.wait_for_falling_edge().await;

        'debounce_loop: loop {
            match select(button.wait_for_any_edge(), Timer::after(debounce)).await {
                Either::First(_) => {}
                Either::Second(_) => break 'debounce_loop,
            }
        }

        if button.is_low() {
            defmt::info!("pedestrian request latched");
            PEDESTRIAN_REQUEST.store(true, Ordering::Relaxed);
        }
    }
}
