#![no_std]
#![no_main]

use crossing_fsm::{Controller, INTERSECTION, OutputPattern, TrafficHal};
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_halt as _};

mod io;
use io::{Board, DEBOUNCE, pedestrian_button_task};

// A signal that cannot be trusted must stop rather than carry on.
fn halt() -> ! {
    panic!("intersection controller halted");
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());
    defmt::info!("intersection controller starting...");

    let (mut board, button) = Board::new(peripherals);

    // Nothing is lit until the table has been checked.
    if let Err(error) = board.apply_output(OutputPattern::EMPTY).await {
        defmt::error!("cannot blank the lamps: {}", error);
        halt();
    }

    let mut controller = match Controller::new(board, &INTERSECTION) {
        Ok(controller) => controller,
        Err(error) => {
            defmt::error!("transition table rejected: {}", error);
            halt();
        }
    };

    spawner
        .spawn(pedestrian_button_task(button, DEBOUNCE))
        .unwrap();

    defmt::info!("entering control loop in {}", controller.state());

    let Err(fault) = controller.run().await;
    defmt::error!("{}", fault);
    halt();
}
