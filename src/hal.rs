/*
 * The hardware seen by the controller: three primitives and nothing else.
 *
 * Implementations own the pins. The controller owns the implementation, so the
 * lamp outputs have exactly one writer. A task running next to the controller
 * may feed the input side (the firmware's pedestrian button task does) but must
 * never drive a lamp itself.
 */

use embassy_time::Duration;

use crate::signals::{Input, OutputPattern};

#[allow(async_fn_in_trait)]
pub trait TrafficHal {
    type Error;

    /// A fresh snapshot of the car detectors and the pedestrian request.
    async fn read_inputs(&mut self) -> Result<Input, Self::Error>;

    /// Set every lamp at once. Lamps not lit in `pattern` go dark.
    async fn apply_output(&mut self, pattern: OutputPattern) -> Result<(), Self::Error>;

    /// Wait for roughly `duration`. Precision is not guaranteed.
    async fn delay(&mut self, duration: Duration);
}

impl<H: TrafficHal> TrafficHal for &mut H {
    type Error = H::Error;

    async fn read_inputs(&mut self) -> Result<Input, Self::Error> {
        (**self).read_inputs().await
    }

    async fn apply_output(&mut self, pattern: OutputPattern) -> Result<(), Self::Error> {
        (**self).apply_output(pattern).await
    }

    async fn delay(&mut self, duration: Duration) {
        (**self).delay(duration).await
    }
}
