/*
 * The controller walks the transition table forever.
 *
 * Every cycle is the same four steps, always in this order: show the current
 * state's lamps, hold them for the state's duration, sample the sensors, move
 * to the state the table selects for that sample. The lamps are therefore
 * stable for the whole hold before anything is decided.
 *
 * There is no recovery from a hardware fault. A lamp bank that cannot be
 * written, or sensors that cannot be read, stop the controller where it is.
 */

use core::convert::Infallible;
use core::fmt;

use crate::hal::TrafficHal;
use crate::signals::Input;
use crate::state::State;
use crate::table::{Table, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault<E> {
    Read(E),
    Write(E),
}

impl<E: fmt::Debug> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Read(e) => write!(f, "reading the sensors failed: {e:?}"),
            Fault::Write(e) => write!(f, "writing the lamps failed: {e:?}"),
        }
    }
}

/// One completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub from: State,
    pub input: Input,
    pub to: State,
}

pub struct Controller<H> {
    hal: H,
    table: &'static Table,
    state: State,
}

impl<H: TrafficHal> Controller<H> {
    /// Refuses a table that fails [`Table::verify`].
    pub fn new(hal: H, table: &'static Table) -> Result<Self, TableError> {
        table.verify()?;

        Ok(Controller {
            hal,
            table,
            state: State::INITIAL,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    pub fn into_hal(self) -> H {
        self.hal
    }

    /// Run one cycle. On a fault the state is left unchanged.
    pub async fn step(&mut self) -> Result<Step, Fault<H::Error>> {
        let table = self.table;
        let entry = table.entry(self.state);

        self.hal
            .apply_output(entry.action.pattern())
            .await
            .map_err(Fault::Write)?;
        self.hal.delay(entry.hold).await;
        let input = self.hal.read_inputs().await.map_err(Fault::Read)?;

        let step = Step {
            from: self.state,
            input,
            to: table.next(self.state, input),
        };
        self.state = step.to;

        #[cfg(feature = "defmt")]
        defmt::debug!("{} --{}--> {}", step.from, step.input, step.to);

        Ok(step)
    }

    /// Cycle until the hardware fails, which is the only way this returns.
    pub async fn run(&mut self) -> Result<Infallible, Fault<H::Error>> {
        loop {
            self.step().await?;
        }
    }
}
