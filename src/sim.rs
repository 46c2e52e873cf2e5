//! A simulated intersection for running the controller off-target.
//!
//! Sensor snapshots come from a script queued up front; every primitive the
//! controller calls is appended to an event log which tests can inspect. Once
//! the script runs dry the next read fails with [`SimError::InputsExhausted`],
//! which is how a simulation of the never-ending controller loop is stopped.
//! Faults can also be injected on a chosen read or write.

use core::fmt;

use embassy_time::Duration;
use heapless::{Deque, Vec};

use crate::hal::TrafficHal;
use crate::signals::{Input, OutputPattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Output(OutputPattern),
    Delay(Duration),
    Sample(Input),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimError {
    InputsExhausted,
    InputQueueFull,
    EventLogFull,
    InjectedFault,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InputsExhausted => f.write_str("no scripted input left"),
            SimError::InputQueueFull => f.write_str("input script is longer than the queue"),
            SimError::EventLogFull => f.write_str("event log is full"),
            SimError::InjectedFault => f.write_str("injected fault"),
        }
    }
}

pub struct SimulatedHal<const N: usize> {
    inputs: Deque<Input, N>,
    events: Vec<Event, N>,
    overflowed: bool,
    reads: usize,
    writes: usize,
    fail_read_at: Option<usize>,
    fail_write_at: Option<usize>,
}

impl<const N: usize> SimulatedHal<N> {
    pub const fn new() -> Self {
        SimulatedHal {
            inputs: Deque::new(),
            events: Vec::new(),
            overflowed: false,
            reads: 0,
            writes: 0,
            fail_read_at: None,
            fail_write_at: None,
        }
    }

    pub fn with_inputs(inputs: &[Input]) -> Result<Self, SimError> {
        let mut hal = Self::new();
        for input in inputs {
            hal.push_input(*input)?;
        }
        Ok(hal)
    }

    pub fn push_input(&mut self, input: Input) -> Result<(), SimError> {
        self.inputs
            .push_back(input)
            .map_err(|_| SimError::InputQueueFull)
    }

    /// Make the read with index `n` (counting from zero) fail.
    pub fn fail_read_at(mut self, n: usize) -> Self {
        self.fail_read_at = Some(n);
        self
    }

    /// Make the write with index `n` (counting from zero) fail.
    pub fn fail_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn outputs(&self) -> impl Iterator<Item = OutputPattern> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Output(pattern) => Some(*pattern),
            _ => None,
        })
    }

    pub fn samples(&self) -> impl Iterator<Item = Input> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Sample(input) => Some(*input),
            _ => None,
        })
    }

    pub fn last_output(&self) -> Option<OutputPattern> {
        self.outputs().last()
    }

    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    fn record(&mut self, event: Event) -> Result<(), SimError> {
        if self.overflowed {
            return Err(SimError::EventLogFull);
        }
        self.events.push(event).map_err(|_| {
            self.overflowed = true;
            SimError::EventLogFull
        })
    }
}

impl<const N: usize> Default for SimulatedHal<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrafficHal for SimulatedHal<N> {
    type Error = SimError;

    async fn read_inputs(&mut self) -> Result<Input, SimError> {
        let n = self.reads;
        self.reads += 1;
        if self.fail_read_at == Some(n) {
            return Err(SimError::InjectedFault);
        }

        let input = self.inputs.pop_front().ok_or(SimError::InputsExhausted)?;
        self.record(Event::Sample(input))?;
        Ok(input)
    }

    async fn apply_output(&mut self, pattern: OutputPattern) -> Result<(), SimError> {
        let n = self.writes;
        self.writes += 1;
        if self.fail_write_at == Some(n) {
            return Err(SimError::InjectedFault);
        }

        self.record(Event::Output(pattern))
    }

    // A delay cannot fail, so an overflow here surfaces on the next read or
    // write instead.
    async fn delay(&mut self, duration: Duration) {
        if let Err(error) = self.record(Event::Delay(duration)) {
            debug_assert_eq!(error, SimError::EventLogFull);
        }
    }
}
