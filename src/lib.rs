//! Table-driven controller for a four-way intersection with a pedestrian
//! crossing.
//!
//! # Overview
//!
//! The controller is a Moore machine. Each [`State`](state::State) shows a
//! fixed lamp pattern, holds it for a fixed time and then picks its successor
//! from the 3-bit sensor snapshot (east/west car, north/south car, pedestrian
//! request). The whole policy lives in one const table,
//! [`INTERSECTION`](table::INTERSECTION).
//!
//! The hardware is reached through the [`TrafficHal`](hal::TrafficHal) trait
//! only: read the sensors, write the lamps, wait. The firmware binary
//! implements it on STM32 GPIO; [`sim`] implements it for tests.
//!
//! # Module Organization
//!
//! - [`signals`] - sensor snapshots, lamps and output patterns
//! - [`state`] - the control phases
//! - [`action`] - the lamp pattern shown by each phase
//! - [`table`] - the transition table and its startup check
//! - [`hal`] - the hardware seen by the controller
//! - [`controller`] - the never-ending control loop
//! - [`sim`] - a scripted, recording hardware stand-in

#![cfg_attr(not(test), no_std)]

pub mod action;
pub mod controller;
pub mod hal;
pub mod signals;
pub mod sim;
pub mod state;
pub mod table;

pub use controller::{Controller, Fault, Step};
pub use hal::TrafficHal;
pub use signals::{Input, Lamp, OutputPattern};
pub use state::State;
pub use table::{INTERSECTION, Table, TableError};
