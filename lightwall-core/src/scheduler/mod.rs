//! Actuation scheduler
//!
//! Runs once per timer tick and drives every output of a board from the
//! shared [`DeviceState`].

pub mod actuation;

pub use actuation::{ActuationScheduler, DeviceState, TickEvent};
