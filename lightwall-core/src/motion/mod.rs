//! Stepper motion
//!
//! [`MotionState`] is the shared object the command path configures and
//! the actuation tick advances. The rate helpers convert host units into
//! tick intervals in the foreground so the tick only counts.

pub mod rate;
pub mod state;

pub use rate::{
    degrees_to_steps, interval_for_duration, interval_for_rpm, seek_delta, MAX_TICK_INTERVAL,
};
pub use state::{Drive, MotionState};
