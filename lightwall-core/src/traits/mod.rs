//! Hardware abstraction traits
//!
//! These traits are the seam between the actuation core and the pin
//! drivers. Board modules bind concrete pins at compile time.

pub mod outputs;

pub use outputs::{ChannelOutputs, FogOutput, MotorOutput, NoChannels, NoMotor};
