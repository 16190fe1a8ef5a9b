//! Hardware driver implementations
//!
//! Concrete implementations of the output traits defined in
//! lightwall-core, built on the pin traits of lightwall-hal:
//!
//! - Software PWM channel bank over GPIO outputs
//! - Step/direction stepper driver with enable and fault lines
//! - Fog relay output
//! - RD-03D target decoding and the IR distance ranger

#![no_std]
#![deny(unsafe_code)]

pub mod fog;
pub mod pwm;
pub mod sensor;
pub mod stepper;

pub use fog::GpioFogOutput;
pub use pwm::GpioChannelBank;
pub use sensor::{IrDistanceSensor, Rd03d};
pub use stepper::{GpioStepper, StepperPolarity};
