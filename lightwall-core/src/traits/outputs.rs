//! Output traits driven from the actuation tick
//!
//! Implementations must be cheap: they run at the tick rate inside the
//! timer context and must never block.

use lightwall_protocol::Direction;

/// A bank of software-PWM outputs
pub trait ChannelOutputs {
    /// Number of channels in the bank
    fn channel_count(&self) -> usize;

    /// Drive one channel to an electrical level
    ///
    /// `high` is the pin level; polarity is already applied.
    fn write_channel(&mut self, channel: usize, high: bool);
}

/// Step/direction stepper driver
pub trait MotorOutput {
    /// Set the direction line and raise the step line
    fn begin_step(&mut self, direction: Direction);

    /// Release the step line
    fn end_step(&mut self);

    /// Enable or disable the driver output stage
    fn set_enabled(&mut self, enabled: bool);

    /// Check if the driver reports a fault
    fn fault_asserted(&mut self) -> bool;
}

/// One-shot fog trigger output
pub trait FogOutput {
    /// Turn the fog output on or off
    fn set_active(&mut self, active: bool);

    /// Check if the fog output is currently on
    fn is_active(&self) -> bool;
}

/// Channel bank for boards without PWM outputs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChannels;

impl ChannelOutputs for NoChannels {
    fn channel_count(&self) -> usize {
        0
    }

    fn write_channel(&mut self, _channel: usize, _high: bool) {}
}

/// Motor driver for boards without a stepper
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMotor;

impl MotorOutput for NoMotor {
    fn begin_step(&mut self, _direction: Direction) {}

    fn end_step(&mut self) {}

    fn set_enabled(&mut self, _enabled: bool) {}

    fn fault_asserted(&mut self) -> bool {
        false
    }
}
