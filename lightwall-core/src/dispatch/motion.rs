//! Stepper commands: `ROT`, `STP`, `POS`, `HALT`, `STAT`

use core::marker::PhantomData;

use lightwall_protocol::{Command, Direction, ErrorCode, Reply};

use super::{CommandHandler, MAX_DURATION_MS};
use crate::config::BoardProfile;
use crate::motion::{degrees_to_steps, interval_for_duration, interval_for_rpm, seek_delta};
use crate::scheduler::DeviceState;
use crate::sync::SharedState;

/// Highest accepted rotation rate; faster requests are clamped
pub const MAX_RPM: u32 = 100;

/// Highest accepted absolute angle
pub const MAX_DEGREES: u32 = 360;

/// Command handler for the prism board
pub struct MotionHandler<'a, S, const C: usize> {
    state: &'a S,
    profile: BoardProfile,
    _device: PhantomData<DeviceState<C>>,
}

impl<'a, S, const C: usize> MotionHandler<'a, S, C>
where
    S: SharedState<DeviceState<C>>,
{
    pub fn new(state: &'a S, profile: BoardProfile) -> Self {
        Self {
            state,
            profile,
            _device: PhantomData,
        }
    }

    /// Apply `f` unless a driver fault is latched
    fn unless_faulted<R>(
        &self,
        f: impl FnOnce(&mut DeviceState<C>) -> R,
    ) -> Result<R, ErrorCode> {
        self.state.with_mut(|device| {
            if device.motion.is_faulted() {
                Err(ErrorCode::Fault)
            } else {
                Ok(f(device))
            }
        })
    }

    fn rotate(&self, direction: Direction, rpm: u32) -> Result<Reply, ErrorCode> {
        if rpm == 0 {
            return Err(ErrorCode::OutOfRange);
        }
        let rpm = rpm.min(MAX_RPM);
        let interval = interval_for_rpm(self.profile.tick_hz, rpm, self.profile.steps_per_rev);

        self.unless_faulted(|device| device.motion.rotate(direction, interval))?;
        Ok(Reply::Rotate { direction, rpm })
    }

    fn step(&self, direction: Direction, steps: u32, duration_ms: u32) -> Result<Reply, ErrorCode> {
        let duration_ms = duration_ms.min(MAX_DURATION_MS);
        let interval = interval_for_duration(self.profile.tick_hz, duration_ms, steps);

        self.unless_faulted(|device| device.motion.step(direction, steps, interval))?;
        Ok(Reply::Step {
            direction,
            steps,
            duration_ms,
        })
    }

    fn position(
        &self,
        direction: Direction,
        degrees: u32,
        duration_ms: u32,
    ) -> Result<Reply, ErrorCode> {
        if degrees > MAX_DEGREES {
            return Err(ErrorCode::OutOfRange);
        }
        let duration_ms = duration_ms.min(MAX_DURATION_MS);
        let spr = self.profile.steps_per_rev;
        let target = degrees_to_steps(degrees, spr);
        let tick_hz = self.profile.tick_hz;

        let steps = self.unless_faulted(|device| {
            let delta = seek_delta(device.motion.position(), target, direction, spr);
            let interval = interval_for_duration(tick_hz, duration_ms, u32::from(delta));
            device.motion.seek(direction, delta, interval);
            delta
        })?;

        Ok(Reply::Position {
            direction,
            degrees,
            duration_ms,
            steps: u32::from(steps),
        })
    }
}

impl<'a, S, const C: usize> CommandHandler for MotionHandler<'a, S, C>
where
    S: SharedState<DeviceState<C>>,
{
    fn handle(&mut self, command: Command, _now_ms: u32) -> Reply {
        let result = match command {
            Command::Rotate { direction, rpm } => self.rotate(direction, rpm),
            Command::Step {
                direction,
                steps,
                duration_ms,
            } => self.step(direction, steps, duration_ms),
            Command::Position {
                direction,
                degrees,
                duration_ms,
            } => self.position(direction, degrees, duration_ms),
            Command::Halt => {
                self.state.with_mut(|device| device.motion.halt());
                Ok(Reply::Halted)
            }
            Command::Status => Ok(Reply::Status(self.state.with(|device| device.motion.report()))),
            _ => Err(ErrorCode::UnknownAction),
        };

        result.unwrap_or_else(Reply::Error)
    }
}
