//! Per-tick actuation
//!
//! One call to [`ActuationScheduler::tick`] per timer period:
//!
//! 1. Release a step line raised on the previous tick
//! 2. Sample the driver fault input
//! 3. Under one critical section: apply the fault, advance motion, and on
//!    every millisecond boundary advance fades and blinks; copy out duties
//! 4. Outside the lock: enable or disable the driver, raise a due step,
//!    write every PWM pin from the phase counter

use crate::config::BoardProfile;
use crate::dimmer::ChannelDutyState;
use crate::motion::MotionState;
use crate::sync::SharedState;
use crate::traits::{ChannelOutputs, MotorOutput};

/// Everything the command path and the tick share on one board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState<const C: usize> {
    pub channels: [ChannelDutyState; C],
    pub motion: MotionState,
}

impl<const C: usize> DeviceState<C> {
    pub const fn new(steps_per_rev: u16) -> Self {
        Self {
            channels: [ChannelDutyState::off(); C],
            motion: MotionState::new(steps_per_rev),
        }
    }

    /// Initial state for a board profile
    pub const fn for_profile(profile: &BoardProfile) -> Self {
        Self::new(profile.steps_per_rev)
    }
}

/// Noteworthy transitions reported by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickEvent {
    /// Driver fault aborted a running move
    FaultAbort,
    /// A finite move emitted its last step
    MotionComplete,
}

/// Timer-context driver for one board
#[derive(Debug)]
pub struct ActuationScheduler {
    profile: BoardProfile,
    /// PWM phase, wraps at the resolution's step count
    phase: u16,
    /// Ticks since the last millisecond boundary
    ms_ticks: u32,
    step_high: bool,
    motor_enabled: bool,
}

impl ActuationScheduler {
    pub fn new(profile: BoardProfile) -> Self {
        Self {
            profile,
            phase: 0,
            ms_ticks: 0,
            step_high: false,
            motor_enabled: false,
        }
    }

    pub fn profile(&self) -> &BoardProfile {
        &self.profile
    }

    pub fn phase(&self) -> u16 {
        self.phase
    }

    pub fn motor_enabled(&self) -> bool {
        self.motor_enabled
    }

    /// Run one timer tick
    pub fn tick<S, CH, M, const C: usize>(
        &mut self,
        state: &S,
        outputs: &mut CH,
        motor: &mut M,
    ) -> Option<TickEvent>
    where
        S: SharedState<DeviceState<C>>,
        CH: ChannelOutputs,
        M: MotorOutput,
    {
        if self.step_high {
            motor.end_step();
            self.step_high = false;
        }

        let fault_input = motor.fault_asserted();

        self.ms_ticks += 1;
        let ms_boundary = self.ms_ticks >= self.profile.ticks_per_ms();
        if ms_boundary {
            self.ms_ticks = 0;
        }

        let (duties, step, faulted, event) = state.with_mut(|device| {
            let was_running = !device.motion.is_idle();
            let aborted = device.motion.observe_fault(fault_input);
            let step = device.motion.tick();

            if ms_boundary {
                for channel in device.channels.iter_mut() {
                    channel.advance_ms();
                }
            }

            let duties: [u8; C] = core::array::from_fn(|i| device.channels[i].current());
            let event = if aborted {
                Some(TickEvent::FaultAbort)
            } else if was_running && device.motion.is_idle() {
                Some(TickEvent::MotionComplete)
            } else {
                None
            };
            (duties, step, device.motion.is_faulted(), event)
        });

        let enable = !faulted;
        if enable != self.motor_enabled {
            motor.set_enabled(enable);
            self.motor_enabled = enable;
        }

        if let Some(direction) = step {
            motor.begin_step(direction);
            self.step_high = true;
        }

        self.write_pwm(&duties, outputs);
        event
    }

    fn write_pwm<CH: ChannelOutputs>(&mut self, duties: &[u8], outputs: &mut CH) {
        let resolution = self.profile.resolution;
        let count = outputs.channel_count().min(duties.len());

        for (channel, &duty) in duties.iter().enumerate().take(count) {
            let on = duty == u8::MAX || self.phase < resolution.scale(duty);
            outputs.write_channel(channel, on != self.profile.inverted);
        }

        self.phase = (self.phase + 1) % resolution.steps();
    }
}
