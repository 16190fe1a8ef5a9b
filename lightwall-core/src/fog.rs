//! Timed fog trigger
//!
//! The command path arms [`FogState`] with an absolute expiry; the
//! periodic [`AuxActuator::pass`] mirrors it onto the output pin and
//! clears it once the expiry passes. Times are wrapping u32 milliseconds.

use crate::sync::SharedState;
use crate::traits::FogOutput;

/// Longest fog burst in ms
pub const MAX_FOG_MS: u32 = 60_000;

/// Check if `now` has reached `deadline`, tolerating counter wrap
pub fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

/// Fog output request shared with the timer context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FogState {
    active: bool,
    end_ms: u32,
}

impl FogState {
    pub const IDLE: Self = Self {
        active: false,
        end_ms: 0,
    };

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arm the output for `duration_ms`, clamped to [`MAX_FOG_MS`]
    ///
    /// Returns the accepted duration.
    pub fn enable(&mut self, now_ms: u32, duration_ms: u32) -> u32 {
        let duration_ms = duration_ms.min(MAX_FOG_MS);
        *self = Self {
            active: true,
            end_ms: now_ms.wrapping_add(duration_ms),
        };
        duration_ms
    }

    /// Turn the output off immediately
    pub fn disable(&mut self) {
        *self = Self::IDLE;
    }

    /// Clear the request once its expiry has passed
    ///
    /// Returns true when this call expired an active burst.
    pub fn expire(&mut self, now_ms: u32) -> bool {
        if self.active && deadline_reached(now_ms, self.end_ms) {
            *self = Self::IDLE;
            true
        } else {
            false
        }
    }

    /// Milliseconds left in the current burst
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        if !self.active || deadline_reached(now_ms, self.end_ms) {
            0
        } else {
            self.end_ms.wrapping_sub(now_ms)
        }
    }
}

/// Drives a [`FogOutput`] from the shared [`FogState`]
pub struct AuxActuator<O> {
    output: O,
}

impl<O: FogOutput> AuxActuator<O> {
    pub fn new(mut output: O) -> Self {
        output.set_active(false);
        Self { output }
    }

    /// One scheduler pass: expire, then mirror the state onto the pin
    ///
    /// Returns true when a burst ended during this pass.
    pub fn pass<S: SharedState<FogState>>(&mut self, state: &S, now_ms: u32) -> bool {
        let (expired, active) = state.with_mut(|fog| (fog.expire(now_ms), fog.is_active()));

        if active != self.output.is_active() {
            self.output.set_active(active);
        }
        expired
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MockState;

    #[derive(Default)]
    struct MockFog {
        active: bool,
        switches: u32,
    }

    impl FogOutput for MockFog {
        fn set_active(&mut self, active: bool) {
            self.active = active;
            self.switches += 1;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[test]
    fn test_enable_and_expire() {
        let mut fog = FogState::IDLE;
        assert_eq!(fog.enable(1_000, 3_000), 3_000);
        assert_eq!(fog.remaining_ms(2_000), 2_000);
        assert!(!fog.expire(3_999));
        assert!(fog.expire(4_000));
        assert!(!fog.is_active());
        assert_eq!(fog.remaining_ms(4_000), 0);
    }

    #[test]
    fn test_duration_clamped() {
        let mut fog = FogState::IDLE;
        assert_eq!(fog.enable(0, 600_000), MAX_FOG_MS);
        assert_eq!(fog.remaining_ms(0), MAX_FOG_MS);
    }

    #[test]
    fn test_expiry_across_wrap() {
        let mut fog = FogState::IDLE;
        let now = u32::MAX - 10;
        fog.enable(now, 100);
        assert!(!fog.expire(u32::MAX));
        assert_eq!(fog.remaining_ms(u32::MAX), 90);
        assert!(!fog.expire(88));
        assert!(fog.expire(89));
    }

    #[test]
    fn test_disable() {
        let mut fog = FogState::IDLE;
        fog.enable(0, 5_000);
        fog.disable();
        assert!(!fog.is_active());
        assert_eq!(fog.remaining_ms(10), 0);
    }

    #[test]
    fn test_actuator_pass_drives_output() {
        let state = MockState::new(FogState::IDLE);
        let mut actuator = AuxActuator::new(MockFog::default());

        state.with_mut(|fog| fog.enable(100, 50));
        assert!(!actuator.pass(&state, 100));
        assert!(actuator.output().is_active());

        assert!(!actuator.pass(&state, 149));
        assert!(actuator.output().is_active());

        assert!(actuator.pass(&state, 150));
        assert!(!actuator.output().is_active());
        // init off, on, off
        assert_eq!(actuator.output().switches, 3);
    }
}
