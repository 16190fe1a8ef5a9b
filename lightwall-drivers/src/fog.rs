//! GPIO fog output
//!
//! Drives the fog machine's remote trigger through a relay or MOSFET.

use lightwall_core::traits::FogOutput;
use lightwall_hal::OutputPin;

pub struct GpioFogOutput<P> {
    pin: P,
    /// Fog ON = pin LOW
    inverted: bool,
    active: bool,
}

impl<P: OutputPin> GpioFogOutput<P> {
    /// Create the output in the off state
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut output = Self {
            pin,
            inverted,
            active: false,
        };
        output.set_active(false);
        output
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> FogOutput for GpioFogOutput<P> {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.pin.set_state(active != self.inverted);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightwall_core::fog::{AuxActuator, FogState};
    use lightwall_core::sync::{MockState, SharedState};

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high() {
        let mut fog = GpioFogOutput::new_active_high(MockPin { high: true });
        assert!(!fog.is_active());
        assert!(!fog.pin.is_set_high());

        fog.set_active(true);
        assert!(fog.is_active());
        assert!(fog.pin.is_set_high());
    }

    #[test]
    fn test_active_low() {
        let mut fog = GpioFogOutput::new_active_low(MockPin { high: false });
        assert!(fog.pin.is_set_high());

        fog.set_active(true);
        assert!(!fog.pin.is_set_high());
        fog.set_active(false);
        assert!(fog.pin.is_set_high());
    }

    #[test]
    fn test_timed_burst_through_actuator() {
        let state = MockState::new(FogState::IDLE);
        let mut actuator = AuxActuator::new(GpioFogOutput::new_active_high(MockPin { high: false }));

        state.with_mut(|fog| fog.enable(0, 2));
        actuator.pass(&state, 0);
        assert!(actuator.output().pin.is_set_high());
        actuator.pass(&state, 1);
        assert!(actuator.output().pin.is_set_high());
        actuator.pass(&state, 2);
        assert!(!actuator.output().pin.is_set_high());
    }
}
