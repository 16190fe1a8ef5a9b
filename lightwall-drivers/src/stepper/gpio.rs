//! Step/direction driver on plain GPIO
//!
//! Suits A4988/DRV8825-class drivers: the actuation tick raises STEP on
//! one tick and releases it on the next, so the pulse width is one tick
//! period (50 µs at 20 kHz, 100 µs at 10 kHz), well above the ~2 µs
//! minimum of these parts.

use lightwall_core::traits::MotorOutput;
use lightwall_hal::{InputPin, OutputPin};
use lightwall_protocol::Direction;

/// Electrical polarity of the driver control lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperPolarity {
    /// DIR high selects clockwise
    pub clockwise_high: bool,
    /// EN low enables the output stage
    pub enable_active_low: bool,
    /// FAULT low signals a driver fault
    pub fault_active_low: bool,
}

impl Default for StepperPolarity {
    /// Typical DRV8825 breakout: `nENBL`, `nFAULT`
    fn default() -> Self {
        Self {
            clockwise_high: true,
            enable_active_low: true,
            fault_active_low: true,
        }
    }
}

pub struct GpioStepper<S, D, E, F> {
    step: S,
    dir: D,
    enable: E,
    fault: F,
    polarity: StepperPolarity,
}

impl<S, D, E, F> GpioStepper<S, D, E, F>
where
    S: OutputPin,
    D: OutputPin,
    E: OutputPin,
    F: InputPin,
{
    /// Take the pins with STEP low and the driver disabled
    pub fn new(step: S, dir: D, enable: E, fault: F, polarity: StepperPolarity) -> Self {
        let mut stepper = Self {
            step,
            dir,
            enable,
            fault,
            polarity,
        };
        stepper.step.set_low();
        stepper.set_enabled(false);
        stepper
    }

    pub fn polarity(&self) -> StepperPolarity {
        self.polarity
    }
}

impl<S, D, E, F> MotorOutput for GpioStepper<S, D, E, F>
where
    S: OutputPin,
    D: OutputPin,
    E: OutputPin,
    F: InputPin,
{
    fn begin_step(&mut self, direction: Direction) {
        let clockwise = direction == Direction::Clockwise;
        self.dir.set_state(clockwise == self.polarity.clockwise_high);
        self.step.set_high();
    }

    fn end_step(&mut self) {
        self.step.set_low();
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enable
            .set_state(enabled != self.polarity.enable_active_low);
    }

    fn fault_asserted(&mut self) -> bool {
        self.fault.is_high() != self.polarity.fault_active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockOut {
        high: bool,
        rises: u32,
    }

    impl OutputPin for MockOut {
        fn set_high(&mut self) {
            if !self.high {
                self.rises += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct MockIn {
        high: bool,
    }

    impl InputPin for MockIn {
        fn is_high(&mut self) -> bool {
            self.high
        }
    }

    type Stepper = GpioStepper<MockOut, MockOut, MockOut, MockIn>;

    fn stepper(fault_high: bool) -> Stepper {
        GpioStepper::new(
            MockOut::default(),
            MockOut::default(),
            MockOut::default(),
            MockIn { high: fault_high },
            StepperPolarity::default(),
        )
    }

    #[test]
    fn test_starts_disabled() {
        let s = stepper(true);
        // Active-low enable: disabled = high
        assert!(s.enable.is_set_high());
        assert!(!s.step.is_set_high());
    }

    #[test]
    fn test_step_pulse() {
        let mut s = stepper(true);
        s.set_enabled(true);
        assert!(!s.enable.is_set_high());

        s.begin_step(Direction::Clockwise);
        assert!(s.dir.is_set_high());
        assert!(s.step.is_set_high());
        s.end_step();
        assert!(!s.step.is_set_high());

        s.begin_step(Direction::CounterClockwise);
        assert!(!s.dir.is_set_high());
        s.end_step();
        assert_eq!(s.step.rises, 2);
    }

    #[test]
    fn test_fault_active_low() {
        assert!(!stepper(true).fault_asserted());
        assert!(stepper(false).fault_asserted());
    }

    #[test]
    fn test_inverted_direction() {
        let mut s = GpioStepper::new(
            MockOut::default(),
            MockOut::default(),
            MockOut::default(),
            MockIn { high: false },
            StepperPolarity {
                clockwise_high: false,
                enable_active_low: false,
                fault_active_low: false,
            },
        );
        assert!(!s.enable.is_set_high());
        assert!(!s.fault_asserted());
        s.begin_step(Direction::Clockwise);
        assert!(!s.dir.is_set_high());
    }
}
