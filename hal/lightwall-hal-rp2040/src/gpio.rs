//! GPIO adapters
//!
//! embassy-rp pins implement the embedded-hal 1.0 digital traits with
//! `Infallible` errors, so the adapters expose the plain `lightwall-hal`
//! traits without an error path.

use core::convert::Infallible;

use embassy_rp::gpio::{Input, Output};
use embedded_hal::digital::{self, ErrorType};

/// Push-pull output on an RP2040 pin
pub type RpOutput = EhOutput<Output<'static>>;

/// Input on an RP2040 pin
pub type RpInput = EhInput<Input<'static>>;

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Wraps an embedded-hal output pin and remembers the commanded level
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P> EhOutput<P>
where
    P: digital::OutputPin + ErrorType<Error = Infallible>,
{
    /// Take ownership of `pin` and drive it to `high`
    pub fn new(mut pin: P, high: bool) -> Self {
        infallible(pin.set_state(high.into()));
        Self { pin, high }
    }
}

impl<P> lightwall_hal::OutputPin for EhOutput<P>
where
    P: digital::OutputPin + ErrorType<Error = Infallible>,
{
    fn set_high(&mut self) {
        infallible(self.pin.set_high());
        self.high = true;
    }

    fn set_low(&mut self) {
        infallible(self.pin.set_low());
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Wraps an embedded-hal input pin
pub struct EhInput<P> {
    pin: P,
}

impl<P> EhInput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> lightwall_hal::InputPin for EhInput<P>
where
    P: digital::InputPin + ErrorType<Error = Infallible>,
{
    fn is_high(&mut self) -> bool {
        infallible(self.pin.is_high())
    }
}
