//! GPIO channel bank for software PWM

use lightwall_core::traits::ChannelOutputs;
use lightwall_hal::OutputPin;

/// Fixed set of output pins driven by the actuation tick
///
/// Polarity is applied by the scheduler; the bank only writes levels
/// and skips pins already at the requested level.
pub struct GpioChannelBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> GpioChannelBank<P, N> {
    /// Take ownership of `pins` and drive them all to `idle_high`
    pub fn new(mut pins: [P; N], idle_high: bool) -> Self {
        for pin in pins.iter_mut() {
            pin.set_state(idle_high);
        }
        Self { pins }
    }

    pub fn pin(&self, channel: usize) -> Option<&P> {
        self.pins.get(channel)
    }
}

impl<P: OutputPin, const N: usize> ChannelOutputs for GpioChannelBank<P, N> {
    fn channel_count(&self) -> usize {
        N
    }

    fn write_channel(&mut self, channel: usize, high: bool) {
        if let Some(pin) = self.pins.get_mut(channel) {
            if pin.is_set_high() != high {
                pin.set_state(high);
            }
        }
    }
}
