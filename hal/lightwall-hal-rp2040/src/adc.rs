//! Blocking ADC sampling

use embassy_rp::adc::{Adc, Blocking, Channel};
use lightwall_hal::{AdcError, AnalogInput};

/// One ADC channel with exclusive use of the converter
pub struct RpAnalog {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAnalog {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for RpAnalog {
    fn sample(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AdcError::Conversion)
    }
}
