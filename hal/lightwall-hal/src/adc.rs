//! Analog input abstraction

/// Full-scale count of a 12-bit converter
pub const ADC_MAX: u16 = 4095;

/// ADC sampling failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete or reported an error
    Conversion,
}

/// One analog channel sampled on demand
pub trait AnalogInput {
    /// Take one 12-bit sample (0..=[`ADC_MAX`])
    fn sample(&mut self) -> Result<u16, AdcError>;
}
