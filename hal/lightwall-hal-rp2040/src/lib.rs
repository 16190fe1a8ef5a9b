//! RP2040 implementations of the `lightwall-hal` traits
//!
//! - GPIO adapters over any embedded-hal 1.0 pin with an infallible error
//!   type (all embassy-rp pins qualify)
//! - Blocking ADC channel sampling
//! - Millisecond clock backed by the embassy time driver

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod gpio;

pub use adc::RpAnalog;
pub use clock::EmbassyClock;
pub use gpio::{EhInput, EhOutput, RpInput, RpOutput};
