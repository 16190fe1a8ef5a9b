//! Lightwall Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so the pin drivers and the
//! actuation core stay portable.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lightwall-firmware (board modules)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lightwall-drivers (pins -> outputs)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lightwall-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lightwall-hal-rp2040                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`adc::AnalogInput`] - One-shot analog sampling
//! - [`clock::Monotonic`] - Millisecond uptime

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod gpio;

pub use adc::{AdcError, AnalogInput, ADC_MAX};
pub use clock::Monotonic;
pub use gpio::{InputPin, OutputPin};
