//! Board-agnostic actuation core for the Lightwall controllers
//!
//! This crate contains all logic that does not depend on specific
//! hardware implementations:
//!
//! - Board profiles (tick rate, channel count, polarity, resolution)
//! - Shared device state and the critical-section access abstraction
//! - Channel dimming with fixed-point fades and blink timers
//! - Stepper motion state and rate conversion
//! - The per-tick actuation scheduler
//! - Fog timing and cached sensor readings
//! - Command handlers for every board role
//! - Output traits implemented by the drivers crate

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod dimmer;
pub mod dispatch;
pub mod fog;
pub mod motion;
pub mod scheduler;
pub mod sensor;
pub mod sync;
pub mod traits;
