//! Board role selection
//!
//! Exactly one `role-*` feature picks the module that binds pins, owns
//! the shared state and spawns the role's tasks. Every module exports a
//! `PROFILE` and a `start` function with the same signature.
//!
//! The name reported by `NAME` defaults to the role name and can be
//! overridden at build time with `LIGHTWALL_BOARD_NAME`.

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;
use lightwall_hal_rp2040::RpOutput;

#[cfg(not(any(
    feature = "role-prism",
    feature = "role-light",
    feature = "role-laser",
    feature = "role-fog",
    feature = "role-radar"
)))]
compile_error!("enable exactly one board role feature: role-prism, role-light, role-laser, role-fog or role-radar");

#[cfg(any(
    all(feature = "role-prism", any(feature = "role-light", feature = "role-laser", feature = "role-fog", feature = "role-radar")),
    all(feature = "role-light", any(feature = "role-laser", feature = "role-fog", feature = "role-radar")),
    all(feature = "role-laser", any(feature = "role-fog", feature = "role-radar")),
    all(feature = "role-fog", feature = "role-radar"),
))]
compile_error!("board role features are mutually exclusive");

#[cfg(feature = "role-fog")]
mod fog;
#[cfg(feature = "role-laser")]
mod laser;
#[cfg(feature = "role-light")]
mod light;
#[cfg(feature = "role-prism")]
mod prism;
#[cfg(feature = "role-radar")]
mod radar;

#[cfg(feature = "role-fog")]
pub use fog::{start, PROFILE};
#[cfg(feature = "role-laser")]
pub use laser::{start, PROFILE};
#[cfg(feature = "role-light")]
pub use light::{start, PROFILE};
#[cfg(feature = "role-prism")]
pub use prism::{start, PROFILE};
#[cfg(feature = "role-radar")]
pub use radar::{start, PROFILE};

/// Build-time board name, or `default` when not overridden
pub const fn board_name(default: &'static str) -> &'static str {
    match option_env!("LIGHTWALL_BOARD_NAME") {
        Some(name) => name,
        None => default,
    }
}

/// Output pin driven to `high` before it is handed to a driver
pub fn output(pin: Peri<'static, impl Pin>, high: bool) -> RpOutput {
    RpOutput::new(Output::new(pin, Level::from(high)), high)
}
