//! Monotonic clock on the embassy time driver

use embassy_time::Instant;
use lightwall_hal::Monotonic;

/// Milliseconds since boot, truncated to `u32`
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
