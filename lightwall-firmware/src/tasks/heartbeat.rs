//! Periodic health log

use defmt::*;
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use super::actuation::{FAULT_ABORTS, TICKS};
use super::host_link::{LINES_ACCEPTED, LINES_REJECTED};

const HEARTBEAT_INTERVAL_S: u64 = 60;

#[embassy_executor::task]
pub async fn heartbeat_task() {
    let mut ticker = Ticker::every(Duration::from_secs(HEARTBEAT_INTERVAL_S));

    loop {
        ticker.next().await;
        info!(
            "Alive: ticks={} lines ok={} err={} fault aborts={}",
            TICKS.load(Ordering::Relaxed),
            LINES_ACCEPTED.load(Ordering::Relaxed),
            LINES_REJECTED.load(Ordering::Relaxed),
            FAULT_ABORTS.load(Ordering::Relaxed)
        );
    }
}
