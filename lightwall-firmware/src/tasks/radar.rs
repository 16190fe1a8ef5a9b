//! RD-03D radar tasks
//!
//! UART1 delivers the sensor's report stream; every validated frame
//! refreshes the target cache. The watch task zeroes the cache once
//! frames stop arriving.

use defmt::*;
use embassy_rp::peripherals::{PIN_9, UART1};
use embassy_rp::uart::{BufferedUartRx, Config as UartConfig};
use embassy_rp::Peri;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Read;
use static_cell::StaticCell;

use lightwall_core::sensor::SensorCache;
use lightwall_core::sync::{CsState, SharedState};
use lightwall_drivers::Rd03d;
use lightwall_hal::Monotonic;
use lightwall_hal_rp2040::EmbassyClock;
use lightwall_protocol::{RadarTarget, RADAR_BAUD_RATE};

use crate::Irqs;

/// Two full frames of headroom
const RADAR_BUF_SIZE: usize = 64;

static RADAR_RX_BUF: StaticCell<[u8; RADAR_BUF_SIZE]> = StaticCell::new();

/// Receive-only UART1 on GPIO 9; the sensor needs no configuration
pub fn radar_uart(uart: Peri<'static, UART1>, rx_pin: Peri<'static, PIN_9>) -> BufferedUartRx {
    let mut config = UartConfig::default();
    config.baudrate = RADAR_BAUD_RATE;

    let rx_buf = RADAR_RX_BUF.init([0u8; RADAR_BUF_SIZE]);
    BufferedUartRx::new(uart, Irqs, rx_pin, rx_buf, config)
}

#[embassy_executor::task]
pub async fn radar_rx_task(
    mut rx: BufferedUartRx,
    cache: &'static CsState<SensorCache<RadarTarget>>,
) {
    info!("Radar RX task started");

    let clock = EmbassyClock;
    let mut radar = Rd03d::new();
    let mut buf = [0u8; RADAR_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                if let Some(target) = radar.ingest(&buf[..n], cache, clock.now_ms()) {
                    trace!(
                        "Target: x={} y={} d={} a={}",
                        target.x_mm,
                        target.y_mm,
                        target.distance_mm,
                        target.angle_deg
                    );
                }
            }
            Err(e) => {
                warn!("Radar UART read error: {:?}", e);
                radar.resync();
            }
        }
    }
}

/// Staleness check, timer context
#[embassy_executor::task]
pub async fn radar_watch_task(cache: &'static CsState<SensorCache<RadarTarget>>) {
    let clock = EmbassyClock;
    let mut ticker = Ticker::every(Duration::from_millis(10));

    loop {
        ticker.next().await;
        if cache.with_mut(|c| c.expire(clock.now_ms())) {
            warn!("Radar frames stopped, target cleared");
        }
    }
}
