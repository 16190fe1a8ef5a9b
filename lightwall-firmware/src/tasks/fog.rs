//! Fog/distance board tasks
//!
//! The fog pass runs in the timer context so a burst ends within one
//! millisecond of its expiry. Distance sampling runs in thread mode.

use defmt::*;
use embassy_time::{Duration, Ticker};

use lightwall_core::fog::{AuxActuator, FogState};
use lightwall_core::sensor::{DistanceReading, SensorCache};
use lightwall_core::sync::{CsState, SharedState};
use lightwall_drivers::{GpioFogOutput, IrDistanceSensor};
use lightwall_hal::Monotonic;
use lightwall_hal_rp2040::{EmbassyClock, RpAnalog, RpOutput};

/// Distance sampling period
const SAMPLE_INTERVAL_MS: u64 = 50;

#[embassy_executor::task]
pub async fn fog_pass_task(
    output: GpioFogOutput<RpOutput>,
    fog: &'static CsState<FogState>,
    distance: &'static CsState<SensorCache<DistanceReading>>,
) {
    info!("Fog pass task started");

    let clock = EmbassyClock;
    let mut actuator = AuxActuator::new(output);
    let mut ticker = Ticker::every(Duration::from_millis(1));

    loop {
        ticker.next().await;
        let now_ms = clock.now_ms();

        if actuator.pass(fog, now_ms) {
            debug!("Fog burst ended");
        }
        if distance.with_mut(|cache| cache.expire(now_ms)) {
            warn!("Distance reading stale");
        }
    }
}

#[embassy_executor::task]
pub async fn distance_sample_task(
    mut sensor: IrDistanceSensor<RpAnalog>,
    cache: &'static CsState<SensorCache<DistanceReading>>,
) {
    info!("Distance sample task started");

    let clock = EmbassyClock;
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));
    let mut last_error = None;

    loop {
        ticker.next().await;

        match sensor.read() {
            Ok(reading) => {
                trace!("Distance: raw={} {} mm", reading.raw, reading.distance_mm);
                cache.with_mut(|c| c.update(reading, clock.now_ms()));
                last_error = None;
            }
            Err(e) => {
                // Log on change only; a disconnected sensor fails every sample
                if last_error != Some(e) {
                    warn!("Distance sample failed: {:?}", e);
                }
                last_error = Some(e);
            }
        }
    }
}
