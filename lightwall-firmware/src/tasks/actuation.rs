//! Actuation tick loop
//!
//! Embassy tasks cannot be generic, so each board wraps [`run`] in its
//! own task with concrete output types.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use portable_atomic::{AtomicU32, Ordering};

use lightwall_core::config::BoardProfile;
use lightwall_core::scheduler::{ActuationScheduler, DeviceState, TickEvent};
use lightwall_core::sync::SharedState;
use lightwall_core::traits::{ChannelOutputs, MotorOutput};

/// Ticks run since boot
pub static TICKS: AtomicU32 = AtomicU32::new(0);

/// Moves aborted by a driver fault
pub static FAULT_ABORTS: AtomicU32 = AtomicU32::new(0);

/// Latest tick event, logged from thread mode
pub static TICK_EVENTS: Signal<CriticalSectionRawMutex, TickEvent> = Signal::new();

/// Drive the scheduler at the profile's tick rate, forever
pub async fn run<S, CH, M, const C: usize>(
    profile: BoardProfile,
    state: &S,
    outputs: &mut CH,
    motor: &mut M,
) -> !
where
    S: SharedState<DeviceState<C>>,
    CH: ChannelOutputs,
    M: MotorOutput,
{
    info!(
        "Actuation started: {} Hz, {} channels",
        profile.tick_hz,
        outputs.channel_count()
    );

    let mut scheduler = ActuationScheduler::new(profile);
    let mut ticker = Ticker::every(Duration::from_micros(profile.tick_period_us()));

    loop {
        ticker.next().await;
        TICKS.fetch_add(1, Ordering::Relaxed);

        if let Some(event) = scheduler.tick(state, outputs, motor) {
            if event == TickEvent::FaultAbort {
                FAULT_ABORTS.fetch_add(1, Ordering::Relaxed);
            }
            TICK_EVENTS.signal(event);
        }
    }
}

/// Log tick events outside the timer context
#[embassy_executor::task]
pub async fn tick_event_task() {
    loop {
        match TICK_EVENTS.wait().await {
            TickEvent::FaultAbort => warn!("Driver fault: motion aborted, driver disabled"),
            TickEvent::MotionComplete => debug!("Move complete"),
        }
    }
}
