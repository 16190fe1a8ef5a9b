//! Lightwall - Installation Controller Firmware
//!
//! One binary per board role, selected with a `role-*` feature. Every
//! board runs two executors:
//!
//! - a high-priority interrupt executor on `SWI_IRQ_1` for the timer
//!   context (software PWM, step pulses, fog expiry, sensor staleness)
//! - the thread-mode executor for the host line protocol and sensor I/O
//!
//! The two share state only through critical-section cells.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::BufferedInterruptHandler;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod boards;
mod tasks;

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

static TIMER_EXECUTOR: InterruptExecutor = InterruptExecutor::new();
static FOREGROUND_EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    TIMER_EXECUTOR.on_interrupt()
}

#[entry]
fn main() -> ! {
    info!(
        "Lightwall firmware starting: {} ({:?})",
        boards::PROFILE.name,
        boards::PROFILE.role
    );

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Timer context preempts everything in thread mode
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let timer_spawner = TIMER_EXECUTOR.start(interrupt::SWI_IRQ_1);

    let executor = FOREGROUND_EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        boards::start(p, timer_spawner, spawner);
        spawner.spawn(tasks::tick_event_task()).unwrap();
        spawner.spawn(tasks::heartbeat_task()).unwrap();
        info!("All tasks spawned, firmware running");
    })
}
