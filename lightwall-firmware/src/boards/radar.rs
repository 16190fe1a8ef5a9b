//! Radar telemetry board
//!
//! RD-03D TX on GPIO 9 (UART1 RX). Host link on UART0 (GPIO 0/1).

use embassy_executor::{SendSpawner, Spawner};
use embassy_rp::Peripherals;
use static_cell::StaticCell;

use lightwall_core::config::{self, BoardProfile};
use lightwall_core::dispatch::{TelemetryHandler, TextBoard};
use lightwall_core::sensor::{SensorCache, NO_TARGET};
use lightwall_core::sync::CsState;
use lightwall_protocol::RadarTarget;

use super::board_name;
use crate::tasks;

pub const PROFILE: BoardProfile = config::RADAR.named(board_name("radar"));
const _: () = assert!(PROFILE.is_valid());

type TargetCache = SensorCache<RadarTarget>;
type Board = TextBoard<TelemetryHandler<'static, CsState<TargetCache>>>;

static TARGET: CsState<TargetCache> =
    CsState::new(SensorCache::new(NO_TARGET, PROFILE.sensor_timeout_ms));
static BOARD: StaticCell<Board> = StaticCell::new();

pub fn start(p: Peripherals, timer: SendSpawner, spawner: Spawner) {
    timer.spawn(tasks::radar_watch_task(&TARGET)).unwrap();

    let radar_rx = tasks::radar_uart(p.UART1, p.PIN_9);
    spawner
        .spawn(tasks::radar_rx_task(radar_rx, &TARGET))
        .unwrap();

    let (tx, rx) = tasks::host_uart(p.UART0, p.PIN_0, p.PIN_1);
    let board = BOARD.init(TextBoard::new(PROFILE.name, TelemetryHandler::new(&TARGET)));
    spawner.spawn(tasks::host_link_task(rx, tx, board)).unwrap();
}
