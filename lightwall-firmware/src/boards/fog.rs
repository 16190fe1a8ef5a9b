//! Fog and distance board
//!
//! | Signal   | GPIO | Notes                    |
//! |----------|------|--------------------------|
//! | Relay    | 15   | active high              |
//! | IR range | 26   | ADC0, Sharp analog out   |
//! | Host     | 0/1  | UART0, JSON lines        |

use embassy_executor::{SendSpawner, Spawner};
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::Pull;
use embassy_rp::Peripherals;
use static_cell::StaticCell;

use lightwall_core::config::{self, BoardProfile};
use lightwall_core::dispatch::FogDistanceBoard;
use lightwall_core::fog::FogState;
use lightwall_core::sensor::{DistanceReading, SensorCache};
use lightwall_core::sync::CsState;
use lightwall_drivers::{GpioFogOutput, IrDistanceSensor};
use lightwall_hal_rp2040::RpAnalog;

use super::{board_name, output};
use crate::tasks;

pub const PROFILE: BoardProfile = config::FOG.named(board_name("fog"));
const _: () = assert!(PROFILE.is_valid());

/// RP2040 ADC reference
const ADC_VREF_MV: u16 = 3300;

type DistanceCache = SensorCache<DistanceReading>;
type Board = FogDistanceBoard<'static, CsState<FogState>, CsState<DistanceCache>>;

static FOG: CsState<FogState> = CsState::new(FogState::IDLE);
static DISTANCE: CsState<DistanceCache> = CsState::new(SensorCache::new(
    DistanceReading::NONE,
    PROFILE.sensor_timeout_ms,
));
static BOARD: StaticCell<Board> = StaticCell::new();

pub fn start(p: Peripherals, timer: SendSpawner, spawner: Spawner) {
    let relay = GpioFogOutput::new_active_high(output(p.PIN_15, false));
    timer
        .spawn(tasks::fog_pass_task(relay, &FOG, &DISTANCE))
        .unwrap();

    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let channel = Channel::new_pin(p.PIN_26, Pull::None);
    let sensor = IrDistanceSensor::new(RpAnalog::new(adc, channel), ADC_VREF_MV);
    spawner
        .spawn(tasks::distance_sample_task(sensor, &DISTANCE))
        .unwrap();

    let (tx, rx) = tasks::host_uart(p.UART0, p.PIN_0, p.PIN_1);
    let board = BOARD.init(FogDistanceBoard::new(PROFILE.name, &FOG, &DISTANCE));
    spawner.spawn(tasks::host_link_task(rx, tx, board)).unwrap();
}
