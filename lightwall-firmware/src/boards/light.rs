//! Eight-channel light board
//!
//! Channels 0-7 on GPIO 6-13, active high. Host link on UART0 (GPIO 0/1).

use embassy_executor::{SendSpawner, Spawner};
use embassy_rp::Peripherals;
use static_cell::StaticCell;

use lightwall_core::config::{self, BoardProfile};
use lightwall_core::dispatch::{DimmerHandler, TextBoard};
use lightwall_core::scheduler::DeviceState;
use lightwall_core::sync::CsState;
use lightwall_core::traits::NoMotor;
use lightwall_drivers::GpioChannelBank;
use lightwall_hal_rp2040::RpOutput;

use super::{board_name, output};
use crate::tasks;

pub const PROFILE: BoardProfile = config::LIGHT.named(board_name("light"));
const _: () = assert!(PROFILE.is_valid());

const CHANNELS: usize = 8;

type Device = DeviceState<CHANNELS>;
type Bank = GpioChannelBank<RpOutput, CHANNELS>;
type Board = TextBoard<DimmerHandler<'static, CsState<Device>, CHANNELS>>;

static DEVICE: CsState<Device> = CsState::new(Device::for_profile(&PROFILE));
static BOARD: StaticCell<Board> = StaticCell::new();

#[embassy_executor::task]
async fn actuation_task(mut bank: Bank) {
    tasks::actuation::run(PROFILE, &DEVICE, &mut bank, &mut NoMotor).await
}

pub fn start(p: Peripherals, timer: SendSpawner, spawner: Spawner) {
    let idle = PROFILE.inverted;
    let bank = GpioChannelBank::new(
        [
            output(p.PIN_6, idle),
            output(p.PIN_7, idle),
            output(p.PIN_8, idle),
            output(p.PIN_9, idle),
            output(p.PIN_10, idle),
            output(p.PIN_11, idle),
            output(p.PIN_12, idle),
            output(p.PIN_13, idle),
        ],
        idle,
    );
    timer.spawn(actuation_task(bank)).unwrap();

    let (tx, rx) = tasks::host_uart(p.UART0, p.PIN_0, p.PIN_1);
    let board = BOARD.init(TextBoard::new(
        PROFILE.name,
        DimmerHandler::new(&DEVICE, PROFILE),
    ));
    spawner.spawn(tasks::host_link_task(rx, tx, board)).unwrap();
}
