//! Four-channel laser board
//!
//! Channels 0-3 on GPIO 6-9. The laser drivers switch on a low input,
//! so every pin idles high and PWM runs at 5-bit resolution to keep the
//! period short at the lower tick rate.

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

pub const PROFILE: BoardProfile = config::LASER.named(board_name("laser"));
const _: () = assert!(PROFILE.is_valid());
const _: () = assert!(PROFILE.inverted);

const CHANNELS: usize = 4;

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
    let bank = GpioChannelBank::new(
        [
            output(p.PIN_6, true),
            output(p.PIN_7, true),
            output(p.PIN_8, true),
            output(p.PIN_9, true),
        ],
        true,
    );
    timer.spawn(actuation_task(bank)).unwrap();

    let (tx, rx) = tasks::host_uart(p.UART0, p.PIN_0, p.PIN_1);
    let board = BOARD.init(TextBoard::new(
        PROFILE.name,
        DimmerHandler::new(&DEVICE, PROFILE),
    ));
    spawner.spawn(tasks::host_link_task(rx, tx, board)).unwrap();
}
