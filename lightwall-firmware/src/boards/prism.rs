//! Rotating prism board
//!
//! | Signal  | GPIO | Notes                    |
//! |---------|------|--------------------------|
//! | STEP    | 2    | active high              |
//! | DIR     | 3    | high = clockwise         |
//! | EN      | 4    | active low               |
//! | nFAULT  | 5    | active low, pulled up    |
//! | Host TX | 0    | UART0                    |
//! | Host RX | 1    | UART0                    |

use embassy_executor::{SendSpawner, Spawner};
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::Peripherals;
use static_cell::StaticCell;

use lightwall_core::config::{self, BoardProfile};
use lightwall_core::dispatch::{MotionHandler, TextBoard};
use lightwall_core::scheduler::DeviceState;
use lightwall_core::sync::CsState;
use lightwall_core::traits::NoChannels;
use lightwall_drivers::{GpioStepper, StepperPolarity};
use lightwall_hal_rp2040::{RpInput, RpOutput};

use super::{board_name, output};
use crate::tasks;

pub const PROFILE: BoardProfile = config::PRISM.named(board_name("prism"));
const _: () = assert!(PROFILE.is_valid());

type Device = DeviceState<0>;
type Stepper = GpioStepper<RpOutput, RpOutput, RpOutput, RpInput>;
type Board = TextBoard<MotionHandler<'static, CsState<Device>, 0>>;

static DEVICE: CsState<Device> = CsState::new(Device::for_profile(&PROFILE));
static BOARD: StaticCell<Board> = StaticCell::new();

#[embassy_executor::task]
async fn actuation_task(mut motor: Stepper) {
    tasks::actuation::run(PROFILE, &DEVICE, &mut NoChannels, &mut motor).await
}

pub fn start(p: Peripherals, timer: SendSpawner, spawner: Spawner) {
    let polarity = StepperPolarity::default();
    let stepper = GpioStepper::new(
        output(p.PIN_2, false),
        output(p.PIN_3, false),
        // Disabled until the first tick sees no fault
        output(p.PIN_4, polarity.enable_active_low),
        RpInput::new(Input::new(p.PIN_5, Pull::Up)),
        polarity,
    );
    timer.spawn(actuation_task(stepper)).unwrap();

    let (tx, rx) = tasks::host_uart(p.UART0, p.PIN_0, p.PIN_1);
    let board = BOARD.init(TextBoard::new(
        PROFILE.name,
        MotionHandler::new(&DEVICE, PROFILE),
    ));
    spawner.spawn(tasks::host_link_task(rx, tx, board)).unwrap();
}
