//! Host serial link
//!
//! Reads bytes from UART0, frames them into lines and answers each line
//! with exactly one reply terminated by CRLF. Commands are handled one at
//! a time; the next line is not read until the reply is queued.

use defmt::*;
use embassy_rp::peripherals::{PIN_0, PIN_1, UART0};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Config as UartConfig, Uart};
use embassy_rp::Peri;
use embedded_io_async::{Read, Write};
use portable_atomic::{AtomicU32, Ordering};
use static_cell::StaticCell;

use lightwall_core::dispatch::LineHandler;
use lightwall_hal::Monotonic;
use lightwall_hal_rp2040::EmbassyClock;
use lightwall_protocol::{LineReader, ReplyLine, HOST_BAUD_RATE};
#[cfg(feature = "role-fog")]
use lightwall_protocol::JSON_LINE_CAPACITY;
#[cfg(not(feature = "role-fog"))]
use lightwall_protocol::LINE_CAPACITY;

use crate::Irqs;

/// UART ring buffer size, each direction
const HOST_BUF_SIZE: usize = 256;

/// Bytes pulled from the ring buffer per read
const RX_CHUNK: usize = 32;

static HOST_TX_BUF: StaticCell<[u8; HOST_BUF_SIZE]> = StaticCell::new();
static HOST_RX_BUF: StaticCell<[u8; HOST_BUF_SIZE]> = StaticCell::new();

/// Lines answered with a success reply
pub static LINES_ACCEPTED: AtomicU32 = AtomicU32::new(0);

/// Lines answered with an error reply
pub static LINES_REJECTED: AtomicU32 = AtomicU32::new(0);

/// Bring up UART0 on GPIO 0/1 at the host baud rate (8N1)
pub fn host_uart(
    uart: Peri<'static, UART0>,
    tx_pin: Peri<'static, PIN_0>,
    rx_pin: Peri<'static, PIN_1>,
) -> (BufferedUartTx, BufferedUartRx) {
    let mut config = UartConfig::default();
    config.baudrate = HOST_BAUD_RATE;

    let tx_buf = HOST_TX_BUF.init([0u8; HOST_BUF_SIZE]);
    let rx_buf = HOST_RX_BUF.init([0u8; HOST_BUF_SIZE]);

    let uart = Uart::new_blocking(uart, tx_pin, rx_pin, config);
    uart.into_buffered(Irqs, tx_buf, rx_buf).split()
}

/// Text protocol boards
#[cfg(not(feature = "role-fog"))]
#[embassy_executor::task]
pub async fn host_link_task(
    rx: BufferedUartRx,
    tx: BufferedUartTx,
    handler: &'static mut dyn LineHandler,
) {
    serve(rx, tx, handler, LineReader::<LINE_CAPACITY>::new()).await
}

/// JSON boards need room for a full request object
#[cfg(feature = "role-fog")]
#[embassy_executor::task]
pub async fn host_link_task(
    rx: BufferedUartRx,
    tx: BufferedUartTx,
    handler: &'static mut dyn LineHandler,
) {
    serve(rx, tx, handler, LineReader::<JSON_LINE_CAPACITY>::new()).await
}

async fn serve<const N: usize>(
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
    handler: &mut dyn LineHandler,
    mut reader: LineReader<N>,
) -> ! {
    info!("Host link task started ({} byte lines)", N);

    let clock = EmbassyClock;
    let mut reply = ReplyLine::new();
    let mut buf = [0u8; RX_CHUNK];

    handler.ready(&mut reply);
    send(&mut tx, &reply).await;

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Host UART read error: {:?}", e);
                reader.reset();
                continue;
            }
        };

        for &byte in &buf[..n] {
            let Some(line) = reader.feed(byte) else {
                continue;
            };

            match line {
                Ok(text) => debug!("<- {}", text),
                Err(e) => warn!("Host line rejected: {:?}", e),
            }

            if handler.respond(line, clock.now_ms(), &mut reply) {
                LINES_ACCEPTED.fetch_add(1, Ordering::Relaxed);
            } else {
                LINES_REJECTED.fetch_add(1, Ordering::Relaxed);
                warn!("-> {}", reply.as_str());
            }

            send(&mut tx, &reply).await;
        }
    }
}

async fn send(tx: &mut BufferedUartTx, line: &str) {
    trace!("-> {}", line);
    let result = async {
        tx.write_all(line.as_bytes()).await?;
        tx.write_all(b"\r\n").await
    }
    .await;

    if let Err(e) = result {
        warn!("Host UART write error: {:?}", e);
    }
}
