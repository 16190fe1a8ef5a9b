//! Lightwall host protocol
//!
//! This crate defines everything that crosses a wire on a Lightwall board:
//! the ASCII line protocol spoken with the host, the structured JSON
//! protocol of the fog/distance board, and the binary frames streamed by
//! the RD-03D radar module.
//!
//! # Protocol Overview
//!
//! Host commands are terminator-delimited ASCII lines:
//! ```text
//! ┌────────┬─────┬──────┬──────┬──────┬─────────┐
//! │ ACTION │ ' ' │ ARG1 │ ARG2 │ ARG3 │ CR / LF │
//! │ 1 tok  │     │ opt  │ opt  │ opt  │         │
//! └────────┴─────┴──────┴──────┴──────┴─────────┘
//! ```
//!
//! Every processed line produces exactly one reply line, either `OK ...`
//! echoing the accepted parameters or `ERR <CODE>`.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod json;
pub mod line;
pub mod radar;
pub mod reply;

pub use command::{parse_u32, Action, Command, Direction, ErrorCode, Tokens, MAX_ARGS};
pub use json::{
    parse_request, JsonCommand, JsonError, Response, HARDWARE_DISTANCE, HARDWARE_FOG,
    JSON_LINE_CAPACITY,
};
pub use line::{LineError, LineReader, LINE_CAPACITY};
pub use radar::{
    RadarFrame, RadarFrameError, RadarFrameParser, RadarTarget, RADAR_BAUD_RATE, RADAR_PAYLOAD_LEN,
};
pub use reply::{MotionMode, MotionReport, Reply, ReplyLine, TelemetryReport, REPLY_CAPACITY};

/// Marker every board prints once initialization completes
pub const READY_MARKER: &str = "READY";

/// Baud rate of the host link
pub const HOST_BAUD_RATE: u32 = 115_200;
