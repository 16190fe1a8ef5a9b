//! Reply lines sent back to the host
//!
//! Every processed line produces exactly one [`Reply`]. Replies render
//! into a fixed [`ReplyLine`] without the terminator; the link task
//! appends `\r\n`.

use core::fmt::{self, Write};

use crate::command::{Direction, ErrorCode};
use crate::radar::RadarTarget;

/// Capacity of a rendered reply line
pub const REPLY_CAPACITY: usize = 96;

/// One rendered reply, without terminator
pub type ReplyLine = heapless::String<REPLY_CAPACITY>;

/// Stepper operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    #[default]
    Idle,
    RotateContinuous,
    StepFinite,
    PositionSeek,
}

impl MotionMode {
    /// Label used in `STAT` replies
    pub const fn label(self) -> &'static str {
        match self {
            MotionMode::Idle => "IDLE",
            MotionMode::RotateContinuous => "ROT",
            MotionMode::StepFinite => "STP",
            MotionMode::PositionSeek => "POS",
        }
    }
}

/// Snapshot of a motion channel for `STAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionReport {
    pub mode: MotionMode,
    pub direction: Direction,
    pub position: u16,
    pub interval: u32,
    pub remaining: u32,
    /// Driver fault is latched
    pub fault: bool,
}

/// Cached radar reading for `READ`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryReport {
    /// Uptime when the reading was taken, 0 when stale
    pub timestamp_ms: u32,
    pub target: RadarTarget,
}

/// Reply to one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Bare board identifier
    Name(&'static str),
    /// Ready marker emitted once after init
    Ready,
    Rotate {
        direction: Direction,
        rpm: u32,
    },
    Step {
        direction: Direction,
        steps: u32,
        duration_ms: u32,
    },
    /// `steps == 0` means already at target
    Position {
        direction: Direction,
        degrees: u32,
        duration_ms: u32,
        steps: u32,
    },
    Halted,
    Status(MotionReport),
    /// Accepted `SET` or `BLINK`
    Channel {
        channel: u8,
        brightness: u8,
        duration_ms: u32,
    },
    Telemetry(TelemetryReport),
    Error(ErrorCode),
}

impl From<ErrorCode> for Reply {
    fn from(code: ErrorCode) -> Self {
        Reply::Error(code)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::Name(name) => f.write_str(name),
            Reply::Ready => f.write_str(crate::READY_MARKER),
            Reply::Rotate { direction, rpm } => {
                write!(f, "OK ROT {} {}", direction.as_str(), rpm)
            }
            Reply::Step {
                direction,
                steps,
                duration_ms,
            } => write!(f, "OK STP {} {} {}", direction.as_str(), steps, duration_ms),
            Reply::Position {
                direction,
                degrees,
                duration_ms,
                steps,
            } => write!(
                f,
                "OK POS {} {} {} {}",
                direction.as_str(),
                degrees,
                duration_ms,
                steps
            ),
            Reply::Halted => f.write_str("OK HALT"),
            Reply::Status(report) => write!(
                f,
                "OK STAT {} {} {} {} {} {}",
                report.mode.label(),
                report.direction.as_str(),
                report.position,
                report.interval,
                report.remaining,
                if report.fault { "FAULT" } else { "READY" }
            ),
            Reply::Channel {
                channel,
                brightness,
                duration_ms,
            } => write!(f, "OK {} {} {}", channel, brightness, duration_ms),
            Reply::Telemetry(TelemetryReport {
                timestamp_ms,
                target,
            }) => write!(
                f,
                "{} {} {} {} {} {}",
                timestamp_ms,
                target.x_mm,
                target.y_mm,
                target.distance_mm,
                target.angle_deg,
                target.speed_cm_s
            ),
            Reply::Error(code) => write!(f, "ERR {}", code.as_str()),
        }
    }
}

impl Reply {
    /// Render into `out`, replacing its contents
    pub fn render(&self, out: &mut ReplyLine) -> fmt::Result {
        out.clear();
        write!(out, "{}", self)
    }
}
