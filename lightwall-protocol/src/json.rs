//! Structured protocol of the fog/distance board
//!
//! One JSON object per line in each direction:
//! ```text
//! -> {"hardware":"fog","command":"on","payload":{"duration_ms":3000}}
//! <- {"ok":true,"hardware":"fog","active":true,"remaining_ms":3000}
//! -> {"command":"read"}
//! <- {"ok":true,"hardware":"distance","raw":1620,"distance":412,"age_ms":12}
//! ```
//! A request without `hardware` is the legacy distance read.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::reply::{ReplyLine, REPLY_CAPACITY};

/// Hardware name of the distance sensor
pub const HARDWARE_DISTANCE: &str = "distance";

/// Hardware name of the fog trigger
pub const HARDWARE_FOG: &str = "fog";

/// Line buffer capacity for JSON requests
///
/// Fits the longest request, a fog `on` with a five-digit duration, even
/// with a space after every `:` and `,`.
pub const JSON_LINE_CAPACITY: usize = 128;

#[derive(Debug, Deserialize)]
struct Request<'a> {
    #[serde(default, borrow)]
    hardware: Option<&'a str>,
    command: &'a str,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    duration_ms: Option<u32>,
}

/// A validated structured request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JsonCommand {
    DistanceRead,
    /// Raw requested duration; the fog handler validates and clamps it
    FogOn { duration_ms: u32 },
    FogOff,
    FogStatus,
}

/// Errors reported in the `error` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JsonError {
    /// Not a JSON object of the expected shape
    BadRequest,
    UnknownHardware,
    UnknownCommand,
    OutOfRange,
    /// Line exceeded the input buffer
    Overflow,
    /// No sample within the staleness window
    Stale,
}

impl JsonError {
    pub const fn as_str(self) -> &'static str {
        match self {
            JsonError::BadRequest => "bad_request",
            JsonError::UnknownHardware => "unknown_hardware",
            JsonError::UnknownCommand => "unknown_command",
            JsonError::OutOfRange => "out_of_range",
            JsonError::Overflow => "overflow",
            JsonError::Stale => "stale",
        }
    }
}

/// Parse one request line
pub fn parse_request(line: &str) -> Result<JsonCommand, JsonError> {
    let (request, _) =
        serde_json_core::from_str::<Request<'_>>(line).map_err(|_| JsonError::BadRequest)?;

    let hardware = request.hardware.unwrap_or(HARDWARE_DISTANCE);
    let command = request.command;

    if hardware.eq_ignore_ascii_case(HARDWARE_DISTANCE) {
        if command.eq_ignore_ascii_case("read") {
            Ok(JsonCommand::DistanceRead)
        } else {
            Err(JsonError::UnknownCommand)
        }
    } else if hardware.eq_ignore_ascii_case(HARDWARE_FOG) {
        if command.eq_ignore_ascii_case("on") {
            let duration_ms = request
                .payload
                .and_then(|p| p.duration_ms)
                .ok_or(JsonError::BadRequest)?;
            Ok(JsonCommand::FogOn { duration_ms })
        } else if command.eq_ignore_ascii_case("off") {
            Ok(JsonCommand::FogOff)
        } else if command.eq_ignore_ascii_case("status") {
            Ok(JsonCommand::FogStatus)
        } else {
            Err(JsonError::UnknownCommand)
        }
    } else {
        Err(JsonError::UnknownHardware)
    }
}

/// One response object; absent fields are omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl Response {
    /// Fresh distance reading
    pub fn distance(raw: u16, distance_mm: u16, age_ms: u32) -> Self {
        Self {
            ok: true,
            hardware: Some(HARDWARE_DISTANCE),
            raw: Some(raw),
            distance: Some(distance_mm),
            age_ms: Some(age_ms),
            ..Self::default()
        }
    }

    /// Fog output state
    pub fn fog(active: bool, remaining_ms: u32) -> Self {
        Self {
            ok: true,
            hardware: Some(HARDWARE_FOG),
            active: Some(active),
            remaining_ms: Some(remaining_ms),
            ..Self::default()
        }
    }

    /// Error not tied to a hardware element
    pub fn error(err: JsonError) -> Self {
        Self {
            ok: false,
            error: Some(err.as_str()),
            ..Self::default()
        }
    }

    /// Error reported by a specific hardware element
    pub fn hardware_error(hardware: &'static str, err: JsonError) -> Self {
        Self {
            hardware: Some(hardware),
            ..Self::error(err)
        }
    }

    /// Serialize into `out`, replacing its contents
    pub fn render(&self, out: &mut ReplyLine) -> fmt::Result {
        *out = serde_json_core::to_string::<_, REPLY_CAPACITY>(self).map_err(|_| fmt::Error)?;
        Ok(())
    }
}

impl From<JsonError> for Response {
    fn from(err: JsonError) -> Self {
        Response::error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(response: Response) -> ReplyLine {
        let mut out = ReplyLine::new();
        response.render(&mut out).unwrap();
        out
    }

    #[test]
    fn test_parse_fog_on() {
        let cmd = parse_request(r#"{"hardware":"fog","command":"on","payload":{"duration_ms":3000}}"#);
        assert_eq!(cmd, Ok(JsonCommand::FogOn { duration_ms: 3000 }));
    }

    #[test]
    fn test_parse_fog_on_missing_duration() {
        let cmd = parse_request(r#"{"hardware":"fog","command":"on"}"#);
        assert_eq!(cmd, Err(JsonError::BadRequest));
    }

    #[test]
    fn test_parse_fog_off_and_status() {
        assert_eq!(
            parse_request(r#"{"hardware":"fog","command":"off"}"#),
            Ok(JsonCommand::FogOff)
        );
        assert_eq!(
            parse_request(r#"{"hardware":"fog","command":"status"}"#),
            Ok(JsonCommand::FogStatus)
        );
    }

    #[test]
    fn test_parse_distance_read() {
        assert_eq!(
            parse_request(r#"{"hardware":"distance","command":"read"}"#),
            Ok(JsonCommand::DistanceRead)
        );
    }

    #[test]
    fn test_parse_legacy_read() {
        assert_eq!(
            parse_request(r#"{"command":"read"}"#),
            Ok(JsonCommand::DistanceRead)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_request("READ"), Err(JsonError::BadRequest));
        assert_eq!(parse_request(r#"{"hardware":"fog"}"#), Err(JsonError::BadRequest));
        assert_eq!(
            parse_request(r#"{"hardware":"laser","command":"on"}"#),
            Err(JsonError::UnknownHardware)
        );
        assert_eq!(
            parse_request(r#"{"hardware":"fog","command":"explode"}"#),
            Err(JsonError::UnknownCommand)
        );
    }

    #[test]
    fn test_longest_request_fits_line_buffer() {
        use crate::line::{LineReader, LINE_CAPACITY};

        for request in [
            r#"{"hardware":"fog","command":"on","payload":{"duration_ms":60000}}"#,
            r#"{"hardware": "fog", "command": "on", "payload": {"duration_ms": 60000}}"#,
        ] {
            // Too long for the text protocol buffer
            assert!(request.len() > LINE_CAPACITY);

            let mut reader = LineReader::<JSON_LINE_CAPACITY>::new();
            let mut parsed = None;
            for &byte in request.as_bytes().iter().chain(b"\r\n") {
                if let Some(line) = reader.feed(byte) {
                    parsed = Some(line.map(parse_request));
                }
            }
            assert_eq!(
                parsed,
                Some(Ok(Ok(JsonCommand::FogOn { duration_ms: 60000 })))
            );
        }
    }

    #[test]
    fn test_render_distance() {
        assert_eq!(
            rendered(Response::distance(1620, 412, 12)),
            r#"{"ok":true,"hardware":"distance","raw":1620,"distance":412,"age_ms":12}"#
        );
    }

    #[test]
    fn test_render_fog() {
        assert_eq!(
            rendered(Response::fog(true, 3000)),
            r#"{"ok":true,"hardware":"fog","active":true,"remaining_ms":3000}"#
        );
    }

    #[test]
    fn test_render_errors() {
        assert_eq!(
            rendered(JsonError::Overflow.into()),
            r#"{"ok":false,"error":"overflow"}"#
        );
        assert_eq!(
            rendered(Response::hardware_error(HARDWARE_DISTANCE, JsonError::Stale)),
            r#"{"ok":false,"hardware":"distance","error":"stale"}"#
        );
    }
}
