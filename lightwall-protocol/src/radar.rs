//! RD-03D radar frame parsing
//!
//! The module streams fixed-size report frames at 256000 baud:
//! ```text
//! ┌────┬────┬────┬────┬───────────────────────┬────┬────┐
//! │ AA │ FF │ 03 │ 00 │ payload (24 bytes)    │ 55 │ CC │
//! └────┴────┴────┴────┴───────────────────────┴────┴────┘
//! ```
//! The payload holds three 8-byte target slots; only the first is used.
//! Each slot is `x`, `y`, `speed` (sign-magnitude, bit 15 set = positive)
//! followed by an unsigned pixel distance, all little-endian.

use heapless::Vec;

/// Frame header bytes
pub const RADAR_HEADER: [u8; 4] = [0xAA, 0xFF, 0x03, 0x00];

/// Frame tail bytes
pub const RADAR_TAIL: [u8; 2] = [0x55, 0xCC];

/// Payload length between header and tail
pub const RADAR_PAYLOAD_LEN: usize = 24;

/// UART baud rate of the RD-03D
pub const RADAR_BAUD_RATE: u32 = 256_000;

/// Errors reported by the frame parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadarFrameError {
    /// Payload was not followed by `55 CC`
    BadTail,
}

/// First target slot of a validated frame, signs applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadarFrame {
    pub x_mm: i16,
    pub y_mm: i16,
    pub speed_cm_s: i16,
    pub pixel_distance: u16,
    /// False when all four raw fields were zero
    pub detected: bool,
}

impl RadarFrame {
    /// Decode the first target slot of a payload
    pub fn decode(payload: &[u8; RADAR_PAYLOAD_LEN]) -> Self {
        let raw_x = u16::from_le_bytes([payload[0], payload[1]]);
        let raw_y = u16::from_le_bytes([payload[2], payload[3]]);
        let raw_speed = u16::from_le_bytes([payload[4], payload[5]]);
        let pixel_distance = u16::from_le_bytes([payload[6], payload[7]]);

        Self {
            x_mm: sign_magnitude(raw_x),
            y_mm: sign_magnitude(raw_y),
            speed_cm_s: sign_magnitude(raw_speed),
            pixel_distance,
            detected: (raw_x | raw_y | raw_speed | pixel_distance) != 0,
        }
    }
}

/// RD-03D signed field: bit 15 set means positive
fn sign_magnitude(raw: u16) -> i16 {
    let magnitude = (raw & 0x7FFF) as i16;
    if raw & 0x8000 != 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Decoded target in the installation's frame of reference
///
/// All fields are zero when no target is present or the reading is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadarTarget {
    pub x_mm: i16,
    pub y_mm: i16,
    pub distance_mm: u16,
    pub angle_deg: i16,
    pub speed_cm_s: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitHeader1,
    WaitHeader2,
    WaitType,
    WaitLength,
    Payload,
    Tail1,
    Tail2,
}

/// Byte-at-a-time RD-03D frame parser
#[derive(Debug, Clone)]
pub struct RadarFrameParser {
    state: ParseState,
    payload: Vec<u8, RADAR_PAYLOAD_LEN>,
}

impl Default for RadarFrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RadarFrameParser {
    pub const fn new() -> Self {
        Self {
            state: ParseState::WaitHeader1,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::WaitHeader1;
        self.payload.clear();
    }

    /// Restart sync, treating `byte` as a possible header start
    fn resync(&mut self, byte: u8) {
        self.reset();
        if byte == RADAR_HEADER[0] {
            self.state = ParseState::WaitHeader2;
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(frame))` on a complete frame with a valid tail,
    /// `Err(BadTail)` when the tail does not match, `Ok(None)` otherwise.
    /// Header mismatches resynchronize silently.
    pub fn feed(&mut self, byte: u8) -> Result<Option<RadarFrame>, RadarFrameError> {
        match self.state {
            ParseState::WaitHeader1 => {
                if byte == RADAR_HEADER[0] {
                    self.state = ParseState::WaitHeader2;
                }
            }
            ParseState::WaitHeader2 => {
                if byte == RADAR_HEADER[1] {
                    self.state = ParseState::WaitType;
                } else {
                    self.resync(byte);
                }
            }
            ParseState::WaitType => {
                if byte == RADAR_HEADER[2] {
                    self.state = ParseState::WaitLength;
                } else {
                    self.resync(byte);
                }
            }
            ParseState::WaitLength => {
                if byte == RADAR_HEADER[3] {
                    self.payload.clear();
                    self.state = ParseState::Payload;
                } else {
                    self.resync(byte);
                }
            }
            ParseState::Payload => {
                // Capacity equals the payload length, so this cannot fail
                let _ = self.payload.push(byte);
                if self.payload.is_full() {
                    self.state = ParseState::Tail1;
                }
            }
            ParseState::Tail1 => {
                if byte == RADAR_TAIL[0] {
                    self.state = ParseState::Tail2;
                } else {
                    self.resync(byte);
                    return Err(RadarFrameError::BadTail);
                }
            }
            ParseState::Tail2 => {
                if byte != RADAR_TAIL[1] {
                    self.resync(byte);
                    return Err(RadarFrameError::BadTail);
                }

                let mut payload = [0u8; RADAR_PAYLOAD_LEN];
                payload.copy_from_slice(&self.payload);
                self.reset();
                return Ok(Some(RadarFrame::decode(&payload)));
            }
        }
        Ok(None)
    }

    /// Feed multiple bytes, returning the last complete frame
    ///
    /// Bad tails are skipped; the radar streams continuously so only the
    /// newest frame matters.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<RadarFrame> {
        let mut latest = None;
        for &byte in bytes {
            if let Ok(Some(frame)) = self.feed(byte) {
                latest = Some(frame);
            }
        }
        latest
    }
}
