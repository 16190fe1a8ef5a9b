//! Line accumulation for the host link
//!
//! Bytes arrive one at a time from the UART. The reader collects them
//! into a fixed buffer and hands out one trimmed line per terminator.
//! The returned slice borrows the buffer, which is recycled on the next
//! call to [`LineReader::feed`].

use heapless::Vec;

/// Line buffer capacity of the text protocol in bytes
///
/// The longest text command (`POS CCW 360 60000`) is well under this.
/// JSON boards frame with [`JSON_LINE_CAPACITY`] instead.
///
/// [`JSON_LINE_CAPACITY`]: crate::json::JSON_LINE_CAPACITY
pub const LINE_CAPACITY: usize = 64;

/// Errors reported by the line reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the buffer capacity before a terminator arrived
    Overflow,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

/// Fixed-capacity line reader
#[derive(Debug, Clone)]
pub struct LineReader<const N: usize = LINE_CAPACITY> {
    buffer: Vec<u8, N>,
    /// Dropping the tail of an over-long line until its terminator
    discarding: bool,
    /// A line was handed out; clear the buffer before the next byte
    pending_reset: bool,
}

impl<const N: usize> Default for LineReader<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineReader<N> {
    /// Create an empty reader
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            pending_reset: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.pending_reset = false;
    }

    /// Number of bytes currently buffered
    pub fn len(&self) -> usize {
        if self.pending_reset {
            0
        } else {
            self.buffer.len()
        }
    }

    /// Check if no partial line is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feed a single byte
    ///
    /// Returns `Some(Ok(line))` when a terminator completes a non-empty
    /// line, `Some(Err(LineError::Overflow))` exactly once for an
    /// over-long line, and `None` otherwise. Blank lines are ignored.
    pub fn feed(&mut self, byte: u8) -> Option<Result<&str, LineError>> {
        if self.pending_reset {
            self.buffer.clear();
            self.pending_reset = false;
        }

        match byte {
            b'\r' | b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    return None;
                }

                if self.buffer.trim_ascii().is_empty() {
                    self.buffer.clear();
                    return None;
                }

                self.pending_reset = true;
                let line = self.buffer.trim_ascii();
                Some(core::str::from_utf8(line).map_err(|_| LineError::InvalidUtf8))
            }
            _ if self.discarding => None,
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Some(Err(LineError::Overflow));
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::String;
    use std::vec::Vec as StdVec;

    /// Feed bytes and collect every emitted event as owned values
    fn feed_all<const N: usize>(
        reader: &mut LineReader<N>,
        bytes: &[u8],
    ) -> StdVec<Result<String, LineError>> {
        let mut out = StdVec::new();
        for &b in bytes {
            if let Some(event) = reader.feed(b) {
                out.push(event.map(String::from));
            }
        }
        out
    }

    #[test]
    fn test_single_line_newline() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let events = feed_all(&mut reader, b"NAME\n");
        assert_eq!(events, [Ok(String::from("NAME"))]);
    }

    #[test]
    fn test_crlf_yields_one_line() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let events = feed_all(&mut reader, b"SET 2 255 0\r\n");
        assert_eq!(events, [Ok(String::from("SET 2 255 0"))]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let events = feed_all(&mut reader, b"  ROT CW 10 \t\r");
        assert_eq!(events, [Ok(String::from("ROT CW 10"))]);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let events = feed_all(&mut reader, b"\r\n\n   \r\n");
        assert!(events.is_empty());
        assert!(reader.is_empty());
    }

    #[test]
    fn test_consecutive_lines() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let events = feed_all(&mut reader, b"HALT\nSTAT\n");
        assert_eq!(
            events,
            [Ok(String::from("HALT")), Ok(String::from("STAT"))]
        );
    }

    #[test]
    fn test_exact_capacity_fits() {
        let mut reader = LineReader::<8>::new();
        let events = feed_all(&mut reader, b"ABCDEFGH\n");
        assert_eq!(events, [Ok(String::from("ABCDEFGH"))]);
    }

    #[test]
    fn test_overflow_reported_once_then_recovers() {
        let mut reader = LineReader::<8>::new();
        let events = feed_all(&mut reader, b"0123456789ABCDEFGHIJKLMNOP\nNAME\n");
        assert_eq!(
            events,
            [Err(LineError::Overflow), Ok(String::from("NAME"))]
        );
    }

    #[test]
    fn test_overflow_without_terminator_resets_buffer() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let long = [b'x'; LINE_CAPACITY + 1];
        let events = feed_all(&mut reader, &long);
        assert_eq!(events, [Err(LineError::Overflow)]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_invalid_utf8_reported() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        let events = feed_all(&mut reader, &[b'S', 0xFF, 0xFE, b'\n']);
        assert_eq!(events, [Err(LineError::InvalidUtf8)]);

        // Reader keeps working afterwards
        let events = feed_all(&mut reader, b"READ\n");
        assert_eq!(events, [Ok(String::from("READ"))]);
    }

    #[test]
    fn test_reset_drops_partial_line() {
        let mut reader = LineReader::<LINE_CAPACITY>::new();
        feed_all(&mut reader, b"PARTIAL");
        assert_eq!(reader.len(), 7);
        reader.reset();
        let events = feed_all(&mut reader, b"NAME\n");
        assert_eq!(events, [Ok(String::from("NAME"))]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overflow_is_reported_exactly_once(len in (LINE_CAPACITY + 1)..400usize) {
                let mut reader = LineReader::<LINE_CAPACITY>::new();
                let mut bytes = StdVec::new();
                bytes.resize(len, b'a');
                bytes.extend_from_slice(b"\nSTAT\n");
                let events = feed_all(&mut reader, &bytes);
                prop_assert_eq!(
                    events,
                    [Err(LineError::Overflow), Ok(String::from("STAT"))]
                );
            }
        }
    }
}
