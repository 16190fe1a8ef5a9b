//! Command tokenizing and parsing
//!
//! A line is split on ASCII whitespace into one action token and up to
//! [`MAX_ARGS`] argument tokens. Tokens borrow the line buffer; nothing is
//! copied. Numeric arguments are parsed strictly and carried raw, range
//! checks and clamping belong to the board handler that owns the limits.

use crate::line::LineError;

/// Maximum number of argument tokens after the action
pub const MAX_ARGS: usize = 3;

/// Stable error reason codes sent as `ERR <CODE>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Wrong argument count, non-numeric or malformed token
    BadArgs,
    /// Action not known to this board
    UnknownAction,
    /// Numeric value outside its accepted range
    OutOfRange,
    /// Channel index beyond the board's channel count
    UnknownDevice,
    /// Line exceeded the input buffer
    Overflow,
    /// Motor driver fault is latched
    Fault,
}

impl ErrorCode {
    /// Wire representation of the code
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadArgs => "BAD_ARGS",
            ErrorCode::UnknownAction => "UNKNOWN_ACTION",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::UnknownDevice => "UNKNOWN_DEVICE",
            ErrorCode::Overflow => "OVERFLOW",
            ErrorCode::Fault => "FAULT",
        }
    }
}

impl From<LineError> for ErrorCode {
    fn from(err: LineError) -> Self {
        match err {
            LineError::Overflow => ErrorCode::Overflow,
            LineError::InvalidUtf8 => ErrorCode::BadArgs,
        }
    }
}

/// Rotation direction of a stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Parse a `CW` / `CCW` token, case-insensitive
    pub fn parse(token: &str) -> Result<Self, ErrorCode> {
        if token.eq_ignore_ascii_case("CW") {
            Ok(Direction::Clockwise)
        } else if token.eq_ignore_ascii_case("CCW") {
            Ok(Direction::CounterClockwise)
        } else {
            Err(ErrorCode::BadArgs)
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Clockwise => "CW",
            Direction::CounterClockwise => "CCW",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Recognized action tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Name,
    Rotate,
    Step,
    Position,
    Halt,
    Status,
    Set,
    Blink,
    Read,
}

/// Action keywords. `STOP` is what the host motor controller sends.
const ACTION_TABLE: [(&str, Action); 10] = [
    ("NAME", Action::Name),
    ("ROT", Action::Rotate),
    ("STP", Action::Step),
    ("POS", Action::Position),
    ("HALT", Action::Halt),
    ("STOP", Action::Halt),
    ("STAT", Action::Status),
    ("SET", Action::Set),
    ("BLINK", Action::Blink),
    ("READ", Action::Read),
];

impl Action {
    /// Match an action token, case-insensitive
    pub fn parse(token: &str) -> Result<Self, ErrorCode> {
        ACTION_TABLE
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(token))
            .map(|&(_, action)| action)
            .ok_or(ErrorCode::UnknownAction)
    }
}

/// Zero-copy view of one tokenized line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokens<'a> {
    action: &'a str,
    args: [&'a str; MAX_ARGS],
    count: usize,
    /// More than [`MAX_ARGS`] arguments were present
    excess: bool,
}

impl<'a> Tokens<'a> {
    /// Split a line into its action and argument tokens
    ///
    /// An empty line is `BadArgs`. Excess arguments are remembered and
    /// reported by [`Tokens::expect`], so an unknown action still wins.
    pub fn split(line: &'a str) -> Result<Self, ErrorCode> {
        let mut iter = line.split_ascii_whitespace();
        let action = iter.next().ok_or(ErrorCode::BadArgs)?;

        let mut tokens = Self {
            action,
            args: [""; MAX_ARGS],
            count: 0,
            excess: false,
        };

        for token in iter {
            if tokens.count == MAX_ARGS {
                tokens.excess = true;
                break;
            }
            tokens.args[tokens.count] = token;
            tokens.count += 1;
        }

        Ok(tokens)
    }

    pub fn action(&self) -> &'a str {
        self.action
    }

    pub fn args(&self) -> &[&'a str] {
        &self.args[..self.count]
    }

    /// Return exactly `N` argument tokens, or `BadArgs`
    pub fn expect<const N: usize>(&self) -> Result<[&'a str; N], ErrorCode> {
        if self.excess || self.count != N {
            return Err(ErrorCode::BadArgs);
        }
        let mut out = [""; N];
        out.copy_from_slice(&self.args[..N]);
        Ok(out)
    }
}

/// Strict unsigned decimal parse
///
/// Any non-digit (including a sign) is `BadArgs`; a value that does not
/// fit in `u32` is `OutOfRange`.
pub fn parse_u32(token: &str) -> Result<u32, ErrorCode> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErrorCode::BadArgs);
    }

    token.bytes().try_fold(0u32, |acc, b| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or(ErrorCode::OutOfRange)
    })
}

/// One parsed host command
///
/// Arguments are the raw parsed values; each board handler validates
/// and clamps them against its own limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Report the board identifier
    Name,
    /// Rotate continuously
    Rotate { direction: Direction, rpm: u32 },
    /// Emit a step count spread over a duration
    Step {
        direction: Direction,
        steps: u32,
        duration_ms: u32,
    },
    /// Seek an absolute angle
    Position {
        direction: Direction,
        degrees: u32,
        duration_ms: u32,
    },
    /// Abort all motion (`HALT` or `STOP`)
    Halt,
    /// Report motion state
    Status,
    /// Fade a channel to a brightness
    Set {
        channel: u32,
        brightness: u32,
        duration_ms: u32,
    },
    /// Blink a channel
    Blink { channel: u32 },
    /// Report the cached sensor reading
    Read,
}

impl Command {
    /// Tokenize and parse one trimmed line
    pub fn parse(line: &str) -> Result<Self, ErrorCode> {
        let tokens = Tokens::split(line)?;
        let action = Action::parse(tokens.action())?;

        let command = match action {
            Action::Name => {
                tokens.expect::<0>()?;
                Command::Name
            }
            Action::Rotate => {
                let [dir, rpm] = tokens.expect::<2>()?;
                Command::Rotate {
                    direction: Direction::parse(dir)?,
                    rpm: parse_u32(rpm)?,
                }
            }
            Action::Step => {
                let [dir, steps, ms] = tokens.expect::<3>()?;
                Command::Step {
                    direction: Direction::parse(dir)?,
                    steps: parse_u32(steps)?,
                    duration_ms: parse_u32(ms)?,
                }
            }
            Action::Position => {
                let [dir, degrees, ms] = tokens.expect::<3>()?;
                Command::Position {
                    direction: Direction::parse(dir)?,
                    degrees: parse_u32(degrees)?,
                    duration_ms: parse_u32(ms)?,
                }
            }
            Action::Halt => {
                tokens.expect::<0>()?;
                Command::Halt
            }
            Action::Status => {
                tokens.expect::<0>()?;
                Command::Status
            }
            Action::Set => {
                let [channel, brightness, ms] = tokens.expect::<3>()?;
                Command::Set {
                    channel: parse_u32(channel)?,
                    brightness: parse_u32(brightness)?,
                    duration_ms: parse_u32(ms)?,
                }
            }
            Action::Blink => {
                let [channel] = tokens.expect::<1>()?;
                Command::Blink {
                    channel: parse_u32(channel)?,
                }
            }
            Action::Read => {
                tokens.expect::<0>()?;
                Command::Read
            }
        };

        Ok(command)
    }

    /// Action this command was parsed from
    pub fn action(&self) -> Action {
        match self {
            Command::Name => Action::Name,
            Command::Rotate { .. } => Action::Rotate,
            Command::Step { .. } => Action::Step,
            Command::Position { .. } => Action::Position,
            Command::Halt => Action::Halt,
            Command::Status => Action::Status,
            Command::Set { .. } => Action::Set,
            Command::Blink { .. } => Action::Blink,
            Command::Read => Action::Read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            Command::parse("SET 2 255 0"),
            Ok(Command::Set {
                channel: 2,
                brightness: 255,
                duration_ms: 0,
            })
        );
    }

    #[test]
    fn test_action_case_insensitive() {
        assert_eq!(
            Command::parse("rot ccw 30"),
            Ok(Command::Rotate {
                direction: Direction::CounterClockwise,
                rpm: 30,
            })
        );
        assert_eq!(Command::parse("Stat"), Ok(Command::Status));
    }

    #[test]
    fn test_stop_is_halt() {
        assert_eq!(Command::parse("STOP"), Ok(Command::Halt));
        assert_eq!(Command::parse("HALT"), Ok(Command::Halt));
    }

    #[test]
    fn test_unknown_action() {
        assert_eq!(Command::parse("JUMP 1"), Err(ErrorCode::UnknownAction));
    }

    #[test]
    fn test_unknown_action_beats_excess_args() {
        assert_eq!(Command::parse("JUMP 1 2 3 4"), Err(ErrorCode::UnknownAction));
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(Command::parse("SET 2 255"), Err(ErrorCode::BadArgs));
        assert_eq!(Command::parse("BLINK"), Err(ErrorCode::BadArgs));
    }

    #[test]
    fn test_extra_argument() {
        assert_eq!(Command::parse("SET 2 255 0 9"), Err(ErrorCode::BadArgs));
        assert_eq!(Command::parse("NAME now"), Err(ErrorCode::BadArgs));
    }

    #[test]
    fn test_bad_direction() {
        assert_eq!(Command::parse("ROT LEFT 10"), Err(ErrorCode::BadArgs));
    }

    #[test]
    fn test_parse_u32_strict() {
        assert_eq!(parse_u32("0"), Ok(0));
        assert_eq!(parse_u32("4294967295"), Ok(u32::MAX));
        assert_eq!(parse_u32("4294967296"), Err(ErrorCode::OutOfRange));
        assert_eq!(parse_u32("12a"), Err(ErrorCode::BadArgs));
        assert_eq!(parse_u32("-1"), Err(ErrorCode::BadArgs));
        assert_eq!(parse_u32("+1"), Err(ErrorCode::BadArgs));
        assert_eq!(parse_u32(""), Err(ErrorCode::BadArgs));
        // Non-digit wins over overflow
        assert_eq!(parse_u32("99999999999x"), Err(ErrorCode::BadArgs));
    }

    #[test]
    fn test_tokens_split_extra_whitespace() {
        let tokens = Tokens::split("POS  CW\t90   500").unwrap();
        assert_eq!(tokens.action(), "POS");
        assert_eq!(tokens.args(), &["CW", "90", "500"]);
    }

    #[test]
    fn test_tokens_empty_line() {
        assert_eq!(Tokens::split("   "), Err(ErrorCode::BadArgs));
    }

    #[test]
    fn test_line_error_mapping() {
        assert_eq!(ErrorCode::from(LineError::Overflow), ErrorCode::Overflow);
        assert_eq!(ErrorCode::from(LineError::InvalidUtf8), ErrorCode::BadArgs);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Clockwise.opposite(), Direction::CounterClockwise);
        assert_eq!(Direction::CounterClockwise.as_str(), "CCW");
    }

    #[test]
    fn test_command_action() {
        let cmd = Command::parse("BLINK 3").unwrap();
        assert_eq!(cmd.action(), Action::Blink);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_u32_parses_back(value: u32) {
                let mut buf = heapless::String::<16>::new();
                core::fmt::Write::write_fmt(&mut buf, format_args!("{}", value)).unwrap();
                prop_assert_eq!(parse_u32(&buf), Ok(value));
            }

            #[test]
            fn parse_never_panics(line in "[ -~]{0,64}") {
                let _ = Command::parse(&line);
            }
        }
    }
}
