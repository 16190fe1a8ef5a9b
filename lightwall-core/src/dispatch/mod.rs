//! Command dispatch
//!
//! The host link task feeds every line from the [`LineReader`] into a
//! [`LineHandler`], which always renders exactly one reply. Text boards
//! wrap a role-specific [`CommandHandler`] in a [`TextBoard`]; the
//! fog/distance board speaks JSON through [`FogDistanceBoard`].
//!
//! Handlers validate and clamp before touching shared state, and every
//! mutation happens inside a single [`SharedState::with_mut`] closure.
//!
//! [`LineReader`]: lightwall_protocol::LineReader
//! [`SharedState::with_mut`]: crate::sync::SharedState::with_mut

pub mod dimmer;
pub mod motion;
pub mod structured;
pub mod telemetry;

pub use dimmer::DimmerHandler;
pub use motion::MotionHandler;
pub use structured::FogDistanceBoard;
pub use telemetry::TelemetryHandler;

use lightwall_protocol::{Command, ErrorCode, LineError, Reply, ReplyLine};

/// Longest accepted fade, step or position duration
pub const MAX_DURATION_MS: u32 = 60_000;

/// Role-specific handler for parsed text commands
pub trait CommandHandler {
    /// Execute one command and describe the outcome
    ///
    /// Commands the role does not support reply `UNKNOWN_ACTION`.
    fn handle(&mut self, command: Command, now_ms: u32) -> Reply;
}

/// Turns one input line into one reply line
pub trait LineHandler {
    /// Render the reply for `line` into `out`
    ///
    /// Returns true when the command was accepted.
    fn respond(
        &mut self,
        line: Result<&str, LineError>,
        now_ms: u32,
        out: &mut ReplyLine,
    ) -> bool;

    /// Render the ready marker
    fn ready(&self, out: &mut ReplyLine) {
        let _ = Reply::Ready.render(out);
    }
}

/// Text protocol board: answers `NAME` and forwards the rest
pub struct TextBoard<H> {
    name: &'static str,
    handler: H,
}

impl<H: CommandHandler> TextBoard<H> {
    pub fn new(name: &'static str, handler: H) -> Self {
        Self { name, handler }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Parse and execute one line
    pub fn dispatch(&mut self, line: Result<&str, LineError>, now_ms: u32) -> Reply {
        match line.map_err(ErrorCode::from).and_then(Command::parse) {
            Ok(Command::Name) => Reply::Name(self.name),
            Ok(command) => self.handler.handle(command, now_ms),
            Err(code) => Reply::Error(code),
        }
    }
}

impl<H: CommandHandler> LineHandler for TextBoard<H> {
    fn respond(
        &mut self,
        line: Result<&str, LineError>,
        now_ms: u32,
        out: &mut ReplyLine,
    ) -> bool {
        let reply = self.dispatch(line, now_ms);
        if reply.render(out).is_err() {
            let _ = Reply::Error(ErrorCode::Overflow).render(out);
            return false;
        }
        !matches!(reply, Reply::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts only HALT
    struct HaltOnly;

    impl CommandHandler for HaltOnly {
        fn handle(&mut self, command: Command, _now_ms: u32) -> Reply {
            match command {
                Command::Halt => Reply::Halted,
                _ => Reply::Error(ErrorCode::UnknownAction),
            }
        }
    }

    fn respond(
        board: &mut TextBoard<HaltOnly>,
        line: Result<&str, LineError>,
    ) -> (bool, ReplyLine) {
        let mut out = ReplyLine::new();
        let accepted = board.respond(line, 0, &mut out);
        (accepted, out)
    }

    #[test]
    fn test_name_answered_by_board() {
        let mut board = TextBoard::new("prism-2", HaltOnly);
        let (accepted, out) = respond(&mut board, Ok("name"));
        assert!(accepted);
        assert_eq!(out, "prism-2");
    }

    #[test]
    fn test_forwarded_command() {
        let mut board = TextBoard::new("prism-2", HaltOnly);
        let (accepted, out) = respond(&mut board, Ok("STOP"));
        assert!(accepted);
        assert_eq!(out, "OK HALT");
    }

    #[test]
    fn test_unsupported_action() {
        let mut board = TextBoard::new("prism-2", HaltOnly);
        let (accepted, out) = respond(&mut board, Ok("SET 1 2 3"));
        assert!(!accepted);
        assert_eq!(out, "ERR UNKNOWN_ACTION");
    }

    #[test]
    fn test_line_errors() {
        let mut board = TextBoard::new("prism-2", HaltOnly);
        assert_eq!(respond(&mut board, Err(LineError::Overflow)).1, "ERR OVERFLOW");
        assert_eq!(respond(&mut board, Err(LineError::InvalidUtf8)).1, "ERR BAD_ARGS");
    }

    #[test]
    fn test_ready_marker() {
        let board = TextBoard::new("prism-2", HaltOnly);
        let mut out = ReplyLine::new();
        board.ready(&mut out);
        assert_eq!(out, "READY");
    }
}
