//! Fog/distance board: JSON requests in, JSON responses out

use lightwall_protocol::{
    parse_request, JsonCommand, JsonError, LineError, ReplyLine, Response, HARDWARE_DISTANCE,
};

use super::LineHandler;
use crate::fog::FogState;
use crate::sensor::{DistanceReading, SensorCache};
use crate::sync::SharedState;

/// Handles one JSON line at a time against the fog and distance state
pub struct FogDistanceBoard<'a, F, D> {
    name: &'static str,
    fog: &'a F,
    distance: &'a D,
}

impl<'a, F, D> FogDistanceBoard<'a, F, D>
where
    F: SharedState<FogState>,
    D: SharedState<SensorCache<DistanceReading>>,
{
    pub fn new(name: &'static str, fog: &'a F, distance: &'a D) -> Self {
        Self {
            name,
            fog,
            distance,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Execute one parsed request
    pub fn execute(&self, command: JsonCommand, now_ms: u32) -> Response {
        match command {
            JsonCommand::DistanceRead => {
                let snapshot = self.distance.with(|cache| cache.snapshot(now_ms));
                if snapshot.valid {
                    Response::distance(
                        snapshot.reading.raw,
                        snapshot.reading.distance_mm,
                        snapshot.age_ms,
                    )
                } else {
                    Response::hardware_error(HARDWARE_DISTANCE, JsonError::Stale)
                }
            }
            JsonCommand::FogOn { duration_ms: 0 } => JsonError::OutOfRange.into(),
            JsonCommand::FogOn { duration_ms } => {
                let accepted = self.fog.with_mut(|fog| fog.enable(now_ms, duration_ms));
                Response::fog(true, accepted)
            }
            JsonCommand::FogOff => {
                self.fog.with_mut(|fog| fog.disable());
                Response::fog(false, 0)
            }
            JsonCommand::FogStatus => {
                let remaining = self.fog.with(|fog| fog.remaining_ms(now_ms));
                Response::fog(remaining > 0, remaining)
            }
        }
    }

    fn response(&self, line: Result<&str, LineError>, now_ms: u32) -> Response {
        let line = match line {
            Ok(line) => line,
            Err(LineError::Overflow) => return JsonError::Overflow.into(),
            Err(LineError::InvalidUtf8) => return JsonError::BadRequest.into(),
        };

        match parse_request(line) {
            Ok(command) => self.execute(command, now_ms),
            Err(err) => err.into(),
        }
    }
}

impl<'a, F, D> LineHandler for FogDistanceBoard<'a, F, D>
where
    F: SharedState<FogState>,
    D: SharedState<SensorCache<DistanceReading>>,
{
    fn respond(
        &mut self,
        line: Result<&str, LineError>,
        now_ms: u32,
        out: &mut ReplyLine,
    ) -> bool {
        if matches!(line, Ok(l) if l.eq_ignore_ascii_case("NAME")) {
            out.clear();
            return out.push_str(self.name).is_ok();
        }

        let response = self.response(line, now_ms);
        if response.render(out).is_err() {
            let _ = Response::error(JsonError::Overflow).render(out);
            return false;
        }
        response.ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FOG;
    use crate::sync::MockState;

    struct Fixture {
        fog: MockState<FogState>,
        distance: MockState<SensorCache<DistanceReading>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                fog: MockState::new(FogState::IDLE),
                distance: MockState::new(SensorCache::new(
                    DistanceReading::NONE,
                    FOG.sensor_timeout_ms,
                )),
            }
        }

        fn send(&self, line: Result<&str, LineError>, now_ms: u32) -> (bool, ReplyLine) {
            let mut board = FogDistanceBoard::new("fog-1", &self.fog, &self.distance);
            let mut out = ReplyLine::new();
            let ok = board.respond(line, now_ms, &mut out);
            (ok, out)
        }
    }

    #[test]
    fn test_name() {
        let fx = Fixture::new();
        let (ok, out) = fx.send(Ok("NAME"), 0);
        assert!(ok);
        assert_eq!(out, "fog-1");
    }

    #[test]
    fn test_fog_on_then_status() {
        let fx = Fixture::new();
        let (ok, out) = fx.send(
            Ok(r#"{"hardware":"fog","command":"on","payload":{"duration_ms":3000}}"#),
            1_000,
        );
        assert!(ok);
        assert_eq!(
            out,
            r#"{"ok":true,"hardware":"fog","active":true,"remaining_ms":3000}"#
        );

        let (_, out) = fx.send(Ok(r#"{"hardware":"fog","command":"status"}"#), 2_500);
        assert_eq!(
            out,
            r#"{"ok":true,"hardware":"fog","active":true,"remaining_ms":1500}"#
        );

        let (_, out) = fx.send(Ok(r#"{"hardware":"fog","command":"status"}"#), 4_000);
        assert_eq!(
            out,
            r#"{"ok":true,"hardware":"fog","active":false,"remaining_ms":0}"#
        );
    }

    #[test]
    fn test_fog_on_clamped() {
        let fx = Fixture::new();
        let (_, out) = fx.send(
            Ok(r#"{"hardware":"fog","command":"on","payload":{"duration_ms":90000}}"#),
            0,
        );
        assert_eq!(
            out,
            r#"{"ok":true,"hardware":"fog","active":true,"remaining_ms":60000}"#
        );
    }

    #[test]
    fn test_fog_on_zero_rejected() {
        let fx = Fixture::new();
        let (ok, out) = fx.send(
            Ok(r#"{"hardware":"fog","command":"on","payload":{"duration_ms":0}}"#),
            0,
        );
        assert!(!ok);
        assert_eq!(out, r#"{"ok":false,"error":"out_of_range"}"#);
        assert!(!fx.fog.with(|f| f.is_active()));
    }

    #[test]
    fn test_spaced_max_duration_request_framed() {
        use lightwall_protocol::{LineReader, JSON_LINE_CAPACITY};

        let fx = Fixture::new();
        let mut board = FogDistanceBoard::new("fog-1", &fx.fog, &fx.distance);
        let mut reader = LineReader::<JSON_LINE_CAPACITY>::new();
        let mut out = ReplyLine::new();
        let mut replies = 0;

        let request =
            br#"{"hardware": "fog", "command": "on", "payload": {"duration_ms": 60000}}"#;
        for &byte in request.iter().chain(b"\n") {
            if let Some(line) = reader.feed(byte) {
                assert!(board.respond(line, 0, &mut out));
                replies += 1;
            }
        }

        assert_eq!(replies, 1);
        assert_eq!(
            out,
            r#"{"ok":true,"hardware":"fog","active":true,"remaining_ms":60000}"#
        );
        assert!(fx.fog.with(|f| f.is_active()));
    }

    #[test]
    fn test_fog_off() {
        let fx = Fixture::new();
        fx.fog.with_mut(|f| f.enable(0, 5_000));
        let (ok, out) = fx.send(Ok(r#"{"hardware":"fog","command":"off"}"#), 10);
        assert!(ok);
        assert_eq!(
            out,
            r#"{"ok":true,"hardware":"fog","active":false,"remaining_ms":0}"#
        );
        assert!(!fx.fog.with(|f| f.is_active()));
    }

    #[test]
    fn test_distance_read() {
        let fx = Fixture::new();
        fx.distance.with_mut(|c| {
            c.update(
                DistanceReading {
                    raw: 1620,
                    distance_mm: 412,
                },
                100,
            )
        });

        let expected = r#"{"ok":true,"hardware":"distance","raw":1620,"distance":412,"age_ms":12}"#;
        assert_eq!(fx.send(Ok(r#"{"hardware":"distance","command":"read"}"#), 112).1, expected);
        // Legacy form without hardware
        assert_eq!(fx.send(Ok(r#"{"command":"read"}"#), 112).1, expected);
    }

    #[test]
    fn test_replies_name_their_hardware() {
        use lightwall_protocol::HARDWARE_FOG;

        let fx = Fixture::new();
        let (_, out) = fx.send(Ok(r#"{"hardware":"fog","command":"status"}"#), 0);
        assert!(out.contains(HARDWARE_FOG));
        let (_, out) = fx.send(Ok(r#"{"command":"read"}"#), 0);
        assert!(out.contains(HARDWARE_DISTANCE));
    }

    #[test]
    fn test_distance_stale() {
        let fx = Fixture::new();
        let (ok, out) = fx.send(Ok(r#"{"command":"read"}"#), 5_000);
        assert!(!ok);
        assert_eq!(out, r#"{"ok":false,"hardware":"distance","error":"stale"}"#);
    }

    #[test]
    fn test_errors() {
        let fx = Fixture::new();
        assert_eq!(
            fx.send(Ok("not json"), 0).1,
            r#"{"ok":false,"error":"bad_request"}"#
        );
        assert_eq!(
            fx.send(Ok(r#"{"hardware":"lamp","command":"on"}"#), 0).1,
            r#"{"ok":false,"error":"unknown_hardware"}"#
        );
        assert_eq!(
            fx.send(Ok(r#"{"hardware":"fog","command":"explode"}"#), 0).1,
            r#"{"ok":false,"error":"unknown_command"}"#
        );
        assert_eq!(
            fx.send(Err(LineError::Overflow), 0).1,
            r#"{"ok":false,"error":"overflow"}"#
        );
        assert_eq!(
            fx.send(Err(LineError::InvalidUtf8), 0).1,
            r#"{"ok":false,"error":"bad_request"}"#
        );
    }
}
