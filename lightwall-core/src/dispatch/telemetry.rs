//! Radar board: `READ` returns the cached target

use lightwall_protocol::{Command, ErrorCode, RadarTarget, Reply, TelemetryReport};

use super::CommandHandler;
use crate::sensor::SensorCache;
use crate::sync::SharedState;

pub struct TelemetryHandler<'a, S> {
    cache: &'a S,
}

impl<'a, S> TelemetryHandler<'a, S>
where
    S: SharedState<SensorCache<RadarTarget>>,
{
    pub fn new(cache: &'a S) -> Self {
        Self { cache }
    }

    /// Current report; all fields zero when the reading is stale
    pub fn report(&self, now_ms: u32) -> TelemetryReport {
        let snapshot = self.cache.with(|cache| cache.snapshot(now_ms));
        TelemetryReport {
            timestamp_ms: snapshot.timestamp_ms,
            target: snapshot.reading,
        }
    }
}

impl<'a, S> CommandHandler for TelemetryHandler<'a, S>
where
    S: SharedState<SensorCache<RadarTarget>>,
{
    fn handle(&mut self, command: Command, now_ms: u32) -> Reply {
        match command {
            Command::Read => Reply::Telemetry(self.report(now_ms)),
            _ => Reply::Error(ErrorCode::UnknownAction),
        }
    }
}
