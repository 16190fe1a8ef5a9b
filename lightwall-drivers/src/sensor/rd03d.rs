//! RD-03D target decoding
//!
//! Turns the raw first-target slot into distance and bearing. Bearing is
//! measured from the sensor's boresight (the +y axis), positive toward
//! +x, so a target straight ahead reads 0 degrees.

use micromath::F32Ext;

use lightwall_core::sensor::{SensorCache, NO_TARGET};
use lightwall_core::sync::SharedState;
use lightwall_protocol::{RadarFrame, RadarFrameParser, RadarTarget};

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Derive distance and angle for a decoded frame
///
/// Frames without a target yield an all-zero target.
pub fn decode_target(frame: &RadarFrame) -> RadarTarget {
    if !frame.detected {
        return NO_TARGET;
    }

    let x = f32::from(frame.x_mm);
    let y = f32::from(frame.y_mm);
    let angle = -(y.atan2(x) * RAD_TO_DEG - 90.0);

    RadarTarget {
        x_mm: frame.x_mm,
        y_mm: frame.y_mm,
        distance_mm: hypot_mm(frame.x_mm, frame.y_mm),
        angle_deg: angle.round() as i16,
        speed_cm_s: frame.speed_cm_s,
    }
}

/// `round(sqrt(x^2 + y^2))` in integer math
///
/// Both axes are at most 32767 mm, so the result always fits in `u16`.
fn hypot_mm(x: i16, y: i16) -> u16 {
    let x = u64::from(x.unsigned_abs());
    let y = u64::from(y.unsigned_abs());
    let square = x * x + y * y;
    let root = square.isqrt();
    // (r + 0.5)^2 = r^2 + r + 0.25
    let rounded = if square - root * root > root {
        root + 1
    } else {
        root
    };
    rounded as u16
}

/// Receive side of one radar module
///
/// Owns the frame parser and publishes every validated frame into the
/// shared cache. Corrupt frames never reach the cache.
pub struct Rd03d {
    parser: RadarFrameParser,
}

impl Default for Rd03d {
    fn default() -> Self {
        Self::new()
    }
}

impl Rd03d {
    pub const fn new() -> Self {
        Self {
            parser: RadarFrameParser::new(),
        }
    }

    /// Feed received bytes; returns the newest target if a frame completed
    pub fn ingest<S>(&mut self, bytes: &[u8], cache: &S, now_ms: u32) -> Option<RadarTarget>
    where
        S: SharedState<SensorCache<RadarTarget>>,
    {
        let target = decode_target(&self.parser.feed_bytes(bytes)?);
        cache.with_mut(|c| c.update(target, now_ms));
        Some(target)
    }

    /// Drop a partial frame after a UART error
    pub fn resync(&mut self) {
        self.parser.reset();
    }
}
