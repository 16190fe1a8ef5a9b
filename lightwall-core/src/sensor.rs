//! Cached sensor readings with staleness
//!
//! Sensor tasks write a reading only after a validated frame or sample.
//! The command path reads the cache and never touches the sensor. Once
//! no update has arrived within the timeout the cache reads as empty.

use lightwall_protocol::RadarTarget;

use crate::fog::deadline_reached;

/// Errors from analog sensor conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Raw value outside the calibrated range
    OutOfRange,
    /// ADC conversion failed
    ConversionError,
}

/// IR distance sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceReading {
    /// Raw 12-bit ADC count
    pub raw: u16,
    pub distance_mm: u16,
}

impl DistanceReading {
    pub const NONE: Self = Self {
        raw: 0,
        distance_mm: 0,
    };
}

/// Empty radar reading
pub const NO_TARGET: RadarTarget = RadarTarget {
    x_mm: 0,
    y_mm: 0,
    distance_mm: 0,
    angle_deg: 0,
    speed_cm_s: 0,
};

/// Point-in-time view of a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot<T> {
    pub reading: T,
    /// Time of the last valid update, 0 when invalid
    pub timestamp_ms: u32,
    pub age_ms: u32,
    pub valid: bool,
}

/// Last valid reading of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCache<T> {
    reading: T,
    /// Reported while invalid
    empty: T,
    timestamp_ms: u32,
    valid: bool,
    timeout_ms: u32,
}

impl<T: Copy> SensorCache<T> {
    pub const fn new(empty: T, timeout_ms: u32) -> Self {
        Self {
            reading: empty,
            empty,
            timestamp_ms: 0,
            valid: false,
            timeout_ms,
        }
    }

    /// Store a validated reading
    pub fn update(&mut self, reading: T, now_ms: u32) {
        self.reading = reading;
        self.timestamp_ms = now_ms;
        self.valid = true;
    }

    fn is_stale(&self, now_ms: u32) -> bool {
        deadline_reached(now_ms, self.timestamp_ms.wrapping_add(self.timeout_ms))
    }

    /// Zero and invalidate the reading once it is older than the timeout
    ///
    /// Returns true when this call invalidated it.
    pub fn expire(&mut self, now_ms: u32) -> bool {
        if self.valid && self.is_stale(now_ms) {
            self.reading = self.empty;
            self.timestamp_ms = 0;
            self.valid = false;
            true
        } else {
            false
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Copy of the reading as of `now_ms`
    ///
    /// A reading past its timeout is reported empty even if
    /// [`SensorCache::expire`] has not run yet.
    pub fn snapshot(&self, now_ms: u32) -> SensorSnapshot<T> {
        if !self.valid || self.is_stale(now_ms) {
            return SensorSnapshot {
                reading: self.empty,
                timestamp_ms: 0,
                age_ms: 0,
                valid: false,
            };
        }

        SensorSnapshot {
            reading: self.reading,
            timestamp_ms: self.timestamp_ms,
            age_ms: now_ms.wrapping_sub(self.timestamp_ms),
            valid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(x: i16) -> RadarTarget {
        RadarTarget {
            x_mm: x,
            y_mm: 100,
            distance_mm: 120,
            angle_deg: 10,
            speed_cm_s: 0,
        }
    }

    #[test]
    fn test_starts_invalid() {
        let cache = SensorCache::new(NO_TARGET, 1000);
        let snap = cache.snapshot(0);
        assert!(!snap.valid);
        assert_eq!(snap.reading, NO_TARGET);
    }

    #[test]
    fn test_update_and_age() {
        let mut cache = SensorCache::new(NO_TARGET, 1000);
        cache.update(target(5), 2_000);
        let snap = cache.snapshot(2_250);
        assert!(snap.valid);
        assert_eq!(snap.reading.x_mm, 5);
        assert_eq!(snap.timestamp_ms, 2_000);
        assert_eq!(snap.age_ms, 250);
    }

    #[test]
    fn test_expires_after_timeout() {
        let mut cache = SensorCache::new(NO_TARGET, 1000);
        cache.update(target(5), 2_000);
        assert!(!cache.expire(2_999));
        assert!(cache.is_valid());
        assert!(cache.expire(3_000));

        let snap = cache.snapshot(3_000);
        assert!(!snap.valid);
        assert_eq!(snap.reading, NO_TARGET);
        assert_eq!(snap.timestamp_ms, 0);
    }

    #[test]
    fn test_snapshot_hides_stale_before_expire() {
        let mut cache = SensorCache::new(DistanceReading::NONE, 1000);
        cache.update(DistanceReading { raw: 900, distance_mm: 400 }, 0);
        assert!(!cache.snapshot(1_500).valid);
        // Cache itself not yet expired
        assert!(cache.is_valid());
    }

    #[test]
    fn test_refresh_extends_validity() {
        let mut cache = SensorCache::new(NO_TARGET, 1000);
        cache.update(target(1), 0);
        cache.update(target(2), 900);
        assert!(!cache.expire(1_500));
        assert_eq!(cache.snapshot(1_500).reading.x_mm, 2);
    }
}
