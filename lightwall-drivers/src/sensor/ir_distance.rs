//! Analog IR distance ranger
//!
//! Sharp GP2Y0A21-class sensor: output voltage falls off roughly as the
//! inverse of distance over 10-80 cm. Conversion goes through a lookup
//! table with linear interpolation; integer math only.

use lightwall_core::sensor::{DistanceReading, SensorError};
use lightwall_hal::{AnalogInput, ADC_MAX};

/// Output voltage against distance
///
/// Table format: (millivolts, distance_mm), sorted by decreasing voltage
/// (increasing distance).
const DISTANCE_TABLE: &[(u16, u16)] = &[
    (2300, 100),
    (1650, 150),
    (1300, 200),
    (1080, 250),
    (920, 300),
    (750, 400),
    (600, 500),
    (500, 600),
    (450, 700),
    (400, 800),
];

/// Below this the sensor is unpowered or disconnected
const MIN_VALID_MV: u16 = 100;

/// IR ranger on one ADC channel
pub struct IrDistanceSensor<A> {
    adc: A,
    /// ADC reference voltage in mV
    vref_mv: u16,
}

impl<A> IrDistanceSensor<A> {
    /// # Arguments
    /// - `adc`: channel wired to the sensor output
    /// - `vref_mv`: ADC reference voltage (3300 on the RP2040)
    pub fn new(adc: A, vref_mv: u16) -> Self {
        Self { adc, vref_mv }
    }

    /// Convert a 12-bit sample to millivolts
    pub fn raw_to_mv(&self, raw: u16) -> u16 {
        let raw = u32::from(raw.min(ADC_MAX));
        (raw * u32::from(self.vref_mv) / u32::from(ADC_MAX)) as u16
    }

    /// Distance for a sensor voltage
    ///
    /// Voltages beyond the table clamp to its nearest or farthest entry;
    /// a near-zero voltage is reported as [`SensorError::OutOfRange`].
    pub fn mv_to_mm(mv: u16) -> Result<u16, SensorError> {
        if mv < MIN_VALID_MV {
            return Err(SensorError::OutOfRange);
        }

        let (near_mv, near_mm) = DISTANCE_TABLE[0];
        let (far_mv, far_mm) = DISTANCE_TABLE[DISTANCE_TABLE.len() - 1];
        if mv >= near_mv {
            return Ok(near_mm);
        }
        if mv <= far_mv {
            return Ok(far_mm);
        }

        for pair in DISTANCE_TABLE.windows(2) {
            let (mv_high, mm_low) = pair[0];
            let (mv_low, mm_high) = pair[1];

            if mv <= mv_high && mv >= mv_low {
                // mm = mm_low + (mm_high - mm_low) * (mv_high - mv) / (mv_high - mv_low)
                let mv_range = u32::from(mv_high - mv_low);
                let mm_range = u32::from(mm_high - mm_low);
                let mv_offset = u32::from(mv_high - mv);

                return Ok(mm_low + (mm_range * mv_offset / mv_range) as u16);
            }
        }

        Err(SensorError::OutOfRange)
    }
}

impl<A: AnalogInput> IrDistanceSensor<A> {
    /// Sample once and convert
    pub fn read(&mut self) -> Result<DistanceReading, SensorError> {
        let raw = self
            .adc
            .sample()
            .map_err(|_| SensorError::ConversionError)?;
        let distance_mm = Self::mv_to_mm(self.raw_to_mv(raw))?;

        Ok(DistanceReading { raw, distance_mm })
    }
}
