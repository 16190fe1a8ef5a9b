//! Rate and position conversions
//!
//! All math is integer; 64-bit intermediates keep every product of the
//! accepted argument ranges exact.

use lightwall_protocol::Direction;

/// Longest representable step interval in ticks
pub const MAX_TICK_INTERVAL: u32 = u32::MAX;

/// Ticks between steps for a continuous rotation rate
///
/// `round(tick_hz * 60 / (rpm * steps_per_rev))`, clamped to
/// `1..=MAX_TICK_INTERVAL`.
pub fn interval_for_rpm(tick_hz: u32, rpm: u32, steps_per_rev: u16) -> u32 {
    let steps_per_min = u64::from(rpm) * u64::from(steps_per_rev);
    if steps_per_min == 0 {
        return MAX_TICK_INTERVAL;
    }

    let ticks_per_min = u64::from(tick_hz) * 60;
    let interval = (ticks_per_min + steps_per_min / 2) / steps_per_min;
    interval.clamp(1, u64::from(MAX_TICK_INTERVAL)) as u32
}

/// Ticks between steps to spread `steps` evenly over `duration_ms`
///
/// Truncating division, clamped to at least one tick.
pub fn interval_for_duration(tick_hz: u32, duration_ms: u32, steps: u32) -> u32 {
    if steps == 0 {
        return 1;
    }

    let duration_ticks = u64::from(duration_ms) * u64::from(tick_hz) / 1000;
    (duration_ticks / u64::from(steps)).clamp(1, u64::from(MAX_TICK_INTERVAL)) as u32
}

/// Nearest step for an angle in degrees, folded into one revolution
///
/// 360 degrees lands on step 0.
pub fn degrees_to_steps(degrees: u32, steps_per_rev: u16) -> u16 {
    if steps_per_rev == 0 {
        return 0;
    }

    let spr = u64::from(steps_per_rev);
    let steps = (u64::from(degrees) * spr + 180) / 360;
    (steps % spr) as u16
}

/// Steps to travel from `current` to `target` in a fixed direction
///
/// Zero means already there.
pub fn seek_delta(current: u16, target: u16, direction: Direction, steps_per_rev: u16) -> u16 {
    if steps_per_rev == 0 {
        return 0;
    }

    let spr = u32::from(steps_per_rev);
    let current = u32::from(current) % spr;
    let target = u32::from(target) % spr;

    let delta = match direction {
        Direction::Clockwise => (target + spr - current) % spr,
        Direction::CounterClockwise => (current + spr - target) % spr,
    };
    delta as u16
}
