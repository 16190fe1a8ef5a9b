//! Per-channel dimming state
//!
//! A channel holds its current duty plus at most one of a linear fade or
//! a blink. Both advance once per elapsed millisecond from the actuation
//! tick. Fade interpolation uses fixed point with 8 fractional bits:
//!
//! ```text
//! current = start + slope * elapsed      slope = (target - start) / duration
//! ```
//!
//! The result is clamped to 0..=255 and snaps exactly to the target once
//! `elapsed >= duration`.

use fixed::types::I24F8;

/// Blink length in ms
pub const BLINK_MS: u16 = 150;

/// Longest accepted fade
pub const MAX_FADE_MS: u16 = 60_000;

/// Duty at or above which a blink turns the channel off
const BLINK_THRESHOLD: u8 = 128;

/// An in-progress linear fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fade {
    start: u8,
    target: u8,
    duration_ms: u16,
    elapsed_ms: u16,
    /// Duty change per ms
    slope: I24F8,
}

impl Fade {
    fn new(start: u8, target: u8, duration_ms: u16) -> Self {
        let delta = I24F8::from_num(i32::from(target) - i32::from(start));
        Self {
            start,
            target,
            duration_ms,
            elapsed_ms: 0,
            slope: delta / I24F8::from_num(duration_ms),
        }
    }

    /// Duty at the current elapsed time
    fn value(&self) -> u8 {
        let offset = self.slope * I24F8::from_num(self.elapsed_ms);
        let value = (I24F8::from_num(self.start) + offset).round().to_num::<i32>();
        value.clamp(0, 255) as u8
    }
}

/// A running blink and the duty to restore afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Blink {
    remaining_ms: u16,
    restore: u8,
}

/// Duty state of one PWM channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDutyState {
    current: u8,
    fade: Option<Fade>,
    blink: Option<Blink>,
}

impl Default for ChannelDutyState {
    fn default() -> Self {
        Self::off()
    }
}

impl ChannelDutyState {
    /// Channel fully off, nothing scheduled
    pub const fn off() -> Self {
        Self {
            current: 0,
            fade: None,
            blink: None,
        }
    }

    /// Duty driven right now
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Duty the channel settles at once any fade or blink finishes
    pub fn target(&self) -> u8 {
        match (self.blink, self.fade) {
            (Some(blink), _) => blink.restore,
            (None, Some(fade)) => fade.target,
            (None, None) => self.current,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    /// Schedule a fade from the current duty to `target`
    ///
    /// A zero duration (or a target equal to the current duty) applies
    /// immediately. Any running blink or fade is cancelled.
    pub fn set(&mut self, target: u8, duration_ms: u16) {
        let duration_ms = duration_ms.min(MAX_FADE_MS);
        self.blink = None;

        if duration_ms == 0 || target == self.current {
            self.current = target;
            self.fade = None;
        } else {
            self.fade = Some(Fade::new(self.current, target, duration_ms));
        }
    }

    /// Start a blink and return the blink duty
    ///
    /// The channel toggles to full on when below half duty, otherwise
    /// off, for `duration_ms`. A running fade is cancelled. Blinking an
    /// already blinking channel restarts the timer and keeps the
    /// original duty to restore.
    pub fn blink(&mut self, duration_ms: u16) -> u8 {
        let restore = match self.blink {
            Some(blink) => blink.restore,
            None => self.current,
        };
        let level = if restore < BLINK_THRESHOLD { 255 } else { 0 };

        self.fade = None;
        self.current = level;
        self.blink = Some(Blink {
            remaining_ms: duration_ms.max(1),
            restore,
        });
        level
    }

    /// Advance fade or blink by one millisecond
    pub fn advance_ms(&mut self) {
        if let Some(mut blink) = self.blink {
            blink.remaining_ms -= 1;
            if blink.remaining_ms == 0 {
                self.current = blink.restore;
                self.blink = None;
            } else {
                self.blink = Some(blink);
            }
            return;
        }

        if let Some(mut fade) = self.fade {
            fade.elapsed_ms += 1;
            if fade.elapsed_ms >= fade.duration_ms {
                self.current = fade.target;
                self.fade = None;
            } else {
                self.current = fade.value();
                self.fade = Some(fade);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(channel: &mut ChannelDutyState, ms: u32) {
        for _ in 0..ms {
            channel.advance_ms();
        }
    }

    #[test]
    fn test_instant_set() {
        let mut ch = ChannelDutyState::off();
        ch.set(255, 0);
        assert_eq!(ch.current(), 255);
        assert!(!ch.is_fading());
    }

    #[test]
    fn test_fade_reaches_target_exactly() {
        let mut ch = ChannelDutyState::off();
        ch.set(200, 1000);
        assert_eq!(ch.current(), 0);
        advance(&mut ch, 999);
        assert!(ch.is_fading());
        advance(&mut ch, 1);
        assert_eq!(ch.current(), 200);
        assert!(!ch.is_fading());
    }

    #[test]
    fn test_fade_midpoint() {
        let mut ch = ChannelDutyState::off();
        ch.set(100, 0);
        ch.set(200, 100);
        advance(&mut ch, 50);
        assert_eq!(ch.current(), 150);
    }

    #[test]
    fn test_fade_down() {
        let mut ch = ChannelDutyState::off();
        ch.set(255, 0);
        ch.set(0, 255);
        advance(&mut ch, 100);
        assert_eq!(ch.current(), 155);
        advance(&mut ch, 155);
        assert_eq!(ch.current(), 0);
    }

    #[test]
    fn test_slow_fade_is_monotonic() {
        let mut ch = ChannelDutyState::off();
        ch.set(255, MAX_FADE_MS);
        let mut last = 0;
        for _ in 0..MAX_FADE_MS {
            ch.advance_ms();
            assert!(ch.current() >= last);
            last = ch.current();
        }
        assert_eq!(ch.current(), 255);
    }

    #[test]
    fn test_blink_from_dark_goes_full() {
        let mut ch = ChannelDutyState::off();
        ch.set(40, 0);
        assert_eq!(ch.blink(BLINK_MS), 255);
        assert_eq!(ch.current(), 255);
        advance(&mut ch, u32::from(BLINK_MS) - 1);
        assert_eq!(ch.current(), 255);
        advance(&mut ch, 1);
        assert_eq!(ch.current(), 40);
        assert!(!ch.is_blinking());
    }

    #[test]
    fn test_blink_from_bright_goes_dark() {
        let mut ch = ChannelDutyState::off();
        ch.set(128, 0);
        assert_eq!(ch.blink(BLINK_MS), 0);
        advance(&mut ch, u32::from(BLINK_MS));
        assert_eq!(ch.current(), 128);
    }

    #[test]
    fn test_blink_cancels_fade() {
        let mut ch = ChannelDutyState::off();
        ch.set(200, 100);
        advance(&mut ch, 50);
        let mid = ch.current();
        ch.blink(BLINK_MS);
        assert!(!ch.is_fading());
        assert_eq!(ch.target(), mid);
        advance(&mut ch, u32::from(BLINK_MS));
        assert_eq!(ch.current(), mid);
    }

    #[test]
    fn test_set_cancels_blink() {
        let mut ch = ChannelDutyState::off();
        ch.blink(BLINK_MS);
        ch.set(10, 0);
        assert!(!ch.is_blinking());
        advance(&mut ch, u32::from(BLINK_MS));
        assert_eq!(ch.current(), 10);
    }

    #[test]
    fn test_reblink_keeps_restore() {
        let mut ch = ChannelDutyState::off();
        ch.set(30, 0);
        ch.blink(BLINK_MS);
        advance(&mut ch, 100);
        assert_eq!(ch.blink(BLINK_MS), 255);
        advance(&mut ch, u32::from(BLINK_MS));
        assert_eq!(ch.current(), 30);
    }

    #[test]
    fn test_fade_duration_clamped() {
        let mut ch = ChannelDutyState::off();
        ch.set(255, u16::MAX);
        advance(&mut ch, u32::from(MAX_FADE_MS));
        assert_eq!(ch.current(), 255);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fade_lands_on_target(
                start in any::<u8>(),
                target in any::<u8>(),
                duration in 1u16..5000,
            ) {
                let mut ch = ChannelDutyState::off();
                ch.set(start, 0);
                ch.set(target, duration);
                // Elapsed 0 still shows the previous duty
                prop_assert_eq!(ch.current(), start);
                advance(&mut ch, u32::from(duration));
                prop_assert_eq!(ch.current(), target);
                prop_assert!(!ch.is_fading());
            }

            #[test]
            fn fade_stays_between_endpoints(
                start in any::<u8>(),
                target in any::<u8>(),
                duration in 1u16..2000,
                elapsed in 0u16..2000,
            ) {
                let mut ch = ChannelDutyState::off();
                ch.set(start, 0);
                ch.set(target, duration);
                advance(&mut ch, u32::from(elapsed));
                let lo = start.min(target);
                let hi = start.max(target);
                prop_assert!(ch.current() >= lo && ch.current() <= hi);
            }
        }
    }
}
