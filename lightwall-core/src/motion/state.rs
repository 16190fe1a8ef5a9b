//! Motion state shared between the command path and the actuation tick

use lightwall_protocol::{Direction, MotionMode, MotionReport};

/// What the stepper is currently doing
///
/// Always replaced as a whole so the tick never observes a mode paired
/// with a stale interval or count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Drive {
    pub mode: MotionMode,
    pub direction: Direction,
    /// Ticks between steps, 0 iff idle
    pub interval: u32,
    /// Steps left for finite modes
    pub remaining: u32,
    /// Ticks since the last step
    counter: u32,
}

impl Drive {
    pub const IDLE: Self = Self {
        mode: MotionMode::Idle,
        direction: Direction::Clockwise,
        interval: 0,
        remaining: 0,
        counter: 0,
    };

    fn running(mode: MotionMode, direction: Direction, interval: u32, remaining: u32) -> Self {
        Self {
            mode,
            direction,
            interval: interval.max(1),
            remaining,
            counter: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.mode == MotionMode::Idle
    }
}

/// Stepper state for one motorized channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionState {
    drive: Drive,
    /// Absolute position in `[0, steps_per_rev)`
    position: u16,
    steps_per_rev: u16,
    /// Fault seen since the last successful `HALT`
    fault_latched: bool,
    /// Fault input level at the last tick
    fault_input: bool,
}

impl MotionState {
    pub const fn new(steps_per_rev: u16) -> Self {
        Self {
            drive: Drive::IDLE,
            position: 0,
            steps_per_rev,
            fault_latched: false,
            fault_input: false,
        }
    }

    pub fn drive(&self) -> Drive {
        self.drive
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    pub fn steps_per_rev(&self) -> u16 {
        self.steps_per_rev
    }

    pub fn is_idle(&self) -> bool {
        self.drive.is_idle()
    }

    pub fn is_faulted(&self) -> bool {
        self.fault_latched
    }

    /// Rotate continuously
    pub fn rotate(&mut self, direction: Direction, interval: u32) {
        self.drive = Drive::running(MotionMode::RotateContinuous, direction, interval, 0);
    }

    /// Emit `steps` steps; zero steps leaves the motor idle
    pub fn step(&mut self, direction: Direction, steps: u32, interval: u32) {
        self.drive = if steps == 0 {
            Drive::IDLE
        } else {
            Drive::running(MotionMode::StepFinite, direction, interval, steps)
        };
    }

    /// Travel `delta` steps toward an absolute target
    ///
    /// A zero delta means already there and leaves the motor idle.
    pub fn seek(&mut self, direction: Direction, delta: u16, interval: u32) {
        self.drive = if delta == 0 {
            Drive::IDLE
        } else {
            Drive::running(MotionMode::PositionSeek, direction, interval, u32::from(delta))
        };
    }

    /// Stop all motion; also clears a latched fault once the input released
    pub fn halt(&mut self) {
        self.drive = Drive::IDLE;
        if !self.fault_input {
            self.fault_latched = false;
        }
    }

    /// Record the fault input level, aborting motion while asserted
    ///
    /// Returns true when this call aborted a running drive.
    pub fn observe_fault(&mut self, asserted: bool) -> bool {
        self.fault_input = asserted;
        if !asserted {
            return false;
        }

        let was_running = !self.drive.is_idle();
        self.drive = Drive::IDLE;
        self.fault_latched = true;
        was_running
    }

    /// Advance by one tick, returning the direction of a due step
    pub fn tick(&mut self) -> Option<Direction> {
        if self.drive.is_idle() {
            return None;
        }

        self.drive.counter += 1;
        if self.drive.counter < self.drive.interval {
            return None;
        }
        self.drive.counter = 0;

        let direction = self.drive.direction;
        self.advance_position(direction);

        if self.drive.mode != MotionMode::RotateContinuous {
            self.drive.remaining = self.drive.remaining.saturating_sub(1);
            if self.drive.remaining == 0 {
                self.drive = Drive::IDLE;
            }
        }

        Some(direction)
    }

    fn advance_position(&mut self, direction: Direction) {
        if self.steps_per_rev == 0 {
            return;
        }

        self.position = match direction {
            Direction::Clockwise => {
                if self.position + 1 >= self.steps_per_rev {
                    0
                } else {
                    self.position + 1
                }
            }
            Direction::CounterClockwise => {
                if self.position == 0 {
                    self.steps_per_rev - 1
                } else {
                    self.position - 1
                }
            }
        };
    }

    /// Snapshot for `STAT`
    pub fn report(&self) -> MotionReport {
        MotionReport {
            mode: self.drive.mode,
            direction: self.drive.direction,
            position: self.position,
            interval: self.drive.interval,
            remaining: self.drive.remaining,
            fault: self.fault_latched,
        }
    }
}
