//! Board capability descriptors
//!
//! One shared actuation core serves every board; a [`BoardProfile`]
//! tells it how fast to tick, how many PWM channels exist, their
//! polarity and resolution, and the stepper geometry.

/// Role a board plays in the installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardRole {
    /// Stepper-driven rotating prism
    Prism,
    /// Dimmable light channels
    Light,
    /// Dimmable laser channels
    Laser,
    /// Fog trigger plus IR distance sensor, JSON protocol
    FogDistance,
    /// RD-03D motion radar telemetry
    Radar,
}

impl BoardRole {
    /// Check if this role speaks the JSON protocol
    pub const fn is_structured(self) -> bool {
        matches!(self, BoardRole::FogDistance)
    }
}

/// Software PWM resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmResolution {
    /// 256 phase steps per period
    Bits8,
    /// 32 phase steps per period
    Bits5,
}

impl PwmResolution {
    /// Number of phase steps in one PWM period
    pub const fn steps(self) -> u16 {
        match self {
            PwmResolution::Bits8 => 256,
            PwmResolution::Bits5 => 32,
        }
    }

    /// Right shift that scales an 8-bit duty to this resolution
    pub const fn shift(self) -> u32 {
        match self {
            PwmResolution::Bits8 => 0,
            PwmResolution::Bits5 => 3,
        }
    }

    /// Scale an 8-bit duty to a compare level
    pub const fn scale(self, duty: u8) -> u16 {
        (duty as u16) >> self.shift()
    }
}

/// Compile-time capability descriptor for one board role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardProfile {
    /// Identifier returned by `NAME`
    pub name: &'static str,
    pub role: BoardRole,
    /// Actuation tick rate (1 kHz to 20 kHz)
    pub tick_hz: u32,
    /// Number of PWM channels driven by the scheduler
    pub channels: usize,
    pub resolution: PwmResolution,
    /// PWM outputs are active-low
    pub inverted: bool,
    /// Full steps per stepper revolution (0 when no stepper is fitted)
    pub steps_per_rev: u16,
    /// Sensor staleness window in ms (0 when no sensor is fitted)
    pub sensor_timeout_ms: u32,
}

/// Lowest supported tick rate
pub const MIN_TICK_HZ: u32 = 1_000;

/// Highest supported tick rate
pub const MAX_TICK_HZ: u32 = 20_000;

impl BoardProfile {
    /// Scheduler ticks per elapsed millisecond
    pub const fn ticks_per_ms(&self) -> u32 {
        let ticks = self.tick_hz / 1000;
        if ticks == 0 {
            1
        } else {
            ticks
        }
    }

    /// Tick period in microseconds
    pub const fn tick_period_us(&self) -> u64 {
        1_000_000 / self.tick_hz as u64
    }

    /// Check if a stepper is fitted
    pub const fn has_stepper(&self) -> bool {
        self.steps_per_rev > 0
    }

    /// Check the profile against the limits of the scheduler
    ///
    /// Intended for `const` assertions in board modules.
    pub const fn is_valid(&self) -> bool {
        self.tick_hz >= MIN_TICK_HZ
            && self.tick_hz <= MAX_TICK_HZ
            && self.tick_hz % 1000 == 0
            && !(matches!(self.role, BoardRole::Prism) && self.steps_per_rev == 0)
    }

    /// Copy of this profile under a different name
    pub const fn named(self, name: &'static str) -> Self {
        Self { name, ..self }
    }
}

/// Rotating prism: one stepper, no PWM channels
pub const PRISM: BoardProfile = BoardProfile {
    name: "prism",
    role: BoardRole::Prism,
    tick_hz: 10_000,
    channels: 0,
    resolution: PwmResolution::Bits8,
    inverted: false,
    steps_per_rev: 200,
    sensor_timeout_ms: 0,
};

/// Eight dimmable light channels
pub const LIGHT: BoardProfile = BoardProfile {
    name: "light",
    role: BoardRole::Light,
    tick_hz: 20_000,
    channels: 8,
    resolution: PwmResolution::Bits8,
    inverted: false,
    steps_per_rev: 0,
    sensor_timeout_ms: 0,
};

/// Four laser channels on active-low drivers
pub const LASER: BoardProfile = BoardProfile {
    name: "laser",
    role: BoardRole::Laser,
    tick_hz: 4_000,
    channels: 4,
    resolution: PwmResolution::Bits5,
    inverted: true,
    steps_per_rev: 0,
    sensor_timeout_ms: 0,
};

/// Fog relay and IR distance sensor
pub const FOG: BoardProfile = BoardProfile {
    name: "fog",
    role: BoardRole::FogDistance,
    tick_hz: 1_000,
    channels: 0,
    resolution: PwmResolution::Bits8,
    inverted: false,
    steps_per_rev: 0,
    sensor_timeout_ms: 1_000,
};

/// RD-03D radar telemetry
pub const RADAR: BoardProfile = BoardProfile {
    name: "radar",
    role: BoardRole::Radar,
    tick_hz: 1_000,
    channels: 0,
    resolution: PwmResolution::Bits8,
    inverted: false,
    steps_per_rev: 0,
    sensor_timeout_ms: 1_000,
};
