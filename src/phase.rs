//! Traffic-light cycle phases
//!
//! The phase is never stored. It is derived from the time elapsed since the
//! cycle started, compared against the cumulative phase breakpoints:
//!
//! ```text
//! Red         [0, R)
//! Yellow      [R, R+Y)
//! BlueSteady  [R+Y, R+Y+B-1000)
//! BlueBlink   [R+Y+B-1000, R+Y+B)
//! YellowTail  [R+Y+B, R+Y+B+T)
//! ```

use core::fmt;

use embassy_time::Duration;

use crate::light::Light;

/// Length of the blinking tail at the end of the blue phase
pub const BLINK_WINDOW: Duration = Duration::from_millis(1000);

/// Configuration rejected at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Blue phase does not leave a steady window before the blink tail
    BlueTooShort,
    /// Brightness range minimum above its maximum
    InvertedBrightnessRange,
    /// Blue blink burst without any toggles
    EmptyBlinkBurst,
    /// The controller's tasks did not fit the scheduler
    SchedulerFull,
    /// Sum of the phase durations does not fit a `Duration`
    CycleTooLong,
    /// Phase task period too long to observe the blink window
    PhaseTickTooSlow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BlueTooShort => write!(
                f,
                "blue phase must be longer than the {} ms blink window",
                BLINK_WINDOW.as_millis()
            ),
            ConfigError::InvertedBrightnessRange => {
                write!(f, "brightness minimum exceeds maximum")
            }
            ConfigError::EmptyBlinkBurst => write!(f, "blink burst needs at least one toggle"),
            ConfigError::SchedulerFull => write!(f, "scheduler capacity exceeded"),
            ConfigError::CycleTooLong => write!(f, "phase durations overflow the cycle length"),
            ConfigError::PhaseTickTooSlow => write!(
                f,
                "phase task period must be shorter than the {} ms blink window",
                BLINK_WINDOW.as_millis()
            ),
        }
    }
}

/// Durations of the cycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    red: Duration,
    yellow: Duration,
    blue: Duration,
    tail: Duration,
}

impl PhaseDurations {
    pub const DEFAULT: Self = Self {
        red: Duration::from_millis(2000),
        yellow: Duration::from_millis(500),
        blue: Duration::from_millis(3000),
        tail: Duration::from_millis(500),
    };

    /// Validate phase durations
    ///
    /// `blue` includes the blink tail and must be strictly longer than
    /// [`BLINK_WINDOW`], otherwise the steady blue window is empty. The
    /// whole cycle must fit a `Duration`.
    pub const fn new(
        red: Duration,
        yellow: Duration,
        blue: Duration,
        tail: Duration,
    ) -> Result<Self, ConfigError> {
        if blue.as_ticks() <= BLINK_WINDOW.as_ticks() {
            return Err(ConfigError::BlueTooShort);
        }
        let total = match red.as_ticks().checked_add(yellow.as_ticks()) {
            Some(ticks) => ticks.checked_add(blue.as_ticks()),
            None => None,
        };
        let total = match total {
            Some(ticks) => ticks.checked_add(tail.as_ticks()),
            None => None,
        };
        if total.is_none() {
            return Err(ConfigError::CycleTooLong);
        }
        Ok(Self {
            red,
            yellow,
            blue,
            tail,
        })
    }

    pub const fn red(&self) -> Duration {
        self.red
    }

    pub const fn yellow(&self) -> Duration {
        self.yellow
    }

    pub const fn blue(&self) -> Duration {
        self.blue
    }

    pub const fn tail(&self) -> Duration {
        self.tail
    }

    /// Length of one full cycle, never overflows for validated durations
    pub fn total(&self) -> Duration {
        self.red + self.yellow + self.blue + self.tail
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A phase of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Red,
    Yellow,
    BlueSteady,
    BlueBlink,
    YellowTail,
}

impl Phase {
    /// Phase active `elapsed` after the cycle start
    ///
    /// Returns `None` once the whole cycle has elapsed.
    pub fn at(elapsed: Duration, durations: &PhaseDurations) -> Option<Self> {
        let mut boundary = durations.red;
        if elapsed < boundary {
            return Some(Self::Red);
        }
        boundary += durations.yellow;
        if elapsed < boundary {
            return Some(Self::Yellow);
        }
        boundary += durations.blue - BLINK_WINDOW;
        if elapsed < boundary {
            return Some(Self::BlueSteady);
        }
        boundary += BLINK_WINDOW;
        if elapsed < boundary {
            return Some(Self::BlueBlink);
        }
        boundary += durations.tail;
        if elapsed < boundary {
            return Some(Self::YellowTail);
        }
        None
    }

    /// Lamp the phase shows
    pub const fn light(self) -> Light {
        match self {
            Self::Red => Light::Red,
            Self::Yellow | Self::YellowTail => Light::Yellow,
            Self::BlueSteady | Self::BlueBlink => Light::Blue,
        }
    }
}
