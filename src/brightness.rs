//! Brightness source
//!
//! Maps the raw potentiometer reading onto the lamp intensity shared by
//! every light write.

use crate::math8::map_range;
use crate::phase::ConfigError;

/// Largest raw reading of the brightness input (10-bit ADC)
pub const RAW_INPUT_MAX: u16 = 1023;

/// Output intensity range the raw input is mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessRange {
    min: u8,
    max: u8,
}

impl BrightnessRange {
    /// Lamps never go fully dark through the knob alone
    pub const DEFAULT: Self = Self { min: 5, max: 255 };

    pub const fn new(min: u8, max: u8) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedBrightnessRange);
        }
        Ok(Self { min, max })
    }

    pub const fn min(self) -> u8 {
        self.min
    }

    pub const fn max(self) -> u8 {
        self.max
    }

    /// Map a raw reading into the range
    pub const fn map(self, raw: u16) -> u8 {
        map_range(raw, RAW_INPUT_MAX, self.min, self.max)
    }
}

impl Default for BrightnessRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Holds the current brightness level, updated once per sampling tick
#[derive(Debug, Clone)]
pub struct BrightnessSource {
    range: BrightnessRange,
    level: u8,
}

impl BrightnessSource {
    pub const fn new(range: BrightnessRange, initial: u8) -> Self {
        Self {
            range,
            level: initial,
        }
    }

    /// Map a raw reading and store it as the current level
    pub fn sample(&mut self, raw: u16) -> u8 {
        self.level = self.range.map(raw);
        self.level
    }

    pub const fn level(&self) -> u8 {
        self.level
    }

    pub const fn range(&self) -> BrightnessRange {
        self.range
    }
}
