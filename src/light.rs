//! Lamps of the signal head and their on/off flags.

use smart_leds::RGB8;

use crate::math8::scale8;

pub type Rgb = RGB8;

const RED_LENS: Rgb = Rgb { r: 255, g: 0, b: 0 };
const YELLOW_LENS: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 0,
};
const BLUE_LENS: Rgb = Rgb { r: 0, g: 0, b: 255 };

/// One lamp of the signal head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Light {
    Red,
    Yellow,
    Blue,
}

impl Light {
    /// All lamps in output channel order
    pub const ALL: [Light; 3] = [Light::Red, Light::Yellow, Light::Blue];

    /// Output channel index of the lamp
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Yellow => 1,
            Self::Blue => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
        }
    }

    /// Lens color at full intensity
    pub const fn color(self) -> Rgb {
        match self {
            Self::Red => RED_LENS,
            Self::Yellow => YELLOW_LENS,
            Self::Blue => BLUE_LENS,
        }
    }

    /// Lens color dimmed to the given PWM intensity
    pub const fn lit_color(self, intensity: u8) -> Rgb {
        let lens = self.color();
        Rgb {
            r: scale8(lens.r, intensity),
            g: scale8(lens.g, intensity),
            b: scale8(lens.b, intensity),
        }
    }
}

/// On/off flags of the three lamps, as last written to the outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightStates {
    red: bool,
    yellow: bool,
    blue: bool,
}

impl LightStates {
    pub const OFF: Self = Self {
        red: false,
        yellow: false,
        blue: false,
    };

    pub const ALL: Self = Self {
        red: true,
        yellow: true,
        blue: true,
    };

    /// Only `light` is on
    pub const fn only(light: Light) -> Self {
        Self::OFF.with(light, true)
    }

    #[must_use]
    pub const fn with(mut self, light: Light, on: bool) -> Self {
        match light {
            Light::Red => self.red = on,
            Light::Yellow => self.yellow = on,
            Light::Blue => self.blue = on,
        }
        self
    }

    pub const fn is_on(self, light: Light) -> bool {
        match light {
            Light::Red => self.red,
            Light::Yellow => self.yellow,
            Light::Blue => self.blue,
        }
    }

    /// Status indicator of the lamp (0 or 1)
    pub const fn indicator(self, light: Light) -> u8 {
        if self.is_on(light) { 1 } else { 0 }
    }
}
