//! Override modes triggered by the three buttons.

use serde::{Deserialize, Serialize};

/// Override toggled by one of the buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// All lamps blink together
    BlinkAll,
    /// Red steady, cycle suspended
    RedOnly,
    /// All lamps dark, cycle suspended
    AllOff,
}

impl Override {
    /// Mode label reported while the override is being switched on
    pub const fn mode(self) -> Mode {
        match self {
            Self::BlinkAll => Mode::Blink,
            Self::RedOnly => Mode::RedOnly,
            Self::AllOff => Mode::AllOff,
        }
    }
}

/// Override flags
///
/// The flags are independent: several overrides may be set at once and the
/// status label resolves them by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overrides {
    blink_all: bool,
    red_only: bool,
    all_off: bool,
}

impl Overrides {
    pub const NONE: Self = Self {
        blink_all: false,
        red_only: false,
        all_off: false,
    };

    /// Flip one flag, returning its new value
    pub fn toggle(&mut self, which: Override) -> bool {
        let flag = match which {
            Override::BlinkAll => &mut self.blink_all,
            Override::RedOnly => &mut self.red_only,
            Override::AllOff => &mut self.all_off,
        };
        *flag = !*flag;
        *flag
    }

    pub const fn is_set(self, which: Override) -> bool {
        match which {
            Override::BlinkAll => self.blink_all,
            Override::RedOnly => self.red_only,
            Override::AllOff => self.all_off,
        }
    }

    /// Any override suspends the normal cycle
    pub const fn is_any(self) -> bool {
        self.blink_all || self.red_only || self.all_off
    }
}

/// Mode label of the status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    Blink,
    #[serde(rename = "Red Only")]
    RedOnly,
    #[serde(rename = "All Off")]
    AllOff,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Blink => "Blink",
            Self::RedOnly => "Red Only",
            Self::AllOff => "All Off",
        }
    }
}
