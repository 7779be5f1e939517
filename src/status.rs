//! Status record
//!
//! One flat JSON object per emission, field order fixed for downstream
//! parsers:
//!
//! ```text
//! {"Light":"Red","Red":1,"Yellow":0,"Blue":0,"Mode":"Normal","Brightness":255}
//! ```

use serde::{Deserialize, Serialize};

use crate::controller::SignalState;
use crate::light::Light;
use crate::mode::{Mode, Override};

/// Capacity of a serialized status line
pub const STATUS_LINE_CAPACITY: usize = 128;

/// Serialized status record
pub type StatusLine = heapless::String<STATUS_LINE_CAPACITY>;

/// Label of the currently active light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightLabel {
    #[serde(rename = "All Blinking")]
    AllBlinking,
    Off,
    Red,
    Yellow,
    Blinking,
    Blue,
}

/// Snapshot of the outputs and mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(rename = "Light")]
    pub light: LightLabel,
    #[serde(rename = "Red")]
    pub red: u8,
    #[serde(rename = "Yellow")]
    pub yellow: u8,
    #[serde(rename = "Blue")]
    pub blue: u8,
    #[serde(rename = "Mode")]
    pub mode: Mode,
    #[serde(rename = "Brightness")]
    pub brightness: u8,
}

impl StatusRecord {
    /// Read the current state into a record
    pub fn snapshot(state: &SignalState, brightness: u8) -> Self {
        let lights = state.lights();
        Self {
            light: resolve_label(state),
            red: lights.indicator(Light::Red),
            yellow: lights.indicator(Light::Yellow),
            blue: lights.indicator(Light::Blue),
            mode: state.mode(),
            brightness,
        }
    }

    /// Serialize into a single line without trailing newline
    pub fn to_line(&self) -> serde_json_core::ser::Result<StatusLine> {
        serde_json_core::to_string(self)
    }
}

/// Override flags win over lamp flags; the blink latch wins over steady blue
fn resolve_label(state: &SignalState) -> LightLabel {
    let overrides = state.overrides();
    let lights = state.lights();

    if overrides.is_set(Override::BlinkAll) {
        LightLabel::AllBlinking
    } else if overrides.is_set(Override::AllOff) {
        LightLabel::Off
    } else if overrides.is_set(Override::RedOnly) {
        LightLabel::Red
    } else if lights.is_on(Light::Red) {
        LightLabel::Red
    } else if lights.is_on(Light::Yellow) {
        LightLabel::Yellow
    } else if state.blue_blink_started() {
        LightLabel::Blinking
    } else if lights.is_on(Light::Blue) {
        LightLabel::Blue
    } else {
        LightLabel::Off
    }
}
