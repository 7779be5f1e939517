#![no_std]

pub mod brightness;
pub mod channel;
pub mod controller;
pub mod intent;
pub mod light;
pub mod math8;
pub mod mode;
pub mod phase;
pub mod scheduler;
pub mod status;

pub use brightness::{BrightnessRange, BrightnessSource, RAW_INPUT_MAX};
pub use channel::{Delivery, IntentChannel, IntentReceiver, IntentSender, TrySendError};
pub use controller::{SignalConfig, SignalController, SignalState, TaskId, TaskTimings};
pub use intent::SignalIntent;
pub use light::{Light, LightStates, Rgb};
pub use mode::{Mode, Override, Overrides};
pub use phase::{BLINK_WINDOW, ConfigError, Phase, PhaseDurations};
pub use scheduler::{Iteration, Iterations, Scheduler, SchedulerError, TaskSpec};
pub use status::{LightLabel, StatusLine, StatusRecord};

pub use embassy_time::{Duration, Instant};

/// Abstract PWM driver trait
///
/// Implement this trait to support different hardware platforms.
/// The controller is generic over this trait.
pub trait OutputDriver {
    /// Set the PWM intensity of one lamp (0 = dark)
    fn write(&mut self, light: Light, intensity: u8);
}

/// Brightness knob, sampled periodically
pub trait BrightnessInput {
    /// Raw reading in `0..=RAW_INPUT_MAX`
    fn read(&mut self) -> u16;
}

/// Destination of the status stream (usually a serial port)
pub trait StatusSink {
    /// Emit one status record, without line terminator
    fn emit(&mut self, line: &str);
}
