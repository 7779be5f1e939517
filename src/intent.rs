//! Intents delivered to the controller
//!
//! Edge-trigger handlers never touch controller state. They push an intent
//! into an [`IntentChannel`](crate::IntentChannel) and the poll loop applies
//! it on its next iteration.

use crate::mode::Override;
use crate::phase::PhaseDurations;

/// Requested change of the signal light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalIntent {
    /// A button edge: flip the override
    Toggle(Override),
    /// Replace the phase durations, effective from the next phase tick
    Durations(PhaseDurations),
}
