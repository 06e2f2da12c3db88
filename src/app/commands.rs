//! Inbound control requests.
//!
//! A [`FanRequest`] mirrors what the original remote can express: power,
//! a target speed, oscillation, and the preset program.  Fields left
//! `None` are "don't touch".  Requests come from whatever integration
//! layer sits above this crate (serial console, network bridge, …) and
//! are compiled into IR sequences by the
//! [`CommandSequencer`](crate::fan::sequencer::CommandSequencer).

use crate::fan::{FanMode, FanSpeed};

/// One external control request.  Unset fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanRequest {
    /// Desired power state.
    pub state: Option<bool>,
    /// Desired speed (only meaningful together with `state: Some(true)`).
    pub speed: Option<FanSpeed>,
    /// Desired oscillation.
    pub oscillating: Option<bool>,
    /// Desired preset program.
    pub preset: Option<FanMode>,
}

impl FanRequest {
    /// Request the fan on at a given speed.
    pub fn turn_on(speed: FanSpeed) -> Self {
        Self {
            state: Some(true),
            speed: Some(speed),
            ..Self::default()
        }
    }

    /// Request the fan off.
    pub fn turn_off() -> Self {
        Self {
            state: Some(false),
            ..Self::default()
        }
    }
}
