//! Fan domain model.
//!
//! Two views of the fan exist side by side:
//!
//! - [`FanState`] — what the panel LEDs say the fan is physically doing.
//!   Starts all-Invalid and is only ever written by the resolver.
//! - [`FanStateSnapshot`] — the externally published truth (on/off,
//!   speed, oscillation, preset).  This is what downstream observers
//!   see, what gets persisted across reboots, and what the command
//!   sequencer treats as "current state" when planning IR sequences.

pub mod resolver;
pub mod sequencer;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerated fan attributes
// ---------------------------------------------------------------------------

/// Discrete fan speed.  `Invalid` means "not yet inferred".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FanSpeed {
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Invalid = 100,
}

impl FanSpeed {
    /// Numeric speed level used by the step planner (Off/Invalid → 0).
    pub const fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Off | Self::Invalid => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FanOscillation {
    Off = 0,
    On = 1,
    Invalid = 100,
}

/// Preset operating program.  `Nature` runs an internal breeze pattern
/// whose speed is not shown on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FanMode {
    Off = 0,
    Normal = 1,
    Nature = 2,
    Invalid = 100,
}

impl FanMode {
    /// Display label as shown on downstream UIs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "🌬️ Normal",
            Self::Nature => "🍃 Nature",
            Self::Off | Self::Invalid => "---",
        }
    }
}

/// Shutdown timer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FanTimer {
    Off = 0,
    H1 = 1,
    H2 = 2,
    H4 = 3,
    H8 = 4,
    Invalid = 255,
}

impl FanTimer {
    /// Display label for the timer text display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::H1 => "1.0h",
            Self::H2 => "2.0h",
            Self::H4 => "4.0h",
            Self::H8 => "8.0h",
            Self::Off | Self::Invalid => "---",
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate states
// ---------------------------------------------------------------------------

/// The fan state as inferred from the panel LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanState {
    pub speed: FanSpeed,
    pub oscillating: FanOscillation,
    pub mode: FanMode,
    pub timer: FanTimer,
}

impl FanState {
    /// Pre-first-window state: nothing is known yet.
    pub const INVALID: FanState = FanState {
        speed: FanSpeed::Invalid,
        oscillating: FanOscillation::Invalid,
        mode: FanMode::Invalid,
        timer: FanTimer::Invalid,
    };
}

/// The published, externally visible state.
///
/// Persisted to NVS (postcard) so a reboot restores the last known
/// truth before the first LED window resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanStateSnapshot {
    pub on: bool,
    pub speed: FanSpeed,
    pub oscillating: bool,
    pub preset: FanMode,
}

impl Default for FanStateSnapshot {
    fn default() -> Self {
        Self {
            on: false,
            speed: FanSpeed::Off,
            oscillating: false,
            preset: FanMode::Off,
        }
    }
}
