//! System configuration parameters
//!
//! All tunable parameters for the fan bridge.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Panel sampling ---
    /// LED sense poll interval (milliseconds).  Must be fast enough to
    /// catch the panel's multiplex cycle.
    pub led_poll_interval_ms: u32,

    // --- Command sequencing ---
    /// Settle delay after a power-on command (milliseconds).  The fan
    /// transiently shows Medium for a few seconds while the motor ramps
    /// before landing at Low; presses during that window are lost.
    pub power_on_settle_ms: u32,
    /// Settle delay between any other two commands (milliseconds).
    pub command_settle_ms: u32,
    /// Delay between the last command of a sequence and the ground-truth
    /// resync scan (milliseconds).
    pub resync_delay_ms: u32,

    // --- Persistence ---
    /// How long the published state must sit unchanged before it is
    /// written back to NVS (seconds).
    pub state_save_debounce_secs: u16,

    // --- Diagnostics ---
    /// Decode and hex-dump received IR pulse trains.
    pub ir_diagnostics: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Panel sampling
            led_poll_interval_ms: 10,

            // Command sequencing
            power_on_settle_ms: 3200,
            command_settle_ms: 150,
            resync_delay_ms: 50,

            // Persistence
            state_save_debounce_secs: 5,

            // Diagnostics
            ir_diagnostics: false,
        }
    }
}
