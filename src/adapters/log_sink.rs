//! Log-based publication adapter.
//!
//! Implements [`StateSink`] and [`TimerDisplayPort`] by writing the
//! published state to the ESP-IDF logger (UART / USB-CDC in
//! production).  A future network bridge would implement the same
//! traits.

use log::info;

use crate::app::ports::{StateSink, TimerDisplayPort};
use crate::fan::FanStateSnapshot;

/// Adapter that logs every published state to the serial console.
pub struct LogStateSink;

impl LogStateSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogStateSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSink for LogStateSink {
    fn publish(&mut self, snapshot: &FanStateSnapshot) {
        info!(
            "FAN   | {} | speed={:?} | osc={} | preset={}",
            if snapshot.on { "ON" } else { "OFF" },
            snapshot.speed,
            if snapshot.oscillating { "on" } else { "off" },
            snapshot.preset.label(),
        );
    }
}

impl TimerDisplayPort for LogStateSink {
    fn publish_label(&mut self, label: &'static str) {
        info!("TIMER | {}", label);
    }
}
