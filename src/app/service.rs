//! Application service — the hexagonal core.
//!
//! [`FanService`] owns the scanner, the inferred/published fan state,
//! and the command sequencer.  It exposes a clean, hardware-agnostic
//! API; all I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!  LineSensePort ──▶ ┌───────────────────────────┐ ──▶ StateSink
//!                    │        FanService          │ ──▶ TimerDisplayPort
//!  IrTransmitPort ◀──│  Scanner · Resolver · Seq  │
//!                    └───────────────────────────┘ ◀─▶ StoragePort
//! ```
//!
//! Concurrency model: single-threaded and tick-driven.  The scanner
//! tick and the sequencer's delayed continuation share one execution
//! context; mutual exclusion is the sequencer's `processing` flag —
//! while a sequence is in flight, scan ticks are dropped entirely
//! (transmitting IR coincides with motor/relay switching that corrupts
//! the optical readings).

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::Result;
use crate::fan::resolver::resolve;
use crate::fan::sequencer::CommandSequencer;
use crate::fan::{FanMode, FanOscillation, FanSpeed, FanState, FanStateSnapshot};
use crate::ir::{decode, Pulse};
use crate::panel::LedScanner;

use super::commands::FanRequest;
use super::ports::{IrTransmitPort, LineSensePort, StateSink, StoragePort, TimerDisplayPort};

/// NVS namespace for bridge state.
const STATE_NAMESPACE: &str = "fanbridge";
/// Key of the persisted state snapshot.
const STATE_KEY: &str = "fanstate";
/// Read buffer size for the snapshot blob.
const SNAPSHOT_BUF: usize = 32;

// ───────────────────────────────────────────────────────────────
// FanService
// ───────────────────────────────────────────────────────────────

pub struct FanService {
    config: SystemConfig,
    scanner: LedScanner,
    sequencer: CommandSequencer,
    /// What the LEDs last told us.  All-Invalid until the first window.
    inferred: FanState,
    /// What observers last saw; also the sequencer's planning baseline.
    reported: FanStateSnapshot,
    state_dirty: bool,
    dirty_since_ms: u32,
}

impl FanService {
    pub fn new(config: SystemConfig, now_ms: u32) -> Self {
        let scanner = LedScanner::new(config.led_poll_interval_ms, now_ms);
        let sequencer = CommandSequencer::new(&config);
        Self {
            config,
            scanner,
            sequencer,
            inferred: FanState::INVALID,
            reported: FanStateSnapshot::default(),
            state_dirty: false,
            dirty_since_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply a previously persisted snapshot.  Call once, before any
    /// ticking begins.  The inferred state stays Invalid until the
    /// first window resolves against the real panel.
    pub fn restore(&mut self, snapshot: FanStateSnapshot) {
        info!(
            "restored state: on={} speed={:?} osc={} preset={:?}",
            snapshot.on, snapshot.speed, snapshot.oscillating, snapshot.preset
        );
        self.reported = snapshot;
    }

    /// Publish the initial observer state.  Call once after `restore`.
    ///
    /// `observers` satisfies both publication ports — a single adapter
    /// usually serves the main state and the timer display together.
    pub fn start(&mut self, observers: &mut (impl StateSink + TimerDisplayPort)) {
        observers.publish(&self.reported);
        observers.publish_label(crate::fan::FanTimer::Off.label());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one pass: advance the sequencer's outstanding timer, then —
    /// unless a sequence is in flight — take one LED sample.
    ///
    /// The `hw` parameter satisfies **both** [`LineSensePort`] and
    /// [`IrTransmitPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl LineSensePort + IrTransmitPort),
        observers: &mut (impl StateSink + TimerDisplayPort),
    ) {
        if self.sequencer.poll(now_ms, hw) {
            // Sequence done: the queued commands were predictions, not
            // confirmed facts.  Re-derive ground truth from the LEDs.
            debug!("sequence complete, resyncing from panel");
            self.scan_once(now_ms, hw, observers);
            return;
        }

        if self.sequencer.is_processing() {
            return;
        }

        self.scan_once(now_ms, hw, observers);
    }

    fn scan_once(
        &mut self,
        now_ms: u32,
        lines: &mut impl LineSensePort,
        observers: &mut (impl StateSink + TimerDisplayPort),
    ) {
        let Some(panel) = self.scanner.tick(now_ms, lines) else {
            return;
        };

        let resolution = resolve(&self.inferred, &panel);
        self.inferred = resolution.next;

        if resolution.timer_changed {
            observers.publish_label(self.inferred.timer.label());
        }

        if resolution.publish {
            self.reported = derive_reported(&self.inferred, &self.reported);
            info!(
                "state: on={} speed={:?} osc={} preset={:?} timer={:?}",
                self.reported.on,
                self.reported.speed,
                self.reported.oscillating,
                self.reported.preset,
                self.inferred.timer
            );
            observers.publish(&self.reported);
            if !self.state_dirty {
                self.state_dirty = true;
                self.dirty_since_ms = now_ms;
            }
        }
    }

    // ── Control ───────────────────────────────────────────────

    /// Handle an external control request.  Silently dropped while a
    /// sequence is in flight.
    pub fn control(&mut self, request: &FanRequest, now_ms: u32, ir: &mut impl IrTransmitPort) {
        self.sequencer.control(request, &self.reported, now_ms, ir);
    }

    /// Cycle the shutdown timer (the external "set timer" trigger).
    pub fn press_timer_button(&mut self, now_ms: u32, ir: &mut impl IrTransmitPort) {
        self.sequencer.send_timer_cycle(&self.reported, now_ms, ir);
    }

    // ── Diagnostics ───────────────────────────────────────────

    /// Dump a received pulse train, if IR diagnostics are enabled.
    ///
    /// Decode is diagnostic-only: the result is logged and discarded,
    /// never fed back into state.
    pub fn on_ir_received(&self, pulses: &[Pulse]) {
        if !self.config.ir_diagnostics {
            return;
        }
        debug!("IR RX: {} pulses", pulses.len());
        match decode(pulses) {
            Ok(bytes) => debug!("IR RX decoded: {:02X?}", &bytes[..]),
            Err(e) => debug!("IR RX not decodable: {}", e),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_processing(&self) -> bool {
        self.sequencer.is_processing()
    }

    pub fn reported(&self) -> &FanStateSnapshot {
        &self.reported
    }

    pub fn inferred(&self) -> &FanState {
        &self.inferred
    }

    // ── Persistence ───────────────────────────────────────────

    /// Persist the published snapshot once it has been stable for the
    /// configured debounce.  Call on every loop pass; returns true when
    /// a write happened.
    pub fn save_if_needed(&mut self, now_ms: u32, storage: &mut impl StoragePort) -> bool {
        if !self.state_dirty {
            return false;
        }
        let debounce_ms = u32::from(self.config.state_save_debounce_secs) * 1000;
        if now_ms.wrapping_sub(self.dirty_since_ms) < debounce_ms {
            return false;
        }
        match self.persist(storage) {
            Ok(()) => {
                debug!("state snapshot persisted");
                self.state_dirty = false;
                true
            }
            Err(e) => {
                // Stay dirty; the next debounce window retries.
                warn!("state snapshot save failed: {}", e);
                false
            }
        }
    }

    fn persist(&self, storage: &mut impl StoragePort) -> Result<()> {
        let bytes = postcard::to_allocvec(&self.reported)
            .map_err(|_| crate::error::Error::Config("snapshot serialization failed"))?;
        storage.write(STATE_NAMESPACE, STATE_KEY, &bytes)?;
        Ok(())
    }

    /// Load the persisted snapshot, if any.  Absence is not an error.
    pub fn load_snapshot(storage: &impl StoragePort) -> Option<FanStateSnapshot> {
        let mut buf = [0u8; SNAPSHOT_BUF];
        let len = storage.read(STATE_NAMESPACE, STATE_KEY, &mut buf).ok()?;
        match postcard::from_bytes(&buf[..len]) {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                warn!("stored state snapshot is corrupt, ignoring");
                None
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Published-state derivation
// ───────────────────────────────────────────────────────────────

/// Fold a freshly inferred state into the published snapshot.
///
/// In Nature mode the panel hides the discrete speed, so only the
/// displayed speed is cleared and the on/off flag is left as last
/// known; in Normal mode a dark speed row means the fan is off.
fn derive_reported(inferred: &FanState, prev: &FanStateSnapshot) -> FanStateSnapshot {
    let mut snapshot = *prev;
    snapshot.preset = inferred.mode;
    snapshot.oscillating = inferred.oscillating == FanOscillation::On;

    if inferred.mode == FanMode::Nature {
        snapshot.speed = FanSpeed::Off;
    } else {
        match inferred.speed {
            FanSpeed::Off => {
                snapshot.on = false;
                snapshot.speed = FanSpeed::Off;
            }
            speed => {
                snapshot.on = true;
                snapshot.speed = speed;
            }
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fan::FanTimer;

    fn inferred(mode: FanMode, speed: FanSpeed, osc: FanOscillation) -> FanState {
        FanState {
            speed,
            oscillating: osc,
            mode,
            timer: FanTimer::Off,
        }
    }

    #[test]
    fn normal_mode_speed_drives_on_flag() {
        let snap = derive_reported(
            &inferred(FanMode::Normal, FanSpeed::High, FanOscillation::Off),
            &FanStateSnapshot::default(),
        );
        assert!(snap.on);
        assert_eq!(snap.speed, FanSpeed::High);

        let snap = derive_reported(
            &inferred(FanMode::Normal, FanSpeed::Off, FanOscillation::Off),
            &snap,
        );
        assert!(!snap.on);
        assert_eq!(snap.speed, FanSpeed::Off);
    }

    #[test]
    fn nature_mode_clears_speed_but_keeps_on_flag() {
        let prev = FanStateSnapshot {
            on: true,
            speed: FanSpeed::Medium,
            oscillating: false,
            preset: FanMode::Normal,
        };
        let snap = derive_reported(
            &inferred(FanMode::Nature, FanSpeed::Off, FanOscillation::Off),
            &prev,
        );
        assert!(snap.on, "Nature hides speed, it does not turn the fan off");
        assert_eq!(snap.speed, FanSpeed::Off);
        assert_eq!(snap.preset, FanMode::Nature);
    }

    #[test]
    fn oscillation_maps_to_bool() {
        let snap = derive_reported(
            &inferred(FanMode::Normal, FanSpeed::Low, FanOscillation::On),
            &FanStateSnapshot::default(),
        );
        assert!(snap.oscillating);
    }

    #[test]
    fn restore_applies_snapshot_without_touching_inferred_state() {
        let mut svc = FanService::new(SystemConfig::default(), 0);
        let snap = FanStateSnapshot {
            on: true,
            speed: FanSpeed::Medium,
            oscillating: true,
            preset: FanMode::Normal,
        };
        svc.restore(snap);
        assert_eq!(*svc.reported(), snap);
        assert_eq!(*svc.inferred(), FanState::INVALID);
    }
}
