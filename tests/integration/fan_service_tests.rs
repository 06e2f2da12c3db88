//! Integration tests for the FanService → scanner/resolver/sequencer
//! pipeline.
//!
//! These run on the host and drive the full service API with mock
//! adapters: scripted sense lines in, recorded IR frames and state
//! publications out, with an explicit millisecond clock.

use crate::mock_hw::{MockHardware, MockNvs, RecordingObserver};

use fanbridge::app::commands::FanRequest;
use fanbridge::app::service::FanService;
use fanbridge::config::SystemConfig;
use fanbridge::fan::{FanMode, FanSpeed, FanStateSnapshot};
use fanbridge::ir::IrCommand;
use fanbridge::panel::{SenseLine, SAMPLE_WINDOW};

fn make_service() -> (FanService, MockHardware, RecordingObserver) {
    let svc = FanService::new(SystemConfig::default(), 0);
    (svc, MockHardware::new(), RecordingObserver::new())
}

fn on_at(speed: FanSpeed) -> FanStateSnapshot {
    FanStateSnapshot {
        on: true,
        speed,
        oscillating: false,
        preset: FanMode::Normal,
    }
}

/// Drive one full debounce window, 10 ms per sample starting at `start_ms`.
fn run_window(
    svc: &mut FanService,
    hw: &mut MockHardware,
    obs: &mut RecordingObserver,
    start_ms: u32,
) {
    for step in 0..u32::from(SAMPLE_WINDOW) {
        svc.tick(start_ms + step * 10, hw, obs);
    }
}

// ── Scan → resolve → publish ─────────────────────────────────

#[test]
fn dark_panel_resolves_to_nature_off_and_publishes_once() {
    let (mut svc, mut hw, mut obs) = make_service();
    run_window(&mut svc, &mut hw, &mut obs, 10);

    let snap = obs.last_snapshot().expect("first window must publish");
    assert!(!snap.on);
    assert_eq!(snap.speed, FanSpeed::Off);
    assert_eq!(snap.preset, FanMode::Nature);
    assert_eq!(obs.snapshots.len(), 1);
    assert_eq!(obs.labels, vec!["---"], "timer display initialised");

    // A second identical window publishes nothing new.
    run_window(&mut svc, &mut hw, &mut obs, 500);
    assert_eq!(obs.snapshots.len(), 1);
    assert_eq!(obs.labels.len(), 1);
}

#[test]
fn lit_panel_resolves_to_normal_high() {
    let (mut svc, mut hw, mut obs) = make_service();
    hw.light_normal_mode();
    hw.set_level(SenseLine::High, false);
    run_window(&mut svc, &mut hw, &mut obs, 10);

    let snap = obs.last_snapshot().unwrap();
    assert!(snap.on);
    assert_eq!(snap.speed, FanSpeed::High);
    assert_eq!(snap.preset, FanMode::Normal);
}

#[test]
fn timer_display_shows_the_lit_position() {
    let (mut svc, mut hw, mut obs) = make_service();
    hw.light_only_timer_row(1); // row 1 of column 0 is the 8 h cell
    run_window(&mut svc, &mut hw, &mut obs, 10);
    assert_eq!(obs.labels, vec!["8.0h"]);

    // Timer back to off on the next window.
    hw.set_level(SenseLine::Col1, true);
    run_window(&mut svc, &mut hw, &mut obs, 500);
    assert_eq!(obs.labels, vec!["8.0h", "---"]);
}

#[test]
fn conflicting_timer_cells_resolve_to_eight_hours() {
    let (mut svc, mut hw, mut obs) = make_service();
    // All four rows driven with column 1 low: 1h, 8h, 2h and 4h cells
    // all win their votes; the fixed check order leaves 8h standing.
    hw.set_level(SenseLine::Col1, false);
    run_window(&mut svc, &mut hw, &mut obs, 10);
    assert_eq!(obs.labels, vec!["8.0h"]);
}

// ── Control → sequence → resync ──────────────────────────────

#[test]
fn power_on_to_high_runs_the_full_timed_sequence() {
    let (mut svc, mut hw, mut obs) = make_service();

    svc.control(&FanRequest::turn_on(FanSpeed::High), 0, &mut hw);
    assert!(svc.is_processing());
    assert_eq!(hw.frames.len(), 1, "On goes out immediately");

    // Scanning is suppressed for the whole sequence.
    svc.tick(100, &mut hw, &mut obs);
    assert_eq!(hw.line_reads, 0, "no optical reads while transmitting");

    svc.tick(3199, &mut hw, &mut obs);
    assert_eq!(hw.frames.len(), 1, "motor ramp settle not elapsed");
    svc.tick(3200, &mut hw, &mut obs);
    assert_eq!(hw.frames.len(), 2, "first speed step after 3200 ms");

    svc.tick(3349, &mut hw, &mut obs);
    assert_eq!(hw.frames.len(), 2);
    svc.tick(3350, &mut hw, &mut obs);
    assert_eq!(hw.frames.len(), 3, "second speed step after 150 ms");

    svc.tick(3399, &mut hw, &mut obs);
    assert!(svc.is_processing());
    svc.tick(3400, &mut hw, &mut obs);
    assert!(!svc.is_processing(), "resync 50 ms after the last press");
    assert!(hw.line_reads > 0, "resync takes a real sample");

    assert_eq!(
        hw.payloads(),
        vec![
            IrCommand::On.payload(),
            IrCommand::SpeedStep.payload(),
            IrCommand::SpeedStep.payload(),
        ]
    );
}

#[test]
fn oscillate_only_request_is_one_press_then_resync() {
    let (mut svc, mut hw, mut obs) = make_service();
    svc.restore(on_at(FanSpeed::Medium));

    let req = FanRequest {
        oscillating: Some(true),
        ..FanRequest::default()
    };
    svc.control(&req, 0, &mut hw);
    assert_eq!(hw.payloads(), vec![IrCommand::OscillateToggle.payload()]);

    svc.tick(49, &mut hw, &mut obs);
    assert!(svc.is_processing());
    svc.tick(50, &mut hw, &mut obs);
    assert!(!svc.is_processing());
    assert_eq!(hw.frames.len(), 1, "nothing further transmitted");
}

#[test]
fn requests_during_a_sequence_are_dropped() {
    let (mut svc, mut hw, mut obs) = make_service();
    svc.restore(on_at(FanSpeed::Medium));

    let osc = FanRequest {
        oscillating: Some(true),
        ..FanRequest::default()
    };
    svc.control(&osc, 0, &mut hw);
    assert_eq!(hw.frames.len(), 1);

    svc.control(&FanRequest::turn_off(), 10, &mut hw);
    assert_eq!(hw.frames.len(), 1, "mid-sequence request ignored");

    // After the resync the sequencer accepts requests again.
    svc.tick(50, &mut hw, &mut obs);
    svc.control(&FanRequest::turn_off(), 60, &mut hw);
    assert_eq!(hw.frames.len(), 2);
    assert_eq!(hw.payloads()[1], IrCommand::Off.payload());
}

#[test]
fn timer_button_cycles_only_while_on() {
    let (mut svc, mut hw, _obs) = make_service();

    svc.press_timer_button(0, &mut hw);
    assert!(hw.frames.is_empty(), "fan off: button ignored");

    svc.restore(on_at(FanSpeed::Low));
    svc.press_timer_button(10, &mut hw);
    assert_eq!(hw.payloads(), vec![IrCommand::TimerCycle.payload()]);
    assert!(svc.is_processing());
}

// ── Restore / persistence ────────────────────────────────────

#[test]
fn start_publishes_the_restored_snapshot() {
    let (mut svc, _hw, mut obs) = make_service();
    let snap = on_at(FanSpeed::Medium);
    svc.restore(snap);
    svc.start(&mut obs);
    assert_eq!(obs.snapshots, vec![snap]);
    assert_eq!(obs.labels, vec!["---"]);
}

#[test]
fn missing_snapshot_is_not_an_error() {
    let nvs = MockNvs::new();
    assert!(FanService::load_snapshot(&nvs).is_none());
}

#[test]
fn published_state_persists_after_the_debounce() {
    let (mut svc, mut hw, mut obs) = make_service();
    let mut nvs = MockNvs::new();

    hw.light_normal_mode();
    hw.set_level(SenseLine::Medium, false);
    run_window(&mut svc, &mut hw, &mut obs, 10);
    assert!(obs.last_snapshot().is_some());

    // Still inside the 5 s debounce: nothing written.
    assert!(!svc.save_if_needed(1_000, &mut nvs));
    assert!(FanService::load_snapshot(&nvs).is_none());

    assert!(svc.save_if_needed(6_000, &mut nvs));
    let stored = FanService::load_snapshot(&nvs).expect("snapshot stored");
    assert_eq!(stored, *svc.reported());
    assert!(stored.on);
    assert_eq!(stored.speed, FanSpeed::Medium);

    // Clean: no rewrite until the state changes again.
    assert!(!svc.save_if_needed(20_000, &mut nvs));
}

#[test]
fn restored_snapshot_feeds_the_planner() {
    // A reboot must not re-send On for a fan that was already running.
    let (mut svc, mut hw, _obs) = make_service();
    svc.restore(on_at(FanSpeed::Low));

    svc.control(&FanRequest::turn_on(FanSpeed::Medium), 0, &mut hw);
    assert_eq!(
        hw.payloads(),
        vec![IrCommand::SpeedStep.payload()],
        "only one step from Low, no power-on"
    );
}
