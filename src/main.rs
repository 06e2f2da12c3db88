//! fanbridge Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     LogStateSink       NvsAdapter             │
//! │  (LineSense+IrTx)    (State+TimerDisp)  (Config+Storage)       │
//! │  IrRxDriver          TimerButton        Esp32TimeAdapter       │
//! │  (diagnostics)       (GPIO ISR)         (monotonic clock)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              FanService (pure logic)                   │    │
//! │  │  Scanner · Resolver · Sequencer                        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod events;
mod pins;

pub mod app;
mod adapters;
mod drivers;
pub mod fan;
pub mod ir;
pub mod panel;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogStateSink;
use adapters::nvs::NvsAdapter;
use adapters::time::Esp32TimeAdapter;
use app::ports::ConfigPort;
use app::service::FanService;
use config::SystemConfig;
use drivers::button::TimerButton;
use drivers::ir_rx::IrRxDriver;
use drivers::ir_tx::IrTxDriver;
use events::Event;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("fanbridge v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — continuing without the timer button", e);
    }
    let watchdog = drivers::watchdog::Watchdog::new();

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            // Continue without NVS — nothing will be persisted this
            // session; on the next reboot NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 4. Construct adapters ─────────────────────────────────
    let time = Esp32TimeAdapter::new();

    #[cfg(target_os = "espidf")]
    let (ir_tx, mut ir_rx) = {
        use esp_idf_hal::gpio::{InputPin as _, OutputPin as _};
        use esp_idf_hal::peripherals::Peripherals;

        let p = Peripherals::take()?;
        let tx = IrTxDriver::new(p.rmt.channel0, p.pins.gpio14.downgrade_output())?;
        let rx = IrRxDriver::new(p.rmt.channel2, p.pins.gpio15.downgrade_input())?;
        (tx, rx)
    };
    #[cfg(not(target_os = "espidf"))]
    let (ir_tx, mut ir_rx) = (IrTxDriver::new(), IrRxDriver::new());

    let mut hw = HardwareAdapter::new(ir_tx);
    let mut sink = LogStateSink::new();
    let mut button = TimerButton::new(pins::TIMER_BUTTON_GPIO);

    // ── 5. Construct the service ──────────────────────────────
    let mut service = FanService::new(config.clone(), time.uptime_ms());

    if let Some(snapshot) = FanService::load_snapshot(&nvs) {
        service.restore(snapshot);
    } else {
        info!("no persisted state, starting unknown");
    }
    service.start(&mut sink);

    drivers::hw_timer::start_timers(config.led_poll_interval_ms);

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    loop {
        // Simulate the poll timer via sleep on non-espidf targets.
        // On real hardware the esp_timer callback pushes the event.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.led_poll_interval_ms,
            )));
            events::push_event(Event::LedPollTick);
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::LedPollTick => {
                service.tick(time.uptime_ms(), &mut hw, &mut sink);
            }
            Event::TimerButtonPress => {
                info!("timer button: cycling shutdown timer");
                service.press_timer_button(time.uptime_ms(), &mut hw);
            }
        });

        // Button debounce (runs outside drain_events; it owns its atomic).
        if button.tick(time.uptime_ms()) {
            events::push_event(Event::TimerButtonPress);
        }

        // IR diagnostics — polled, drives nothing.
        if let Some(train) = ir_rx.poll() {
            service.on_ir_received(&train);
        }

        // Persist the published state once it has settled.
        service.save_if_needed(time.uptime_ms(), &mut nvs);

        // Feed watchdog on every iteration.
        watchdog.feed();
    }
}
