//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the IR transmit driver and reads the panel sense GPIOs,
//! exposing them through [`LineSensePort`] and [`IrTransmitPort`].
//! This is the only module in the system that touches the sense pins.
//! On non-espidf targets the reads come from simulation atomics so the
//! host build can drive the full service loop.

use crate::app::ports::{IrTransmitPort, LineSensePort};
use crate::drivers::ir_tx::IrTxDriver;
use crate::ir::IrFrame;
use crate::panel::SenseLine;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

// Simulation levels, one per sense line, default high (nothing lit —
// every status line is active-low).
#[cfg(not(target_os = "espidf"))]
static SIM_LINES: [AtomicBool; SenseLine::COUNT] = [const { AtomicBool::new(true) }; SenseLine::COUNT];

/// Override a sense-line level in simulation.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_line(line: SenseLine, level: bool) {
    SIM_LINES[line.index()].store(level, Ordering::Relaxed);
}

/// Concrete adapter that combines the fan-facing hardware behind ports.
pub struct HardwareAdapter {
    ir_tx: IrTxDriver,
}

impl HardwareAdapter {
    pub fn new(ir_tx: IrTxDriver) -> Self {
        Self { ir_tx }
    }
}

// ── LineSensePort implementation ──────────────────────────────

impl LineSensePort for HardwareAdapter {
    #[cfg(target_os = "espidf")]
    fn read_line(&mut self, line: SenseLine) -> bool {
        crate::drivers::hw_init::gpio_read(pins::sense_line_gpio(line))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_line(&mut self, line: SenseLine) -> bool {
        SIM_LINES[line.index()].load(Ordering::Relaxed)
    }
}

// ── IrTransmitPort implementation ─────────────────────────────

impl IrTransmitPort for HardwareAdapter {
    fn transmit(&mut self, frame: &IrFrame) {
        self.ir_tx.transmit(frame);
    }
}

// ── Generic embedded-hal adapter ──────────────────────────────

/// Sense-line adapter over any set of `embedded-hal` input pins.
///
/// Lets the scanner run against an I/O expander driver or another HAL
/// without touching the ESP-IDF read path above.  Pins are ordered by
/// [`SenseLine`] index.
pub struct HalLineSense<P> {
    pins: [P; SenseLine::COUNT],
}

impl<P: embedded_hal::digital::InputPin> HalLineSense<P> {
    pub fn new(pins: [P; SenseLine::COUNT]) -> Self {
        Self { pins }
    }
}

impl<P: embedded_hal::digital::InputPin> LineSensePort for HalLineSense<P> {
    fn read_line(&mut self, line: SenseLine) -> bool {
        // A failed read counts as inactive: the lines are active-low.
        self.pins[line.index()].is_high().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct FakePin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = core::convert::Infallible;
    }

    impl embedded_hal::digital::InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    #[test]
    fn hal_adapter_reads_by_line_index() {
        let mut pins = [FakePin { high: true }; SenseLine::COUNT];
        pins[SenseLine::Swing.index()].high = false;
        let mut sense = HalLineSense::new(pins);
        assert!(!sense.read_line(SenseLine::Swing));
        assert!(sense.read_line(SenseLine::Low));
    }

    #[test]
    fn sim_lines_default_to_dark_panel() {
        let mut hw = HardwareAdapter::new(IrTxDriver::new());
        for line in [SenseLine::Low, SenseLine::High, SenseLine::Col1] {
            assert!(hw.read_line(line), "{line:?} should idle high");
        }
    }
}
