//! IR receiver driver (RMT peripheral, diagnostics only).
//!
//! A demodulating receiver module (TSOP-style) feeds the RMT capture
//! unit; the main loop polls for complete pulse trains and hands them
//! to the diagnostic decode path.  Nothing in the control flow depends
//! on this driver — it exists to verify what the original remote (or
//! our own emitter) puts on the air.

use crate::ir::Pulse;

/// Longest train we keep: two back-to-back frames plus slack.
pub const RX_CAPACITY: usize = 80;

/// A captured pulse train.
pub type PulseTrain = heapless::Vec<Pulse, RX_CAPACITY>;

#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    gpio::AnyInputPin,
    rmt::{config::ReceiveConfig, PinState, Pulse as RmtPulse, RmtChannel, RxRmtDriver},
};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// Idle threshold: anything quieter than this ends a capture.  Must
/// exceed the in-frame frame-end gap so repeats stay in one train.
#[cfg(target_os = "espidf")]
const IDLE_THRESHOLD_US: u16 = 12_000;

pub struct IrRxDriver {
    #[cfg(target_os = "espidf")]
    rx: RxRmtDriver<'static>,
}

#[cfg(target_os = "espidf")]
impl IrRxDriver {
    /// Claim an RMT channel and the receiver pin, and start capturing.
    pub fn new<C: RmtChannel>(channel: C, pin: AnyInputPin) -> Result<Self, EspError> {
        let config = ReceiveConfig::new().idle_threshold(IDLE_THRESHOLD_US);
        let mut rx = RxRmtDriver::new(channel, pin, &config, RX_CAPACITY)?;
        rx.start()?;
        Ok(Self { rx })
    }

    /// Non-blocking: fetch one pending pulse train, if any.
    pub fn poll(&mut self) -> Option<PulseTrain> {
        let mut buf = [(RmtPulse::zero(), RmtPulse::zero()); RX_CAPACITY];
        let count = match self.rx.receive(&mut buf, 0) {
            Ok(esp_idf_hal::rmt::ReceiveResult::Received(count)) => count,
            Ok(_) => return None,
            Err(e) => {
                log::warn!("ir_rx: receive failed: {}", e);
                return None;
            }
        };

        let mut train = PulseTrain::new();
        for (first, second) in buf.iter().take(count) {
            // The demodulator is active-low but the RMT driver already
            // normalises polarity; first half is the mark.
            let mark_us = if first.pin_state == PinState::High {
                first.ticks.ticks()
            } else {
                second.ticks.ticks()
            };
            let space_us = if first.pin_state == PinState::High {
                second.ticks.ticks()
            } else {
                first.ticks.ticks()
            };
            if train.push(Pulse { mark_us, space_us }).is_err() {
                break;
            }
        }
        Some(train)
    }
}

#[cfg(not(target_os = "espidf"))]
impl IrRxDriver {
    pub fn new() -> Self {
        Self {}
    }

    /// Simulation: nothing ever arrives.
    pub fn poll(&mut self) -> Option<PulseTrain> {
        None
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for IrRxDriver {
    fn default() -> Self {
        Self::new()
    }
}
