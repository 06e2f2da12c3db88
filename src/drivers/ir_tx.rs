//! IR transmitter driver (RMT peripheral, 38 kHz carrier).
//!
//! Each [`IrFrame`] pulse pair becomes a high RMT pulse (mark, carrier
//! modulated) followed by a low one (space).  Transmission is
//! fire-and-forget from the domain's point of view: the frame lasts a
//! few tens of milliseconds, far shorter than any settle delay the
//! sequencer waits between commands.
//!
//! On non-espidf targets the driver logs and discards frames.

use crate::ir::IrFrame;

#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    gpio::AnyOutputPin,
    rmt::{
        config::{CarrierConfig, DutyPercent, TransmitConfig},
        PinState, Pulse, PulseTicks, RmtChannel, TxRmtDriver, VariableLengthSignal,
    },
    units::FromValueType,
};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// RMT clock divider: 80 MHz APB / 80 = 1 µs per tick, so pulse
/// durations map straight to ticks.
#[cfg(target_os = "espidf")]
const RMT_CLOCK_DIVIDER: u8 = 80;

pub struct IrTxDriver {
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
}

#[cfg(target_os = "espidf")]
impl IrTxDriver {
    /// Claim an RMT channel and the emitter pin.
    pub fn new<C: RmtChannel>(channel: C, pin: AnyOutputPin) -> Result<Self, EspError> {
        let carrier = CarrierConfig::new()
            .duty_percent(DutyPercent::new(33)?)
            .frequency(38.kHz().into());
        let config = TransmitConfig::new()
            .carrier(Some(carrier))
            .clock_divider(RMT_CLOCK_DIVIDER);
        let tx = TxRmtDriver::new(channel, pin, &config)?;
        Ok(Self { tx })
    }

    /// Emit one frame.  Errors are logged, not propagated — there is no
    /// delivery confirmation to act on anyway.
    pub fn transmit(&mut self, frame: &IrFrame) {
        if let Err(e) = self.try_transmit(frame) {
            log::warn!("ir_tx: transmit failed: {}", e);
        }
    }

    fn try_transmit(&mut self, frame: &IrFrame) -> Result<(), EspError> {
        let mut signal = VariableLengthSignal::new();
        for pulse in frame {
            let mark = Pulse::new(PinState::High, PulseTicks::new(pulse.mark_us)?);
            let space = Pulse::new(PinState::Low, PulseTicks::new(pulse.space_us)?);
            signal.push([&mark, &space])?;
        }
        self.tx.start_blocking(&signal)
    }
}

#[cfg(not(target_os = "espidf"))]
impl IrTxDriver {
    pub fn new() -> Self {
        Self {}
    }

    pub fn transmit(&mut self, frame: &IrFrame) {
        log::debug!("ir_tx(sim): {} pulses discarded", frame.len());
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for IrTxDriver {
    fn default() -> Self {
        Self::new()
    }
}
