//! IR protocol definitions for the fan's remote control.
//!
//! The remote speaks a NEC-like unidirectional protocol: a long header
//! mark/space, 32 data bits framed LSB-first as fixed-width marks with
//! one/zero-length spaces, and a trailing mark before a long frame-end
//! gap.  Every button maps to a fixed 4-byte payload; there is no
//! addressing, checksumming beyond the inverted command byte, or
//! feedback channel.

pub mod codec;

pub use codec::{decode, encode, DecodeError, PulseCursor};

// ---------------------------------------------------------------------------
// Pulse timing (microseconds)
// ---------------------------------------------------------------------------

pub const HEADER_MARK_US: u16 = 8500;
pub const HEADER_SPACE_US: u16 = 4440;
pub const BIT_MARK_US: u16 = 700;
pub const ONE_SPACE_US: u16 = 1550;
pub const ZERO_SPACE_US: u16 = 450;
pub const FRAME_END_US: u16 = 10000;

/// One IR pulse: emitter-on time followed by emitter-off time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub mark_us: u16,
    pub space_us: u16,
}

/// Payload bytes per command frame.
pub const PAYLOAD_LEN: usize = 4;

/// Pulses per encoded frame: header + 8 bits × 4 bytes + trailer.
pub const FRAME_PULSES: usize = 2 + 8 * PAYLOAD_LEN;

/// One encoded command transmission.  Ephemeral: built, sent, dropped.
pub type IrFrame = heapless::Vec<Pulse, FRAME_PULSES>;

// ---------------------------------------------------------------------------
// Command set
// ---------------------------------------------------------------------------

/// The six buttons of the original remote.
///
/// The enum is the complete command vocabulary — there is no runtime
/// command registry, so an out-of-range id is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IrCommand {
    Off = 0,
    On = 1,
    /// Steps the speed up by one, wrapping High → Low.
    SpeedStep = 2,
    OscillateToggle = 3,
    /// Cycles the shutdown timer Off → 1h → 2h → 4h → 8h → Off.
    TimerCycle = 4,
    /// Toggles between the Normal and Nature presets.
    ModeToggle = 5,
}

impl IrCommand {
    /// Fixed payload bytes for this command, transmitted LSB-first.
    ///
    /// On and SpeedStep share a code: the power button doubles as the
    /// speed button on the original remote.
    pub const fn payload(self) -> [u8; PAYLOAD_LEN] {
        match self {
            Self::Off => [0x00, 0xFF, 0x11, 0xEE],
            Self::On => [0x00, 0xFF, 0x0D, 0xF2],
            Self::SpeedStep => [0x00, 0xFF, 0x0D, 0xF2],
            Self::OscillateToggle => [0x00, 0xFF, 0x05, 0xFA],
            Self::TimerCycle => [0x00, 0xFF, 0x09, 0xF6],
            Self::ModeToggle => [0x00, 0xFF, 0x01, 0xFE],
        }
    }

    /// All commands, for exhaustive tests.
    pub const ALL: [IrCommand; 6] = [
        Self::Off,
        Self::On,
        Self::SpeedStep,
        Self::OscillateToggle,
        Self::TimerCycle,
        Self::ModeToggle,
    ];
}
