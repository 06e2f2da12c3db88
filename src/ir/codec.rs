//! Mark/space pulse codec.
//!
//! [`encode`] is the transmit path: a pure function from command to
//! pulse train, fed to the RMT transmitter.  [`decode`] is the inverse,
//! used only for diagnostics — it lets a receiver module pointed at the
//! original remote (or at our own emitter) dump the payload bytes of
//! whatever it hears.  Decoded bytes never drive state.
//!
//! Received durations come from a demodulator and jitter by design, so
//! the decoder matches each pulse against the nominal timing within
//! ±[`TOLERANCE_PCT`] percent.

use super::{
    IrCommand, IrFrame, Pulse, BIT_MARK_US, FRAME_END_US, HEADER_MARK_US, HEADER_SPACE_US,
    ONE_SPACE_US, ZERO_SPACE_US,
};

/// Matching tolerance for received pulse durations, in percent.
pub const TOLERANCE_PCT: u32 = 25;

/// Maximum bytes a single diagnostic decode will collect (two frames).
pub const MAX_DECODED_BYTES: usize = 8;

/// Bytes extracted from a received pulse train.
pub type Payload = heapless::Vec<u8, MAX_DECODED_BYTES>;

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Build the pulse train for one command transmission.
pub fn encode(cmd: IrCommand) -> IrFrame {
    let mut frame = IrFrame::new();
    // Frame capacity is sized exactly for header + 32 bits + trailer;
    // these pushes cannot overflow.
    let _ = frame.push(Pulse {
        mark_us: HEADER_MARK_US,
        space_us: HEADER_SPACE_US,
    });
    for byte in cmd.payload() {
        for bit in 0..8 {
            let space_us = if byte & (1 << bit) != 0 {
                ONE_SPACE_US
            } else {
                ZERO_SPACE_US
            };
            let _ = frame.push(Pulse {
                mark_us: BIT_MARK_US,
                space_us,
            });
        }
    }
    let _ = frame.push(Pulse {
        mark_us: BIT_MARK_US,
        space_us: FRAME_END_US,
    });
    frame
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Why a pulse train failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The train does not start with a header mark/space pair.
    MissingHeader,
    /// A frame-end gap was not followed by a fresh header.
    RepeatWithoutHeader { at: usize },
    /// A pulse matched neither a one-bit nor a zero-bit.
    InvalidBit { byte: usize, bit: u8, at: usize },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "expected header"),
            Self::RepeatWithoutHeader { at } => {
                write!(f, "expected header after frame end at pulse {}", at)
            }
            Self::InvalidBit { byte, bit, at } => {
                write!(f, "invalid bit {} of byte {} at pulse {}", bit, byte, at)
            }
        }
    }
}

/// Forward-only cursor over a received pulse train with tolerant matching.
pub struct PulseCursor<'a> {
    pulses: &'a [Pulse],
    index: usize,
}

impl<'a> PulseCursor<'a> {
    pub fn new(pulses: &'a [Pulse]) -> Self {
        Self { pulses, index: 0 }
    }

    /// Position of the next unconsumed pulse.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Consume the next pulse if both durations match within tolerance.
    pub fn expect_item(&mut self, mark_us: u16, space_us: u16) -> bool {
        match self.pulses.get(self.index) {
            Some(p) if within_tolerance(p.mark_us, mark_us)
                && within_tolerance(p.space_us, space_us) =>
            {
                self.index += 1;
                true
            }
            _ => false,
        }
    }
}

fn within_tolerance(measured_us: u16, expected_us: u16) -> bool {
    let measured = u32::from(measured_us);
    let expected = u32::from(expected_us);
    let tolerance = expected * TOLERANCE_PCT / 100;
    measured + tolerance >= expected && measured <= expected + tolerance
}

/// Extract payload bytes from a received pulse train.
///
/// Handles back-to-back repeat frames by expecting a fresh header after
/// each frame-end gap.  Fails on the first pulse that matches nothing.
pub fn decode(pulses: &[Pulse]) -> Result<Payload, DecodeError> {
    let mut cursor = PulseCursor::new(pulses);

    if !cursor.expect_item(HEADER_MARK_US, HEADER_SPACE_US) {
        return Err(DecodeError::MissingHeader);
    }

    let mut bytes = Payload::new();
    while cursor.index() + 1 < pulses.len() {
        let mut byte = 0u8;
        for bit in 0..8 {
            if cursor.expect_item(BIT_MARK_US, FRAME_END_US) {
                // Frame boundary mid-train: a repeat must restart with a header.
                if !cursor.expect_item(HEADER_MARK_US, HEADER_SPACE_US) {
                    return Err(DecodeError::RepeatWithoutHeader {
                        at: cursor.index(),
                    });
                }
            }

            if cursor.expect_item(BIT_MARK_US, ONE_SPACE_US) {
                byte |= 1 << bit;
            } else if !cursor.expect_item(BIT_MARK_US, ZERO_SPACE_US) {
                return Err(DecodeError::InvalidBit {
                    byte: bytes.len(),
                    bit,
                    at: cursor.index(),
                });
            }
        }
        if bytes.push(byte).is_err() {
            // Diagnostic cap reached; anything further is repeat data.
            break;
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FRAME_PULSES;

    #[test]
    fn encode_produces_full_frame() {
        let frame = encode(IrCommand::Off);
        assert_eq!(frame.len(), FRAME_PULSES);
        assert_eq!(frame[0].mark_us, HEADER_MARK_US);
        assert_eq!(frame[0].space_us, HEADER_SPACE_US);
        assert_eq!(frame[FRAME_PULSES - 1].space_us, FRAME_END_US);
    }

    #[test]
    fn encode_is_lsb_first() {
        // Payload byte 2 of Off is 0x11 = 0b0001_0001: bits 0 and 4 set.
        let frame = encode(IrCommand::Off);
        let byte2 = &frame[1 + 16..1 + 24];
        let ones: Vec<usize> = byte2
            .iter()
            .enumerate()
            .filter(|(_, p)| p.space_us == ONE_SPACE_US)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(ones, vec![0, 4]);
    }

    #[test]
    fn round_trip_all_commands() {
        for cmd in IrCommand::ALL {
            let frame = encode(cmd);
            let bytes = decode(&frame).expect("own frames must decode");
            assert_eq!(&bytes[..], &cmd.payload()[..], "{cmd:?}");
        }
    }

    #[test]
    fn round_trip_survives_duration_jitter() {
        let mut frame = encode(IrCommand::TimerCycle);
        for (i, pulse) in frame.iter_mut().enumerate() {
            // ±10% is well inside the 25% matcher window.
            let stretch = if i % 2 == 0 { 110 } else { 90 };
            pulse.mark_us = (u32::from(pulse.mark_us) * stretch / 100) as u16;
            pulse.space_us = (u32::from(pulse.space_us) * stretch / 100) as u16;
        }
        let bytes = decode(&frame).unwrap();
        assert_eq!(&bytes[..], &IrCommand::TimerCycle.payload()[..]);
    }

    #[test]
    fn missing_header_is_rejected() {
        let frame = encode(IrCommand::On);
        assert_eq!(decode(&frame[1..]), Err(DecodeError::MissingHeader));
        assert_eq!(decode(&[]), Err(DecodeError::MissingHeader));
    }

    #[test]
    fn corrupt_bit_is_rejected() {
        let mut frame = encode(IrCommand::On);
        // Mangle the space of bit 3 in byte 1 beyond any tolerance.
        frame[1 + 8 + 3].space_us = 3000;
        assert_eq!(
            decode(&frame),
            Err(DecodeError::InvalidBit {
                byte: 1,
                bit: 3,
                at: 1 + 8 + 3,
            })
        );
    }

    #[test]
    fn repeat_frame_resynchronizes_on_second_header() {
        let mut train: Vec<Pulse> = Vec::new();
        train.extend_from_slice(&encode(IrCommand::OscillateToggle));
        train.extend_from_slice(&encode(IrCommand::OscillateToggle));
        let bytes = decode(&train).unwrap();
        let payload = IrCommand::OscillateToggle.payload();
        assert_eq!(bytes.len(), 2 * payload.len());
        assert_eq!(&bytes[..4], &payload[..]);
        assert_eq!(&bytes[4..], &payload[..]);
    }

    #[test]
    fn repeat_frame_without_header_is_rejected() {
        let mut train: Vec<Pulse> = encode(IrCommand::OscillateToggle).to_vec();
        // Skip the second frame's header so the resync fails.
        train.extend_from_slice(&encode(IrCommand::OscillateToggle)[1..]);
        assert!(matches!(
            decode(&train),
            Err(DecodeError::RepeatWithoutHeader { .. })
        ));
    }

    #[test]
    fn tolerance_window_boundaries() {
        assert!(within_tolerance(BIT_MARK_US, BIT_MARK_US));
        // 700 ± 25% = 525..=875
        assert!(within_tolerance(525, BIT_MARK_US));
        assert!(within_tolerance(875, BIT_MARK_US));
        assert!(!within_tolerance(524, BIT_MARK_US));
        assert!(!within_tolerance(876, BIT_MARK_US));
    }
}
