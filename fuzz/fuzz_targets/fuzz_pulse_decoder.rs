//! Fuzz target: `ir::decode`
//!
//! Drives arbitrary pulse trains into the diagnostic decoder and
//! asserts that it never panics and never yields more bytes than its
//! documented cap.
//!
//! cargo fuzz run fuzz_pulse_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;

use fanbridge::ir::codec::MAX_DECODED_BYTES;
use fanbridge::ir::{decode, Pulse};

fuzz_target!(|data: &[u8]| {
    // Reinterpret the raw bytes as little-endian u16 duration pairs.
    let mut pulses = Vec::with_capacity(data.len() / 4);
    for chunk in data.chunks_exact(4) {
        pulses.push(Pulse {
            mark_us: u16::from_le_bytes([chunk[0], chunk[1]]),
            space_us: u16::from_le_bytes([chunk[2], chunk[3]]),
        });
    }

    if let Ok(bytes) = decode(&pulses) {
        assert!(bytes.len() <= MAX_DECODED_BYTES, "decoder exceeded its cap");
    }
});
