//! GPIO / peripheral pin assignments for the fanbridge board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! The ten sense lines tap the fan's front-panel LED wiring: four row
//! drives and two column sinks of the multiplexed status matrix, plus
//! four dedicated indicator LEDs (speed Low/Medium/High and Swing).
//! All status lines are active-low: logic 0 means "that LED is lit".

use crate::panel::SenseLine;

// ---------------------------------------------------------------------------
// Panel sense lines (inputs, tapped from the fan's LED driver)
// ---------------------------------------------------------------------------

/// Dedicated speed indicator — Low.
pub const SENSE_LOW_GPIO: i32 = 33;
/// Dedicated speed indicator — Medium.
pub const SENSE_MED_GPIO: i32 = 32;
/// Dedicated speed indicator — High (input-only pin).
pub const SENSE_HI_GPIO: i32 = 35;
/// Dedicated oscillation indicator (input-only pin).
pub const SENSE_SWING_GPIO: i32 = 34;

/// LED matrix row drives (read as plain digital levels).
pub const SENSE_ROW1_GPIO: i32 = 13;
pub const SENSE_ROW2_GPIO: i32 = 27;
pub const SENSE_ROW3_GPIO: i32 = 16;
pub const SENSE_ROW4_GPIO: i32 = 17;

/// LED matrix column sinks (logic 0 = column active).
pub const SENSE_COL1_GPIO: i32 = 25;
pub const SENSE_COL2_GPIO: i32 = 26;

/// Map a sense-line role to its GPIO number.
pub const fn sense_line_gpio(line: SenseLine) -> i32 {
    match line {
        SenseLine::Low => SENSE_LOW_GPIO,
        SenseLine::Medium => SENSE_MED_GPIO,
        SenseLine::High => SENSE_HI_GPIO,
        SenseLine::Swing => SENSE_SWING_GPIO,
        SenseLine::Row1 => SENSE_ROW1_GPIO,
        SenseLine::Row2 => SENSE_ROW2_GPIO,
        SenseLine::Row3 => SENSE_ROW3_GPIO,
        SenseLine::Row4 => SENSE_ROW4_GPIO,
        SenseLine::Col1 => SENSE_COL1_GPIO,
        SenseLine::Col2 => SENSE_COL2_GPIO,
    }
}

// ---------------------------------------------------------------------------
// IR front end
// ---------------------------------------------------------------------------

/// IR emitter, driven by the RMT peripheral with a 38 kHz carrier.
pub const IR_TX_GPIO: i32 = 14;
/// IR demodulator output (TSOP-style receiver module), diagnostics only.
pub const IR_RX_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button that cycles the fan's shutdown timer.
pub const TIMER_BUTTON_GPIO: i32 = 0;
