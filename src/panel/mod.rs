//! Front-panel geometry: sense-line roles and the per-window snapshot.
//!
//! The fan multiplexes most of its status LEDs as a 4×2 matrix (four row
//! drives, two column sinks) and drives four indicators (speed Low /
//! Medium / High and Swing) on dedicated lines.  A matrix cell is lit
//! when its row line is high while its column line is pulled low; the
//! dedicated lines are plain active-low.

pub mod scanner;

pub use scanner::{LedScanner, SAMPLE_WINDOW};

/// Roles of the ten panel sense lines, in their fixed index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SenseLine {
    Low = 0,
    Medium = 1,
    High = 2,
    Swing = 3,
    Row1 = 4,
    Row2 = 5,
    Row3 = 6,
    Row4 = 7,
    Col1 = 8,
    Col2 = 9,
}

impl SenseLine {
    /// Total number of sense lines.
    pub const COUNT: usize = 10;

    /// Matrix row lines, top to bottom.
    pub const ROWS: [SenseLine; 4] = [Self::Row1, Self::Row2, Self::Row3, Self::Row4];

    /// Matrix column lines, left to right.
    pub const COLS: [SenseLine; 2] = [Self::Col1, Self::Col2];

    /// Stable index (0..10) of this line.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Debounced panel reading, produced once per sampling window.
///
/// `matrix[r][c]` is true when the matrix LED at row `r`, column `c`
/// won the majority vote over the window.  The `*_lit` flags are the
/// dedicated indicator LEDs, sampled once at window resolution (already
/// converted from their active-low levels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSnapshot {
    pub matrix: [[bool; 2]; 4],
    pub low_lit: bool,
    pub medium_lit: bool,
    pub high_lit: bool,
    pub swing_lit: bool,
}
