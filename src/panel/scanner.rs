//! Vote-debounced LED matrix scanner.
//!
//! The panel LEDs are multiplexed and PWM-dimmed, so a single digital
//! read of a matrix cell flickers between lit and dark.  The scanner
//! samples the matrix once per poll interval, accumulates per-cell "on"
//! votes, and resolves a stable boolean per cell once every
//! [`SAMPLE_WINDOW`] samples: a cell counts as lit only when it won a
//! strict majority of the window.
//!
//! ```text
//!  tick ──▶ sample rows/cols ──▶ votes[r][c] += 1
//!                 │
//!                 └── every 16th sample ──▶ matrix[r][c] = votes > 8
//!                                           + dedicated line reads
//!                                           ──▶ PanelSnapshot
//! ```
//!
//! The caller suppresses ticks entirely while an IR command sequence is
//! in flight; motor and relay switching corrupts the optical readings.

use super::{PanelSnapshot, SenseLine};
use crate::app::ports::LineSensePort;

/// Samples per debounce window.
pub const SAMPLE_WINDOW: u8 = 16;

/// A cell must collect strictly more votes than this to count as lit.
const VOTE_THRESHOLD: u8 = SAMPLE_WINDOW / 2;

pub struct LedScanner {
    interval_ms: u32,
    last_run_ms: u32,
    sample_step: u8,
    votes: [[u8; 2]; 4],
}

impl LedScanner {
    pub fn new(interval_ms: u32, now_ms: u32) -> Self {
        Self {
            interval_ms,
            last_run_ms: now_ms,
            sample_step: 0,
            votes: [[0; 2]; 4],
        }
    }

    /// Take one sample if the poll interval has elapsed.
    ///
    /// Returns a [`PanelSnapshot`] when this sample completed a window,
    /// `None` otherwise.  `now_ms` is monotonic and may wrap.
    pub fn tick(
        &mut self,
        now_ms: u32,
        lines: &mut impl LineSensePort,
    ) -> Option<PanelSnapshot> {
        if now_ms.wrapping_sub(self.last_run_ms) < self.interval_ms {
            return None;
        }
        self.last_run_ms = now_ms;

        let rows = SenseLine::ROWS.map(|l| lines.read_line(l));
        let cols = SenseLine::COLS.map(|l| lines.read_line(l));

        for (r, &row_high) in rows.iter().enumerate() {
            if !row_high {
                continue;
            }
            for (c, &col_level) in cols.iter().enumerate() {
                // Column sinks are active-low: 0 means the cell is lit.
                if !col_level {
                    self.votes[r][c] += 1;
                }
            }
        }

        self.sample_step += 1;
        if self.sample_step < SAMPLE_WINDOW {
            return None;
        }
        self.sample_step = 0;

        let mut matrix = [[false; 2]; 4];
        for r in 0..4 {
            for c in 0..2 {
                matrix[r][c] = self.votes[r][c] > VOTE_THRESHOLD;
                self.votes[r][c] = 0;
            }
        }

        Some(PanelSnapshot {
            matrix,
            low_lit: !lines.read_line(SenseLine::Low),
            medium_lit: !lines.read_line(SenseLine::Medium),
            high_lit: !lines.read_line(SenseLine::High),
            swing_lit: !lines.read_line(SenseLine::Swing),
        })
    }
}
