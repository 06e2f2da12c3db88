//! Panel snapshot → semantic fan state.
//!
//! Pure function of the previous state and one debounced window.  The
//! domain rules encode how this particular panel multiplexes meaning:
//!
//! 1. Matrix cell (row 0, col 1) is the Normal-mode indicator; dark
//!    means the Nature preset is running.
//! 2. Nature hides the discrete speed LEDs, so the resolved speed is
//!    forced to Off while in Nature.
//! 3. In Normal mode the dedicated speed lines decide, High winning
//!    over Medium over Low; none lit means the fan is off.
//! 4. The Swing line maps straight to oscillation.
//! 5. Timer positions live in matrix column 0, checked 1h, 2h, 4h, 8h
//!    with later checks overriding earlier ones.  Timer changes update
//!    the timer display but do not count as a publishable state change.

use super::{FanMode, FanOscillation, FanSpeed, FanState, FanTimer};
use crate::panel::PanelSnapshot;

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub next: FanState,
    /// The main fan state changed and should be published.
    pub publish: bool,
    /// The timer position changed; refresh the timer display.
    pub timer_changed: bool,
}

pub fn resolve(prev: &FanState, panel: &PanelSnapshot) -> Resolution {
    let mut next = *prev;
    let mut publish = false;

    let mode = if panel.matrix[0][1] {
        FanMode::Normal
    } else {
        FanMode::Nature
    };
    if next.mode != mode {
        next.mode = mode;
        if mode == FanMode::Nature {
            next.speed = FanSpeed::Off;
        }
        publish = true;
    }

    if next.mode == FanMode::Normal {
        let speed = if panel.high_lit {
            FanSpeed::High
        } else if panel.medium_lit {
            FanSpeed::Medium
        } else if panel.low_lit {
            FanSpeed::Low
        } else {
            FanSpeed::Off
        };
        if next.speed != speed {
            next.speed = speed;
            publish = true;
        }
    }

    let oscillating = if panel.swing_lit {
        FanOscillation::On
    } else {
        FanOscillation::Off
    };
    if next.oscillating != oscillating {
        next.oscillating = oscillating;
        publish = true;
    }

    let mut timer = FanTimer::Off;
    if panel.matrix[0][0] {
        timer = FanTimer::H1;
    }
    if panel.matrix[2][0] {
        timer = FanTimer::H2;
    }
    if panel.matrix[3][0] {
        timer = FanTimer::H4;
    }
    if panel.matrix[1][0] {
        timer = FanTimer::H8;
    }
    let timer_changed = next.timer != timer;
    next.timer = timer;

    Resolution {
        next,
        publish,
        timer_changed,
    }
}
