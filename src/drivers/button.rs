//! ISR-debounced timer button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  GPIO fires on the falling
//! edge; the ISR records the raw timestamp into an atomic, and the
//! `tick()` method (called from the main loop) runs the debounce state
//! machine and reports a clean press.  One press cycles the fan's
//! shutdown timer to its next position.

use core::sync::atomic::{AtomicU32, Ordering};

const DEBOUNCE_MS: u32 = 50;

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
/// Written by the ISR, read by the main loop.
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

/// Internal debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    DebounceWait { since_ms: u32 },
}

pub struct TimerButton {
    gpio: i32,
    state: DebounceState,
    last_isr_ms: u32,
}

impl TimerButton {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            state: DebounceState::Idle,
            last_isr_ms: 0,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Call from the main loop on every pass.
    /// `now_ms` is the current monotonic time in milliseconds.
    /// Returns true once per debounced press.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        let isr_ms = BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire);
        let new_press = isr_ms != self.last_isr_ms && isr_ms != 0;

        match self.state {
            DebounceState::Idle => {
                if new_press {
                    self.last_isr_ms = isr_ms;
                    self.state = DebounceState::DebounceWait { since_ms: now_ms };
                }
                false
            }

            DebounceState::DebounceWait { since_ms } => {
                if now_ms.wrapping_sub(since_ms) < DEBOUNCE_MS {
                    return false;
                }
                self.state = DebounceState::Idle;
                // The contact must still be closed after the bounce window,
                // otherwise it was noise.
                Self::is_pressed_hw(self.gpio)
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn is_pressed_hw(gpio: i32) -> bool {
        !crate::drivers::hw_init::gpio_read(gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_pressed_hw(_gpio: i32) -> bool {
        // Simulation: a latched ISR counts as a held press.
        true
    }
}

/// ISR handler — register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
#[allow(unused)]
pub fn timer_button_isr_handler(now_ms: u32) {
    BUTTON_ISR_TIMESTAMP.store(now_ms, Ordering::Release);
}
