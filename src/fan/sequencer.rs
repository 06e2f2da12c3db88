//! Command sequencer — turns a desired state into timed IR transmissions.
//!
//! The fan only understands the six stateless buttons of its remote, so
//! any richer request has to be compiled into an ordered button-press
//! sequence and replayed with settle delays between presses:
//!
//! ```text
//!  control(request) ──▶ plan() ──▶ queue ──▶ transmit ──▶ OneShotTimer
//!                                     ▲                        │
//!                                     └──── NextCommand ◀──────┘
//!                                            (or Resync when drained)
//! ```
//!
//! Hardware quirks the planner encodes:
//! - Power-on always lands at speed Low, after transiently showing
//!   Medium for ~3 s while the motor ramps — hence the long settle
//!   after an On before the next press registers.
//! - The only speed control is "step up by one", wrapping High → Low,
//!   so reaching a lower speed means stepping past High.
//!
//! There is no feedback channel.  The queue state is a prediction; a
//! short resync delay after the last press hands control back to the
//! LED scanner to re-derive ground truth.
//!
//! While a sequence is in flight the sequencer reports itself busy and
//! new requests are dropped whole — there is deliberately no request
//! queueing, and at most one timer is ever outstanding.

use heapless::Deque;
use log::debug;

use super::{FanMode, FanStateSnapshot};
use crate::app::commands::FanRequest;
use crate::app::ports::IrTransmitPort;
use crate::config::SystemConfig;
use crate::ir::{encode, IrCommand};

/// Upper bound on queued commands per request (Off + On + 3 steps +
/// oscillate + mode is the realistic worst case).
pub const QUEUE_CAP: usize = 16;

/// An ordered command list produced by the planner.
pub type CommandPlan = heapless::Vec<IrCommand, QUEUE_CAP>;

// ---------------------------------------------------------------------------
// One-shot timer
// ---------------------------------------------------------------------------

/// What to do when the outstanding timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Transmit the next queued command.
    NextCommand,
    /// Sequence drained: run one scan pass and go back to Idle.
    Resync,
}

/// Single-outstanding one-shot timer over wrapping millisecond time.
///
/// Arming replaces any previously armed action; the sequencer is
/// strictly sequential so it never needs two timers at once.
#[derive(Debug, Default)]
pub struct OneShotTimer {
    pending: Option<(u32, u32, PendingAction)>,
}

impl OneShotTimer {
    pub fn arm(&mut self, now_ms: u32, delay_ms: u32, action: PendingAction) {
        self.pending = Some((now_ms, delay_ms, action));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the action if its delay has elapsed.
    pub fn poll(&mut self, now_ms: u32) -> Option<PendingAction> {
        let (armed_at, delay, action) = self.pending?;
        if now_ms.wrapping_sub(armed_at) < delay {
            return None;
        }
        self.pending = None;
        Some(action)
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

pub struct CommandSequencer {
    queue: Deque<IrCommand, QUEUE_CAP>,
    timer: OneShotTimer,
    processing: bool,
    power_on_settle_ms: u32,
    command_settle_ms: u32,
    resync_delay_ms: u32,
}

impl CommandSequencer {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            queue: Deque::new(),
            timer: OneShotTimer::default(),
            processing: false,
            power_on_settle_ms: config.power_on_settle_ms,
            command_settle_ms: config.command_settle_ms,
            resync_delay_ms: config.resync_delay_ms,
        }
    }

    /// True while a sequence is in flight (scanner ticks are suppressed).
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Compile a control request into button presses, given the last
    /// published state as "where the fan is now".
    pub fn plan(request: &FanRequest, reported: &FanStateSnapshot) -> CommandPlan {
        let mut plan = CommandPlan::new();

        // Queue capacity comfortably exceeds any plan this can produce;
        // the pushes cannot overflow.
        if let Some(on) = request.state {
            if !on {
                if reported.on {
                    let _ = plan.push(IrCommand::Off);
                }
            } else {
                if !reported.on {
                    // Power-on lands at Low, whatever speed it last ran.
                    let _ = plan.push(IrCommand::On);
                }
                if let Some(speed) = request.speed {
                    let current = if reported.on { reported.speed.level() } else { 1 };
                    let mut target = speed.level();
                    if target < current {
                        // Only upward steps exist; wrap past High.
                        target += 3;
                    }
                    for _ in current..target {
                        let _ = plan.push(IrCommand::SpeedStep);
                    }
                }
            }
        }

        if let Some(oscillating) = request.oscillating {
            if reported.oscillating != oscillating {
                let _ = plan.push(IrCommand::OscillateToggle);
            }
        }

        if let Some(preset) = request.preset {
            if reported.on && preset != FanMode::Off && preset != reported.preset {
                let _ = plan.push(IrCommand::ModeToggle);
            }
        }

        plan
    }

    /// Handle an external control request.  Dropped whole while busy.
    pub fn control(
        &mut self,
        request: &FanRequest,
        reported: &FanStateSnapshot,
        now_ms: u32,
        ir: &mut impl IrTransmitPort,
    ) {
        if self.processing {
            debug!("control request dropped: sequence in flight");
            return;
        }

        let plan = Self::plan(request, reported);
        if plan.is_empty() {
            return;
        }
        for &cmd in &plan {
            let _ = self.queue.push_back(cmd);
        }

        debug!("sequence start: {} command(s)", self.queue.len());
        self.processing = true;
        self.pump(now_ms, ir);
    }

    /// Cycle the shutdown timer (the "set timer" button).  Only honored
    /// while the fan is on and no sequence is in flight.
    pub fn send_timer_cycle(
        &mut self,
        reported: &FanStateSnapshot,
        now_ms: u32,
        ir: &mut impl IrTransmitPort,
    ) {
        if self.processing || !reported.on {
            return;
        }
        let _ = self.queue.push_back(IrCommand::TimerCycle);
        self.processing = true;
        self.pump(now_ms, ir);
    }

    /// Advance the drain when the outstanding timer fires.
    ///
    /// Returns true exactly once per sequence, when the post-sequence
    /// resync is due: the caller runs one scan pass and we are Idle.
    pub fn poll(&mut self, now_ms: u32, ir: &mut impl IrTransmitPort) -> bool {
        match self.timer.poll(now_ms) {
            Some(PendingAction::NextCommand) => {
                self.pump(now_ms, ir);
                false
            }
            Some(PendingAction::Resync) => {
                self.processing = false;
                true
            }
            None => false,
        }
    }

    /// Transmit the head of the queue and arm the follow-up timer.
    fn pump(&mut self, now_ms: u32, ir: &mut impl IrTransmitPort) {
        let Some(cmd) = self.queue.pop_front() else {
            self.timer
                .arm(now_ms, self.resync_delay_ms, PendingAction::Resync);
            return;
        };

        debug!("transmit {:?}", cmd);
        ir.transmit(&encode(cmd));

        if self.queue.is_empty() {
            // Last press: no settle needed, go straight to the resync arm.
            self.timer
                .arm(now_ms, self.resync_delay_ms, PendingAction::Resync);
        } else {
            let settle_ms = if cmd == IrCommand::On {
                self.power_on_settle_ms
            } else {
                self.command_settle_ms
            };
            self.timer
                .arm(now_ms, settle_ms, PendingAction::NextCommand);
        }
    }
}
