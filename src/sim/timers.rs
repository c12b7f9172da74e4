//! Delayed actions driven by frame time
//!
//! Every timer carries the generation token of the state that scheduled it.
//! The owner compares the token on delivery and drops stale fires, so a
//! countdown from a finished run can never touch a freshly reset game.

use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_INTERVAL, RESET_DELAY};

/// Phase-transition counter handed out as a timer token
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Repeating one-second countdown tick
    Countdown,
    /// One-shot full reset after game over
    Reset,
}

/// A timer that came due this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFire {
    pub kind: TimerKind,
    pub token: Generation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    kind: TimerKind,
    token: Generation,
    interval: f32,
    remaining: f32,
    repeat: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    entries: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the repeating countdown, replacing any previous one
    pub fn start_countdown(&mut self, token: Generation) {
        self.cancel(TimerKind::Countdown);
        self.entries.push(Timer {
            kind: TimerKind::Countdown,
            token,
            interval: COUNTDOWN_INTERVAL,
            remaining: COUNTDOWN_INTERVAL,
            repeat: true,
        });
    }

    /// Schedule the post-game-over reset
    pub fn schedule_reset(&mut self, token: Generation) {
        self.cancel(TimerKind::Reset);
        self.entries.push(Timer {
            kind: TimerKind::Reset,
            token,
            interval: RESET_DELAY,
            remaining: RESET_DELAY,
            repeat: false,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.entries.retain(|t| t.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|t| t.kind == kind)
    }

    /// Advance all timers and collect the ones that came due, in order
    pub fn advance(&mut self, dt: f32) -> Vec<TimerFire> {
        let mut fired = Vec::new();
        for timer in &mut self.entries {
            timer.remaining -= dt;
            while timer.remaining <= 0.0 {
                fired.push(TimerFire {
                    kind: timer.kind,
                    token: timer.token,
                });
                if !timer.repeat {
                    break;
                }
                timer.remaining += timer.interval;
            }
        }
        self.entries.retain(|t| t.repeat || t.remaining > 0.0);
        fired
    }
}
