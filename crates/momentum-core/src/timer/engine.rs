//! Countdown timer implementation.
//!
//! The countdown is a wall-clock-based state machine. It does not use
//! internal threads - the caller passes the current time into `tick()`
//! periodically and owns the cadence.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running) -> Elapsed
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero; the elapsed event has fired.
    Elapsed,
}

/// What a countdown run is for. Carried on the start and elapsed events
/// so the coordinator knows what to do when the timer runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerPurpose {
    /// Counting down a two-minute starter action
    MicroAction { action_id: String },
    /// Counting down the evening wind-down ritual
    WindDown,
}

/// Core countdown timer.
///
/// Operates on wall-clock deltas -- no internal thread. The current time
/// is injected into every command so behavior is reproducible in tests.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    state: TimerState,
    /// Full length of the current run in milliseconds.
    duration_ms: u64,
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    /// Timestamp of the last start/resume/tick while running.
    /// Used to compute elapsed time between ticks.
    last_tick: Option<NaiveDateTime>,
    purpose: Option<TimerPurpose>,
}

impl CountdownTimer {
    /// Create an idle countdown primed with a duration.
    pub fn new(duration_secs: u64) -> Self {
        Self {
            state: TimerState::Idle,
            duration_ms: duration_secs * 1000,
            remaining_ms: duration_secs * 1000,
            last_tick: None,
            purpose: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn purpose(&self) -> Option<&TimerPurpose> {
        self.purpose.as_ref()
    }

    /// 0.0 .. 1.0 progress within the current run.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / self.duration_ms as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a run. A start while another run is live replaces it.
    pub fn start(
        &mut self,
        purpose: TimerPurpose,
        duration_secs: u64,
        now: NaiveDateTime,
    ) -> Option<Event> {
        self.duration_ms = duration_secs * 1000;
        self.remaining_ms = self.duration_ms;
        self.state = TimerState::Running;
        self.last_tick = Some(now);
        self.purpose = Some(purpose.clone());
        Some(Event::TimerStarted {
            purpose,
            duration_secs,
            at: now,
        })
    }

    pub fn pause(&mut self, now: NaiveDateTime) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                // Flush elapsed time first.
                self.flush_elapsed(now);
                self.state = TimerState::Paused;
                self.last_tick = None;
                Some(Event::TimerPaused {
                    remaining_ms: self.remaining_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self, now: NaiveDateTime) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.last_tick = Some(now);
                Some(Event::TimerResumed {
                    remaining_ms: self.remaining_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    pub fn reset(&mut self, now: NaiveDateTime) -> Option<Event> {
        self.state = TimerState::Idle;
        self.remaining_ms = self.duration_ms;
        self.last_tick = None;
        self.purpose = None;
        Some(Event::TimerReset { at: now })
    }

    /// Call periodically. Returns `Some(Event::TimerElapsed)` exactly once
    /// when the countdown reaches zero.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.flush_elapsed(now);
                if self.remaining_ms == 0 {
                    self.state = TimerState::Elapsed;
                    self.last_tick = None;
                    let purpose = self.purpose.clone()?;
                    return Some(Event::TimerElapsed { purpose, at: now });
                }
                None
            }
            _ => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self, now: NaiveDateTime) {
        if let Some(last) = self.last_tick {
            // A clock that jumps backwards burns no time.
            let elapsed = (now - last).num_milliseconds().max(0) as u64;
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick = Some(now);
        }
    }
}
