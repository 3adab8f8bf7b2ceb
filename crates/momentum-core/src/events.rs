use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::ritual::Mode;
use crate::timer::{TimerPurpose, TimerState};

/// Every observable state change produces an Event.
/// The CLI prints them; the watch loop streams them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        purpose: TimerPurpose,
        duration_secs: u64,
        at: NaiveDateTime,
    },
    TimerPaused {
        remaining_ms: u64,
        at: NaiveDateTime,
    },
    TimerResumed {
        remaining_ms: u64,
        at: NaiveDateTime,
    },
    TimerReset {
        at: NaiveDateTime,
    },
    /// Countdown reached zero. Emitted exactly once per run.
    TimerElapsed {
        purpose: TimerPurpose,
        at: NaiveDateTime,
    },
    /// The once-per-day wind-down chime fired.
    ChimeFired {
        date: NaiveDate,
        at: NaiveDateTime,
    },
    ModeChanged {
        mode: Mode,
        at: NaiveDateTime,
    },
    PanelOpened {
        at: NaiveDateTime,
    },
    PanelClosed {
        at: NaiveDateTime,
    },
    /// A wind-down checklist was saved to the ritual history.
    WindDownLogged {
        at: NaiveDateTime,
    },
    /// A micro-action completed and its outcome was promoted if needed.
    ActionCompleted {
        action_id: String,
        outcome_id: String,
        at: NaiveDateTime,
    },
    StateSnapshot {
        timer: TimerState,
        remaining_ms: u64,
        mode: Mode,
        night: bool,
        panel_open: bool,
        at: NaiveDateTime,
    },
}
