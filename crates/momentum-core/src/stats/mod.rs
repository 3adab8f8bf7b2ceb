//! Statistics module for Momentum
//!
//! This module derives analytics from stored habit logs and outcomes,
//! including habit streaks, rolling-window totals with a calm score,
//! weekly rollups, and outcome progress.

mod habits;
mod outcomes;

pub use habits::{
    habit_streak, ring_report, rolling_window, weekly_rollup, RingGoal, WeekRollup, WindowTotals,
    STREAK_CAP,
};

pub use outcomes::{outcome_progress, OutcomeProgress};
