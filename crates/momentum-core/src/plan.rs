//! Row-backed planning types: weeks, outcomes, micro-actions, reviews.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One Monday-anchored week row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Week {
    /// Week id derived from the Monday, e.g. `2025-W35`
    pub id: String,
    /// Monday of the week
    pub starts_at: NaiveDate,
    /// Sunday of the week
    pub ends_at: NaiveDate,
}

/// Lifecycle of a weekly outcome.
///
/// The click-through cycle is planned → in_progress → done → planned;
/// a skipped outcome re-enters at planned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Committed for the week but not started
    Planned,
    /// At least one micro-action has been taken
    InProgress,
    /// Finished
    Done,
    /// Consciously dropped for this week
    Skipped,
}

impl OutcomeStatus {
    /// Next status in the click-through cycle.
    pub fn cycle(self) -> Self {
        match self {
            OutcomeStatus::Planned => OutcomeStatus::InProgress,
            OutcomeStatus::InProgress => OutcomeStatus::Done,
            OutcomeStatus::Done => OutcomeStatus::Planned,
            OutcomeStatus::Skipped => OutcomeStatus::Planned,
        }
    }
}

impl Default for OutcomeStatus {
    fn default() -> Self {
        OutcomeStatus::Planned
    }
}

/// A weekly outcome. At most three exist per week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Outcome {
    /// Unique identifier
    pub id: String,
    /// Owning week
    pub week_id: String,
    /// What done looks like, in the user's words
    pub title: String,
    /// Lifecycle status
    pub status: OutcomeStatus,
    /// Optional metric name the outcome moves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Optional numeric target for the metric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

/// A two-minute starter action attached to an outcome.
///
/// The label is frozen at creation; renaming the outcome later does not
/// rewrite it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MicroAction {
    /// Unique identifier
    pub id: String,
    /// Outcome this action moves
    pub outcome_id: String,
    /// Day the action belongs to
    pub date: NaiveDate,
    /// Display label derived from the outcome title at creation
    pub label: String,
    /// Countdown length in seconds
    pub duration_secs: u64,
    /// Completion timestamp (null while open)
    pub completed_at: Option<NaiveDateTime>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

impl MicroAction {
    /// Whether the action has not been completed yet.
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// Weekly review notes, wins, and a KPI snapshot keyed by metric name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Week the review belongs to
    pub week_id: String,
    /// Free-form reflection
    pub notes: String,
    /// Wins worth keeping
    pub wins: Vec<String>,
    /// Metric values captured at review time
    pub kpi_snapshot: HashMap<String, f64>,
    /// Last edit timestamp
    pub updated_at: NaiveDateTime,
}

impl Review {
    /// Empty review for a week.
    pub fn new(week_id: impl Into<String>, now: NaiveDateTime) -> Self {
        Review {
            week_id: week_id.into(),
            notes: String::new(),
            wins: Vec::new(),
            kpi_snapshot: HashMap::new(),
            updated_at: now,
        }
    }
}

/// Display label for a micro-action minted from an outcome title.
pub(crate) fn action_label(title: &str) -> String {
    format!("2-min move on: {title}")
}
