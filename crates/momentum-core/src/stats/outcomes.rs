//! Weekly outcome progress.

use serde::{Deserialize, Serialize};

use crate::plan::{Outcome, OutcomeStatus};

/// Done-count progress for one week's outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeProgress {
    pub done: u32,
    pub total: u32,
    /// Rounded done/total percentage; 0 for an empty week
    pub percent: u32,
}

pub fn outcome_progress(outcomes: &[Outcome]) -> OutcomeProgress {
    let total = outcomes.len() as u32;
    let done = outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Done)
        .count() as u32;
    let percent = if total == 0 {
        0
    } else {
        ((f64::from(done) / f64::from(total)) * 100.0).round() as u32
    };
    OutcomeProgress {
        done,
        total,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn outcome(status: OutcomeStatus) -> Outcome {
        Outcome {
            id: "o".into(),
            week_id: "2025-W35".into(),
            title: "t".into(),
            status,
            metric: None,
            target: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn empty_week_is_zero_percent() {
        let progress = outcome_progress(&[]);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.total, 0);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        let outcomes = vec![
            outcome(OutcomeStatus::Done),
            outcome(OutcomeStatus::Planned),
            outcome(OutcomeStatus::InProgress),
        ];
        assert_eq!(outcome_progress(&outcomes).percent, 33);

        let outcomes = vec![
            outcome(OutcomeStatus::Done),
            outcome(OutcomeStatus::Done),
            outcome(OutcomeStatus::Skipped),
        ];
        assert_eq!(outcome_progress(&outcomes).percent, 67);
    }

    #[test]
    fn all_done_is_full() {
        let outcomes = vec![outcome(OutcomeStatus::Done), outcome(OutcomeStatus::Done)];
        let progress = outcome_progress(&outcomes);
        assert_eq!(progress.done, 2);
        assert_eq!(progress.percent, 100);
    }
}
