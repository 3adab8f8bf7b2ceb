//! Habit streaks, rolling-window totals, and weekly rollups.
//!
//! Everything here is a pure function over habit logs so the CLI can
//! recompute on demand:
//! - **Streaks**: consecutive checked days ending today
//! - **Rolling window**: per-habit counts plus a calm score over N days
//! - **Weekly rollup**: per-week counts for the history view

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::WeekRange;
use crate::ritual::{HabitKey, HabitLog};
use crate::store::GoalsConfig;

/// Streak walking stops after this many days back.
pub const STREAK_CAP: usize = 365;

/// Days without a rating count as mid-scale stress.
const DEFAULT_STRESS: f64 = 5.0;

const STRESS_SCALE_MAX: f64 = 10.0;

/// Consecutive days the habit was checked, ending with `today`.
///
/// An unchecked `today` means a streak of zero; there is no grace day.
pub fn habit_streak(logs: &[HabitLog], key: HabitKey, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    for offset in 0..STREAK_CAP {
        let day = match today.checked_sub_days(Days::new(offset as u64)) {
            Some(day) => day,
            None => break,
        };
        let done = logs
            .iter()
            .find(|log| log.date == day)
            .map(|log| log.done(key))
            .unwrap_or(false);
        if !done {
            break;
        }
        streak += 1;
    }
    streak
}

/// Totals over a rolling window of days ending today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTotals {
    /// Window length in days
    pub days: u32,
    pub meditation: u32,
    pub strength: u32,
    pub steps: u32,
    pub fun: u32,
    /// Mean stress over rated days, or 5.0 when none were rated
    pub avg_stress: f64,
    /// Calm score: 10 minus the average stress, floored at zero
    pub stress_inverse: f64,
}

/// Per-habit counts and the calm score over the last `days` days.
pub fn rolling_window(logs: &[HabitLog], days: u32, today: NaiveDate) -> WindowTotals {
    let mut totals = WindowTotals {
        days,
        meditation: 0,
        strength: 0,
        steps: 0,
        fun: 0,
        avg_stress: DEFAULT_STRESS,
        stress_inverse: STRESS_SCALE_MAX - DEFAULT_STRESS,
    };

    let mut stress_sum = 0u32;
    let mut stress_count = 0u32;
    for offset in 0..days {
        let day = match today.checked_sub_days(Days::new(u64::from(offset))) {
            Some(day) => day,
            None => break,
        };
        if let Some(log) = logs.iter().find(|log| log.date == day) {
            if log.meditation {
                totals.meditation += 1;
            }
            if log.strength {
                totals.strength += 1;
            }
            if log.steps {
                totals.steps += 1;
            }
            if log.fun {
                totals.fun += 1;
            }
            if let Some(stress) = log.stress {
                stress_sum += u32::from(stress);
                stress_count += 1;
            }
        }
    }

    if stress_count > 0 {
        totals.avg_stress = f64::from(stress_sum) / f64::from(stress_count);
        totals.stress_inverse = (STRESS_SCALE_MAX - totals.avg_stress).max(0.0);
    }
    totals
}

/// One week's habit counts for the history table. Fun is a daily treat,
/// not a tracked metric, so it stays out of the rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRollup {
    /// Display label like `8/25-8/31`
    pub label: String,
    pub meditation: u32,
    pub strength: u32,
    pub steps: u32,
    /// Mean stress rounded to two decimals, or None when unrated
    pub avg_stress: Option<f64>,
}

/// Per-week rollups for the given ranges, in range order.
pub fn weekly_rollup(logs: &[HabitLog], ranges: &[WeekRange]) -> Vec<WeekRollup> {
    ranges
        .iter()
        .map(|range| {
            let mut rollup = WeekRollup {
                label: range.label.clone(),
                meditation: 0,
                strength: 0,
                steps: 0,
                avg_stress: None,
            };
            let mut stress_sum = 0u32;
            let mut stress_count = 0u32;
            for log in logs {
                if log.date < range.start || log.date > range.end {
                    continue;
                }
                if log.meditation {
                    rollup.meditation += 1;
                }
                if log.strength {
                    rollup.strength += 1;
                }
                if log.steps {
                    rollup.steps += 1;
                }
                if let Some(stress) = log.stress {
                    stress_sum += u32::from(stress);
                    stress_count += 1;
                }
            }
            if stress_count > 0 {
                let avg = f64::from(stress_sum) / f64::from(stress_count);
                rollup.avg_stress = Some((avg * 100.0).round() / 100.0);
            }
            rollup
        })
        .collect()
}

/// One ring of the weekly goal report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingGoal {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub goal: f64,
}

/// The five goal rings: four habits plus the calm score.
pub fn ring_report(totals: &WindowTotals, goals: &GoalsConfig) -> Vec<RingGoal> {
    vec![
        RingGoal {
            key: HabitKey::Meditation.as_str().to_string(),
            label: "Meditation".to_string(),
            value: f64::from(totals.meditation),
            goal: f64::from(goals.meditation),
        },
        RingGoal {
            key: HabitKey::Strength.as_str().to_string(),
            label: "Strength".to_string(),
            value: f64::from(totals.strength),
            goal: f64::from(goals.strength),
        },
        RingGoal {
            key: HabitKey::Steps.as_str().to_string(),
            label: "10k Steps".to_string(),
            value: f64::from(totals.steps),
            goal: f64::from(goals.steps),
        },
        RingGoal {
            key: HabitKey::Fun.as_str().to_string(),
            label: "Fun".to_string(),
            value: f64::from(totals.fun),
            goal: f64::from(goals.fun),
        },
        RingGoal {
            key: "calm".to_string(),
            label: "Calm".to_string(),
            value: totals.stress_inverse,
            goal: STRESS_SCALE_MAX,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::recent_week_ranges;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    fn log(day: u32, meditation: bool, stress: Option<u8>) -> HabitLog {
        HabitLog {
            meditation,
            stress,
            ..HabitLog::new(d(day))
        }
    }

    #[test]
    fn streak_is_zero_when_today_unchecked() {
        let logs = vec![log(24, true, None), log(25, true, None)];
        assert_eq!(habit_streak(&logs, HabitKey::Meditation, d(26)), 0);
    }

    #[test]
    fn streak_counts_back_from_today() {
        let logs = vec![
            log(22, true, None),
            log(23, true, None),
            log(24, true, None),
            log(25, true, None),
            log(26, true, None),
        ];
        assert_eq!(habit_streak(&logs, HabitKey::Meditation, d(26)), 5);
    }

    #[test]
    fn streak_breaks_at_first_gap() {
        let logs = vec![log(22, true, None), log(24, true, None), log(26, true, None)];
        assert_eq!(habit_streak(&logs, HabitKey::Meditation, d(26)), 1);
    }

    #[test]
    fn streak_ignores_other_habits() {
        let mut today = HabitLog::new(d(26));
        today.steps = true;
        assert_eq!(habit_streak(&[today], HabitKey::Meditation, d(26)), 0);
    }

    #[test]
    fn streak_stops_at_the_cap() {
        let logs: Vec<HabitLog> = (0..400)
            .map(|offset| {
                let date = d(26).checked_sub_days(Days::new(offset)).unwrap();
                HabitLog {
                    meditation: true,
                    ..HabitLog::new(date)
                }
            })
            .collect();
        assert_eq!(
            habit_streak(&logs, HabitKey::Meditation, d(26)),
            STREAK_CAP as u32
        );
    }

    #[test]
    fn window_defaults_stress_to_mid_scale() {
        let totals = rolling_window(&[log(26, true, None)], 7, d(26));
        assert_eq!(totals.meditation, 1);
        assert_eq!(totals.avg_stress, 5.0);
        assert_eq!(totals.stress_inverse, 5.0);
    }

    #[test]
    fn window_averages_rated_days_only() {
        let logs = vec![log(25, false, Some(2)), log(26, false, Some(4))];
        let totals = rolling_window(&logs, 7, d(26));
        assert_eq!(totals.avg_stress, 3.0);
        assert_eq!(totals.stress_inverse, 7.0);
    }

    #[test]
    fn window_skips_days_outside_range() {
        let logs = vec![log(1, true, None), log(26, true, None)];
        let totals = rolling_window(&logs, 7, d(26));
        assert_eq!(totals.meditation, 1);
    }

    #[test]
    fn rollup_rounds_stress_and_leaves_unrated_weeks_empty() {
        let ranges = recent_week_ranges(2, d(26));
        let logs = vec![
            log(25, true, Some(3)),
            log(26, true, Some(4)),
            // previous week, unrated
            log(20, true, None),
        ];
        let rollups = weekly_rollup(&logs, &ranges);
        assert_eq!(rollups.len(), 2);
        assert_eq!(rollups[0].meditation, 1);
        assert_eq!(rollups[0].avg_stress, None);
        assert_eq!(rollups[1].meditation, 2);
        assert_eq!(rollups[1].avg_stress, Some(3.5));
    }

    #[test]
    fn ring_report_has_five_rings_with_calm_last() {
        let totals = rolling_window(&[log(26, true, Some(2))], 7, d(26));
        let rings = ring_report(&totals, &GoalsConfig::default());
        assert_eq!(rings.len(), 5);
        assert_eq!(rings[0].key, "meditation");
        assert_eq!(rings[0].goal, 7.0);
        assert_eq!(rings[2].label, "10k Steps");
        assert_eq!(rings[4].key, "calm");
        assert_eq!(rings[4].value, 8.0);
        assert_eq!(rings[4].goal, 10.0);
    }
}
