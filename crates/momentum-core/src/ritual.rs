//! Evening ritual state: habit checklists, wind-down logs, display mode.
//!
//! Everything here lives in one JSON blob under a single kv key. The
//! store loads it at startup and the coalescer writes it back; nothing
//! else touches the key.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Wind-down history keeps at most this many entries.
pub const WIND_DOWN_LOG_CAP: usize = 100;

const STRESS_MAX: u8 = 10;

/// Display mode for the evening panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Follow the wind-down clock window
    Auto,
    /// Force daytime regardless of clock
    Day,
    /// Force night regardless of clock
    Night,
}

impl Mode {
    /// Next mode in the click-through cycle.
    pub fn cycle(self) -> Self {
        match self {
            Mode::Auto => Mode::Day,
            Mode::Day => Mode::Night,
            Mode::Night => Mode::Auto,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Auto
    }
}

/// The four daily habits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HabitKey {
    Meditation,
    Strength,
    Steps,
    Fun,
}

impl HabitKey {
    /// All habits in display order.
    pub const ALL: [HabitKey; 4] = [
        HabitKey::Meditation,
        HabitKey::Strength,
        HabitKey::Steps,
        HabitKey::Fun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HabitKey::Meditation => "meditation",
            HabitKey::Strength => "strength",
            HabitKey::Steps => "steps",
            HabitKey::Fun => "fun",
        }
    }
}

/// One day's habit checklist plus an optional stress rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub meditation: bool,
    #[serde(default)]
    pub strength: bool,
    #[serde(default)]
    pub steps: bool,
    #[serde(default)]
    pub fun: bool,
    /// Evening stress rating, 0 (calm) to 10
    #[serde(default)]
    pub stress: Option<u8>,
}

impl HabitLog {
    pub fn new(date: NaiveDate) -> Self {
        HabitLog {
            date,
            meditation: false,
            strength: false,
            steps: false,
            fun: false,
            stress: None,
        }
    }

    /// Whether the habit was checked off this day.
    pub fn done(&self, key: HabitKey) -> bool {
        match key {
            HabitKey::Meditation => self.meditation,
            HabitKey::Strength => self.strength,
            HabitKey::Steps => self.steps,
            HabitKey::Fun => self.fun,
        }
    }

    fn flag_mut(&mut self, key: HabitKey) -> &mut bool {
        match key {
            HabitKey::Meditation => &mut self.meditation,
            HabitKey::Strength => &mut self.strength,
            HabitKey::Steps => &mut self.steps,
            HabitKey::Fun => &mut self.fun,
        }
    }
}

/// The three wind-down checklist items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindDownChecklist {
    #[serde(default)]
    pub devices_off: bool,
    #[serde(default)]
    pub tidy_up: bool,
    #[serde(default)]
    pub plan_tomorrow: bool,
}

/// One saved wind-down ritual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindDownLog {
    pub ts: NaiveDateTime,
    pub checklist: WindDownChecklist,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The ritual blob persisted as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RitualState {
    /// Wall-clock time the wind-down window opens
    #[serde(default = "default_wind_down_time")]
    pub wind_down_time: NaiveTime,
    #[serde(default)]
    pub mode: Mode,
    /// Wind-down history, oldest first, capped at [`WIND_DOWN_LOG_CAP`]
    #[serde(default)]
    pub logs: Vec<WindDownLog>,
    /// One entry per day the user touched, unordered
    #[serde(default)]
    pub habit_logs: Vec<HabitLog>,
    /// Last day the chime fired, to keep it at once per day
    #[serde(default)]
    pub last_chime_date: Option<NaiveDate>,
}

fn default_wind_down_time() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 30, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for RitualState {
    fn default() -> Self {
        RitualState {
            wind_down_time: default_wind_down_time(),
            mode: Mode::default(),
            logs: Vec::new(),
            habit_logs: Vec::new(),
            last_chime_date: None,
        }
    }
}

impl RitualState {
    /// Repair a freshly loaded blob: enforce the log cap and clamp
    /// out-of-range stress values.
    pub fn normalize(&mut self) {
        if self.logs.len() > WIND_DOWN_LOG_CAP {
            let excess = self.logs.len() - WIND_DOWN_LOG_CAP;
            self.logs.drain(0..excess);
        }
        for log in &mut self.habit_logs {
            if let Some(stress) = log.stress {
                if stress > STRESS_MAX {
                    log.stress = Some(STRESS_MAX);
                }
            }
        }
    }

    /// The day's habit log, if the user touched that day.
    pub fn day(&self, date: NaiveDate) -> Option<&HabitLog> {
        self.habit_logs.iter().find(|log| log.date == date)
    }

    /// The day's habit log, created on first touch.
    pub fn day_mut(&mut self, date: NaiveDate) -> &mut HabitLog {
        let idx = match self.habit_logs.iter().position(|log| log.date == date) {
            Some(idx) => idx,
            None => {
                self.habit_logs.push(HabitLog::new(date));
                self.habit_logs.len() - 1
            }
        };
        &mut self.habit_logs[idx]
    }

    /// Flip a habit for the day and return the new value.
    pub fn toggle_habit(&mut self, date: NaiveDate, key: HabitKey) -> bool {
        let flag = self.day_mut(date).flag_mut(key);
        *flag = !*flag;
        *flag
    }

    /// Record the day's stress rating.
    pub fn set_stress(&mut self, date: NaiveDate, value: u8) -> Result<(), StoreError> {
        if value > STRESS_MAX {
            return Err(StoreError::invalid("stress", "must be between 0 and 10"));
        }
        self.day_mut(date).stress = Some(value);
        Ok(())
    }

    /// Append a wind-down entry, evicting the oldest past the cap.
    pub fn append_log(&mut self, log: WindDownLog) {
        self.logs.push(log);
        if self.logs.len() > WIND_DOWN_LOG_CAP {
            let excess = self.logs.len() - WIND_DOWN_LOG_CAP;
            self.logs.drain(0..excess);
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Advance the mode cycle and return the new mode.
    pub fn cycle_mode(&mut self) -> Mode {
        self.mode = self.mode.cycle();
        self.mode
    }

    pub fn set_wind_down_time(&mut self, time: NaiveTime) {
        self.wind_down_time = time;
    }

    /// Record that the chime fired on `date`.
    pub fn mark_chimed(&mut self, date: NaiveDate) {
        self.last_chime_date = Some(date);
    }

    /// Whether the chime already fired on `date`.
    pub fn chimed_on(&self, date: NaiveDate) -> bool {
        self.last_chime_date == Some(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut state = RitualState::default();
        assert!(state.toggle_habit(d(26), HabitKey::Steps));
        assert!(!state.toggle_habit(d(26), HabitKey::Steps));
        assert_eq!(state.habit_logs.len(), 1);
    }

    #[test]
    fn day_log_is_created_lazily() {
        let mut state = RitualState::default();
        assert!(state.day(d(26)).is_none());
        state.toggle_habit(d(26), HabitKey::Fun);
        let log = state.day(d(26)).unwrap();
        assert!(log.fun);
        assert!(!log.meditation);
    }

    #[test]
    fn stress_rejects_out_of_range() {
        let mut state = RitualState::default();
        assert!(state.set_stress(d(26), 11).is_err());
        state.set_stress(d(26), 0).unwrap();
        state.set_stress(d(26), 10).unwrap();
        assert_eq!(state.day(d(26)).unwrap().stress, Some(10));
    }

    #[test]
    fn wind_down_log_evicts_oldest_past_cap() {
        let mut state = RitualState::default();
        for i in 0..(WIND_DOWN_LOG_CAP + 5) {
            state.append_log(WindDownLog {
                ts: NaiveDateTime::default() + chrono::Duration::minutes(i as i64),
                checklist: WindDownChecklist::default(),
                note: None,
            });
        }
        assert_eq!(state.logs.len(), WIND_DOWN_LOG_CAP);
        assert_eq!(
            state.logs[0].ts,
            NaiveDateTime::default() + chrono::Duration::minutes(5)
        );
    }

    #[test]
    fn mode_cycles_auto_day_night() {
        let mut state = RitualState::default();
        assert_eq!(state.cycle_mode(), Mode::Day);
        assert_eq!(state.cycle_mode(), Mode::Night);
        assert_eq!(state.cycle_mode(), Mode::Auto);
    }

    #[test]
    fn normalize_caps_logs_and_clamps_stress() {
        let mut state = RitualState::default();
        for _ in 0..(WIND_DOWN_LOG_CAP + 3) {
            state.logs.push(WindDownLog {
                ts: NaiveDateTime::default(),
                checklist: WindDownChecklist::default(),
                note: None,
            });
        }
        state.habit_logs.push(HabitLog {
            stress: Some(99),
            ..HabitLog::new(d(26))
        });
        state.normalize();
        assert_eq!(state.logs.len(), WIND_DOWN_LOG_CAP);
        assert_eq!(state.habit_logs[0].stress, Some(10));
    }

    #[test]
    fn chime_bookkeeping_is_per_day() {
        let mut state = RitualState::default();
        assert!(!state.chimed_on(d(26)));
        state.mark_chimed(d(26));
        assert!(state.chimed_on(d(26)));
        assert!(!state.chimed_on(d(27)));
    }
}
