//! Week identity and clock-window math.
//!
//! Weeks run Monday through Sunday. A week id is derived from its Monday,
//! so every day of one week maps to the same id even when the week spans
//! a year boundary.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The wind-down window wraps past midnight and runs until 05:00.
const EARLY_MORNING_END_MIN: u32 = 300;

/// Canonical key for one day, e.g. `2025-08-26`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let start = week_start(date);
    start.checked_add_days(Days::new(6)).unwrap_or(start)
}

/// Week id of the week containing `date`, e.g. `2025-W35`.
///
/// The year and week number both come from the week's Monday: the number
/// counts ceil-divided days since that year's Jan 1, offset by Jan 1's
/// day-of-week (Sunday = 0). Late-December weeks therefore keep the old
/// year's id through their Sunday.
pub fn week_id(date: NaiveDate) -> String {
    let monday = week_start(date);
    let year = monday.year();
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(monday);
    let days = (monday - jan1).num_days();
    let offset = i64::from(jan1.weekday().num_days_from_sunday());
    let week = (days + offset + 1 + 6) / 7;
    format!("{year}-W{week:02}")
}

/// Parse a wall-clock `HH:MM` string.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, StoreError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| StoreError::invalid("time", "expected HH:MM"))
}

/// Whether `now` falls inside the wind-down window.
///
/// The window opens at the configured wind-down time and stays open
/// through the night until 05:00 inclusive.
pub fn is_after_wind_down(now: NaiveTime, wind_down: NaiveTime) -> bool {
    let mins = now.hour() * 60 + now.minute();
    let start = wind_down.hour() * 60 + wind_down.minute();
    mins >= start || mins <= EARLY_MORNING_END_MIN
}

/// Unpadded `M/D` rendering used in week labels.
pub fn short_month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// One Monday..Sunday span with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// The last `weeks` week ranges ending with the week containing `today`,
/// oldest first.
pub fn recent_week_ranges(weeks: u32, today: NaiveDate) -> Vec<WeekRange> {
    let mut ranges = Vec::with_capacity(weeks as usize);
    for back in (0..weeks).rev() {
        let day = today
            .checked_sub_days(Days::new(u64::from(back) * 7))
            .unwrap_or(today);
        let start = week_start(day);
        let end = week_end(day);
        let label = format!("{}-{}", short_month_day(start), short_month_day(end));
        ranges.push(WeekRange { start, end, label });
    }
    ranges
}
