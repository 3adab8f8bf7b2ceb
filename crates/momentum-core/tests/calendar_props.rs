//! Property tests for week arithmetic.
//!
//! Every date must land inside its own week, weeks must span exactly
//! seven days, and the week id must be stable across all seven days.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use momentum_core::calendar;
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_date_lands_inside_its_week(offset_days in 0u64..20_000) {
        let date = base_date() + Days::new(offset_days);
        let start = calendar::week_start(date);
        let end = calendar::week_end(date);

        prop_assert_eq!(start.weekday(), Weekday::Mon);
        prop_assert!(start <= date);
        prop_assert!(date <= end);
        prop_assert_eq!(end - start, chrono::Duration::days(6));
    }

    #[test]
    fn prop_week_id_stable_across_the_week(offset_days in 0u64..20_000) {
        let date = base_date() + Days::new(offset_days);
        let start = calendar::week_start(date);
        let id = calendar::week_id(date);

        for day in 0..7u64 {
            prop_assert_eq!(calendar::week_id(start + Days::new(day)), id.clone());
        }
    }

    #[test]
    fn prop_week_id_is_well_formed(offset_days in 0u64..20_000) {
        let date = base_date() + Days::new(offset_days);
        let id = calendar::week_id(date);

        let (year, week) = id.split_once("-W").unwrap();
        prop_assert_eq!(year.len(), 4);
        prop_assert!(year.parse::<i32>().is_ok());
        let week: u32 = week.parse().unwrap();
        prop_assert!((1..=54).contains(&week));
    }
}
