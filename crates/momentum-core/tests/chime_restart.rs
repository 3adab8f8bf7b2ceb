//! Integration tests for the wind-down chime across process restarts.
//!
//! The chime fires once per calendar day. The fired marker lives in the
//! persisted ritual state, so a restart the same evening must stay
//! quiet while the next evening rings again.

use chrono::{NaiveDate, NaiveDateTime};
use momentum_core::{Config, Coordinator, Database, Event};

fn evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 26)
        .unwrap()
        .and_hms_opt(21, 0, 0)
        .unwrap()
}

fn open_at(path: &std::path::Path) -> Coordinator {
    let mut config = Config::default();
    // Keep the test run silent; events still flow
    config.ritual.chime_enabled = false;
    let db = Database::open_at(path).unwrap();
    Coordinator::with_parts(db, config).unwrap()
}

fn chimed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::ChimeFired { .. }))
}

#[test]
fn test_chime_fires_once_per_day_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");
    let now = evening();

    let mut c = open_at(&path);
    let events = c.step(now);
    assert!(chimed(&events));
    assert!(events.iter().any(|e| matches!(e, Event::PanelOpened { .. })));

    // Second tick the same evening stays quiet
    assert!(!chimed(&c.step(now + chrono::Duration::minutes(1))));
    c.shutdown().unwrap();

    // A restart the same evening must not re-ring
    let mut c = open_at(&path);
    assert!(!chimed(&c.step(now + chrono::Duration::minutes(5))));
    c.shutdown().unwrap();
}

#[test]
fn test_chime_rings_again_the_next_evening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    let mut c = open_at(&path);
    assert!(chimed(&c.step(evening())));
    assert!(chimed(&c.step(evening() + chrono::Duration::days(1))));
}

#[test]
fn test_no_chime_before_the_window_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("momentum.db");

    let mut c = open_at(&path);
    let afternoon = NaiveDate::from_ymd_opt(2025, 8, 26)
        .unwrap()
        .and_hms_opt(15, 0, 0)
        .unwrap();
    assert!(!chimed(&c.step(afternoon)));

    // 20:00 is still outside the default 20:30 window; 20:30 is in
    assert!(!chimed(&c.step(afternoon + chrono::Duration::hours(5))));
    let at_open = NaiveDate::from_ymd_opt(2025, 8, 26)
        .unwrap()
        .and_hms_opt(20, 30, 0)
        .unwrap();
    assert!(chimed(&c.step(at_open)));
}
