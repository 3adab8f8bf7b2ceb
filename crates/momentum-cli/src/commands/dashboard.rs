//! One-screen dashboard for CLI.

use momentum_core::stats;
use momentum_core::{calendar, Config, Database};

/// Today and this week on one screen: outcomes with progress, goal
/// rings, today's micro-actions and the latest wins.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let now = chrono::Local::now().naive_local();
    let state = db.load_ritual_state()?.unwrap_or_default();

    let week = db.get_or_create_week(now)?;
    let outcomes = db.list_outcomes(&week.id)?;
    let progress = stats::outcome_progress(&outcomes);
    let totals = stats::rolling_window(&state.habit_logs, 7, now.date());
    let rings = stats::ring_report(&totals, &config.goals);
    let today_actions = db.list_actions_on(now.date())?;
    let recent_wins = db.recent_wins(3)?;

    let dashboard = serde_json::json!({
        "date": calendar::day_key(now.date()),
        "week": week,
        "outcomes": outcomes,
        "progress": progress,
        "rings": rings,
        "today_actions": today_actions,
        "recent_wins": recent_wins,
    });
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}
