//! Streak, ring and rollup commands for CLI.

use clap::Subcommand;
use momentum_core::stats;
use momentum_core::{calendar, Config, Database, HabitKey};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Per-habit streaks ending today
    Streaks,
    /// Weekly goal rings over the last seven days
    Rings,
    /// Per-week habit rollups
    Weeks {
        /// How many weeks back
        #[arg(long, default_value = "8")]
        weeks: u32,
    },
    /// This week's outcome progress
    Progress,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = chrono::Local::now().naive_local();
    let state = db.load_ritual_state()?.unwrap_or_default();

    match action {
        StatsAction::Streaks => {
            let mut streaks = serde_json::Map::new();
            for key in HabitKey::ALL {
                let streak = stats::habit_streak(&state.habit_logs, key, now.date());
                streaks.insert(key.as_str().to_string(), streak.into());
            }
            let streaks = serde_json::Value::Object(streaks);
            println!("{}", serde_json::to_string_pretty(&streaks)?);
        }
        StatsAction::Rings => {
            let config = Config::load_or_default();
            let totals = stats::rolling_window(&state.habit_logs, 7, now.date());
            let rings = stats::ring_report(&totals, &config.goals);
            println!("{}", serde_json::to_string_pretty(&rings)?);
        }
        StatsAction::Weeks { weeks } => {
            let ranges = calendar::recent_week_ranges(weeks, now.date());
            let rollups = stats::weekly_rollup(&state.habit_logs, &ranges);
            println!("{}", serde_json::to_string_pretty(&rollups)?);
        }
        StatsAction::Progress => {
            let week = db.get_or_create_week(now)?;
            let outcomes = db.list_outcomes(&week.id)?;
            let progress = stats::outcome_progress(&outcomes);
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    }
    Ok(())
}
