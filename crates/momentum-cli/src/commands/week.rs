//! Week identity commands for CLI.

use clap::Subcommand;
use momentum_core::calendar;
use momentum_core::Database;

#[derive(Subcommand)]
pub enum WeekAction {
    /// Show the current week, creating its row on first touch
    Current,
    /// List recent week ranges, oldest first
    Recent {
        /// How many weeks back
        #[arg(long, default_value = "8")]
        weeks: u32,
    },
}

pub fn run(action: WeekAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = chrono::Local::now().naive_local();

    match action {
        WeekAction::Current => {
            let db = Database::open()?;
            let week = db.get_or_create_week(now)?;
            println!("{}", serde_json::to_string_pretty(&week)?);
        }
        WeekAction::Recent { weeks } => {
            let ranges = calendar::recent_week_ranges(weeks, now.date());
            println!("{}", serde_json::to_string_pretty(&ranges)?);
        }
    }
    Ok(())
}
