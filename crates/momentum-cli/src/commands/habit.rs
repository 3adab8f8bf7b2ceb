//! Daily habit commands for CLI.

use clap::Subcommand;
use momentum_core::{Coordinator, HabitKey, HabitLog};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Today's habit checklist
    Show,
    /// Toggle a habit for today
    Toggle {
        /// meditation (med), strength (str), steps or fun
        key: String,
    },
    /// Rate tonight's stress, 0 (calm) to 10
    Stress {
        /// Stress rating
        value: u8,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::open()?;
    let now = chrono::Local::now().naive_local();

    match action {
        HabitAction::Show => {
            let log = coordinator
                .scheduler()
                .state()
                .day(now.date())
                .cloned()
                .unwrap_or_else(|| HabitLog::new(now.date()));
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        HabitAction::Toggle { key } => {
            let key = parse_habit_key(&key)?;
            let done = coordinator.toggle_habit(key, now);
            println!("{}: {}", key.as_str(), if done { "done" } else { "not done" });
        }
        HabitAction::Stress { value } => {
            coordinator.set_stress(value, now)?;
            println!("stress recorded: {value}");
        }
    }

    coordinator.shutdown()?;
    Ok(())
}

fn parse_habit_key(value: &str) -> Result<HabitKey, String> {
    match value {
        "meditation" | "med" => Ok(HabitKey::Meditation),
        "strength" | "str" => Ok(HabitKey::Strength),
        "steps" => Ok(HabitKey::Steps),
        "fun" => Ok(HabitKey::Fun),
        other => Err(format!("unknown habit: {other}")),
    }
}
