//! Evening wind-down ritual commands for CLI.

use clap::Subcommand;
use momentum_core::{calendar, Coordinator, Mode, WindDownChecklist};

#[derive(Subcommand)]
pub enum RitualAction {
    /// Current ritual state snapshot as JSON
    Show,
    /// Set the display mode, or cycle it when no mode is given
    Mode {
        /// auto, day or night
        mode: Option<String>,
    },
    /// Set the wall-clock time the wind-down window opens
    Time {
        /// Time as HH:MM
        time: String,
    },
    /// Log tonight's wind-down checklist
    Checklist {
        /// Screens and devices are off
        #[arg(long)]
        devices_off: bool,
        /// Desk and room are tidy
        #[arg(long)]
        tidy_up: bool,
        /// Tomorrow's first move is planned
        #[arg(long)]
        plan_tomorrow: bool,
        /// Free-form note; blank notes are dropped
        #[arg(long)]
        note: Option<String>,
    },
    /// Recent wind-down history, newest first
    Log {
        /// How many entries
        #[arg(long, default_value = "7")]
        limit: usize,
    },
}

pub fn run(action: RitualAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::open()?;
    let now = chrono::Local::now().naive_local();

    match action {
        RitualAction::Show => {
            let snapshot = coordinator.scheduler().snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        RitualAction::Mode { mode } => {
            match mode {
                Some(value) => coordinator.set_mode(parse_mode(&value)?, now),
                None => {
                    coordinator.cycle_mode(now);
                }
            }
            let mode = coordinator.scheduler().state().mode;
            println!("{}", serde_json::to_string_pretty(&mode)?);
        }
        RitualAction::Time { time } => {
            let time = calendar::parse_clock_time(&time)?;
            coordinator.set_wind_down_time(time, now);
            println!("wind-down time set: {}", time.format("%H:%M"));
        }
        RitualAction::Checklist {
            devices_off,
            tidy_up,
            plan_tomorrow,
            note,
        } => {
            let checklist = WindDownChecklist {
                devices_off,
                tidy_up,
                plan_tomorrow,
            };
            for event in coordinator.save_wind_down(checklist, note, now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        RitualAction::Log { limit } => {
            let logs: Vec<_> = coordinator
                .scheduler()
                .state()
                .logs
                .iter()
                .rev()
                .take(limit)
                .cloned()
                .collect();
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
    }

    coordinator.shutdown()?;
    Ok(())
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    match value {
        "auto" => Ok(Mode::Auto),
        "day" => Ok(Mode::Day),
        "night" => Ok(Mode::Night),
        other => Err(format!("unknown mode: {other}")),
    }
}
