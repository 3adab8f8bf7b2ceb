//! Micro-action commands for CLI.

use clap::Subcommand;
use momentum_core::{calendar, Config, Database};

#[derive(Subcommand)]
pub enum ActionAction {
    /// Mint today's two-minute micro-action for an outcome
    Create {
        /// Outcome ID
        outcome_id: String,
    },
    /// Complete a micro-action
    Complete {
        /// Action ID (defaults to today's open action)
        id: Option<String>,
    },
    /// List today's micro-actions
    Today,
    /// List a day's micro-actions
    List {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List this week's micro-actions
    Week,
}

pub fn run(action: ActionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = chrono::Local::now().naive_local();

    match action {
        ActionAction::Create { outcome_id } => {
            let config = Config::load_or_default();
            let minted =
                db.create_micro_action(&outcome_id, now.date(), config.timer.action_secs, now)?;
            println!("Micro-action minted: {}", minted.id);
            println!("{}", serde_json::to_string_pretty(&minted)?);
        }
        ActionAction::Complete { id } => {
            let id = match id {
                Some(id) => id,
                None => db
                    .open_action_on(now.date())?
                    .map(|a| a.id)
                    .ok_or("no open micro-action today")?,
            };
            let completed = db.complete_micro_action(&id, now)?;
            println!("{}", serde_json::to_string_pretty(&completed)?);
        }
        ActionAction::Today => {
            let actions = db.list_actions_on(now.date())?;
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
        ActionAction::List { date } => {
            let date = match date {
                Some(value) => chrono::NaiveDate::parse_from_str(&value, "%Y-%m-%d")?,
                None => now.date(),
            };
            let actions = db.list_actions_on(date)?;
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
        ActionAction::Week => {
            let start = calendar::week_start(now.date());
            let end = calendar::week_end(now.date());
            let actions = db.list_actions_between(start, end)?;
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
    }
    Ok(())
}
