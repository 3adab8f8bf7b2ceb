//! Weekly outcome commands for CLI.

use clap::Subcommand;
use momentum_core::{Database, OutcomeStatus};

#[derive(Subcommand)]
pub enum OutcomeAction {
    /// Add an outcome to the current week (at most three per week)
    Add {
        /// Outcome title
        title: String,
        /// Metric name, e.g. "pages"
        #[arg(long)]
        metric: Option<String>,
        /// Metric target value
        #[arg(long)]
        target: Option<f64>,
    },
    /// List a week's outcomes
    List {
        /// Week id (defaults to the current week)
        #[arg(long)]
        week: Option<String>,
    },
    /// Set an outcome's status directly
    SetStatus {
        /// Outcome ID
        id: String,
        /// planned, in_progress, done or skipped
        status: String,
    },
    /// Advance an outcome one step around the status cycle
    Cycle {
        /// Outcome ID
        id: String,
    },
    /// Rename an outcome; already-minted action labels keep the old title
    Rename {
        /// Outcome ID
        id: String,
        /// New title
        title: String,
    },
}

pub fn run(action: OutcomeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = chrono::Local::now().naive_local();

    match action {
        OutcomeAction::Add {
            title,
            metric,
            target,
        } => {
            let week = db.get_or_create_week(now)?;
            let outcome = db.add_outcome(&week.id, &title, metric, target, now)?;
            println!("Outcome added: {}", outcome.id);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutcomeAction::List { week } => {
            let week_id = match week {
                Some(id) => id,
                None => db.get_or_create_week(now)?.id,
            };
            let outcomes = db.list_outcomes(&week_id)?;
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        OutcomeAction::SetStatus { id, status } => {
            let outcome = db.set_outcome_status(&id, parse_status(&status)?)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutcomeAction::Cycle { id } => {
            let outcome = db
                .get_outcome(&id)?
                .ok_or(format!("Outcome not found: {id}"))?;
            let outcome = db.set_outcome_status(&id, outcome.status.cycle())?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutcomeAction::Rename { id, title } => {
            let outcome = db.rename_outcome(&id, &title)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}

fn parse_status(value: &str) -> Result<OutcomeStatus, String> {
    match value {
        "planned" => Ok(OutcomeStatus::Planned),
        "in_progress" => Ok(OutcomeStatus::InProgress),
        "done" => Ok(OutcomeStatus::Done),
        "skipped" => Ok(OutcomeStatus::Skipped),
        other => Err(format!("unknown status: {other}")),
    }
}
