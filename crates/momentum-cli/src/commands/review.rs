//! Weekly review commands for CLI.

use clap::Subcommand;
use momentum_core::{Config, Database, Review, ReviewAutosave};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Show a week's review
    Show {
        /// Week id (defaults to the current week)
        #[arg(long)]
        week: Option<String>,
    },
    /// Replace this week's review notes
    Notes {
        /// Note text
        notes: String,
    },
    /// Add a win to this week's review
    Win {
        /// Win text; blank wins are dropped
        win: String,
    },
    /// Remove a win by its zero-based index
    RemoveWin {
        /// Index into the wins list
        index: usize,
    },
    /// Most recent wins across all reviews, newest first
    RecentWins {
        /// How many wins
        #[arg(long, default_value = "3")]
        limit: usize,
    },
}

pub fn run(action: ReviewAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = chrono::Local::now().naive_local();

    match action {
        ReviewAction::Show { week } => {
            let week_id = match week {
                Some(id) => id,
                None => db.get_or_create_week(now)?.id,
            };
            let review = db
                .get_review(&week_id)?
                .unwrap_or_else(|| Review::new(week_id.as_str(), now));
            println!("{}", serde_json::to_string_pretty(&review)?);
        }
        ReviewAction::Notes { notes } => {
            let mut autosave = open_autosave(&db, now)?;
            autosave.edit_notes(&notes, now);
            let review = autosave.review().clone();
            autosave.finish(&db)?;
            println!("{}", serde_json::to_string_pretty(&review)?);
        }
        ReviewAction::Win { win } => {
            let mut autosave = open_autosave(&db, now)?;
            autosave.add_win(&win, now);
            let review = autosave.review().clone();
            autosave.finish(&db)?;
            println!("{}", serde_json::to_string_pretty(&review)?);
        }
        ReviewAction::RemoveWin { index } => {
            let mut autosave = open_autosave(&db, now)?;
            autosave.remove_win(index, now);
            let review = autosave.review().clone();
            autosave.finish(&db)?;
            println!("{}", serde_json::to_string_pretty(&review)?);
        }
        ReviewAction::RecentWins { limit } => {
            let wins = db.recent_wins(limit)?;
            println!("{}", serde_json::to_string_pretty(&wins)?);
        }
    }
    Ok(())
}

/// This week's review wrapped for editing, created empty on first touch.
fn open_autosave(
    db: &Database,
    now: chrono::NaiveDateTime,
) -> Result<ReviewAutosave, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let week = db.get_or_create_week(now)?;
    let review = db
        .get_review(&week.id)?
        .unwrap_or_else(|| Review::new(week.id.as_str(), now));
    Ok(ReviewAutosave::new(
        review,
        config.autosave.debounce_ms,
        config.autosave.min_write_interval_ms,
    ))
}
