//! SQLite-based entity store for the weekly planning data.
//!
//! Provides persistent storage for:
//! - Week rows keyed by week id
//! - Weekly outcomes and their micro-actions
//! - Weekly reviews
//! - The ritual state blob, in a key-value table
//!
//! All cross-entity rules live here: the three-outcome cap, the single
//! open micro-action per day, and the status promotions that fire when
//! actions are created or completed.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::calendar;
use crate::error::{CoreError, StoreError};
use crate::plan::{action_label, MicroAction, Outcome, OutcomeStatus, Review, Week};
use crate::ritual::RitualState;

/// Hard cap on outcomes per week.
pub const OUTCOME_CAP: usize = 3;

/// kv key holding the ritual state blob.
const RITUAL_STATE_KEY: &str = "ritual_state_v1";

const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FMT: &str = "%Y-%m-%d";

// === Helper Functions ===

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

/// Parse a stored timestamp, falling back to the epoch on corrupt text.
fn parse_datetime_fallback(dt_str: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(dt_str, DATETIME_FMT).unwrap_or_default()
}

/// Parse a stored date, falling back to the epoch on corrupt text.
fn parse_date_fallback(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, DATE_FMT).unwrap_or_default()
}

/// Parse outcome status from database string
fn parse_outcome_status(status_str: &str) -> OutcomeStatus {
    match status_str {
        "in_progress" => OutcomeStatus::InProgress,
        "done" => OutcomeStatus::Done,
        "skipped" => OutcomeStatus::Skipped,
        _ => OutcomeStatus::Planned,
    }
}

/// Format outcome status for database storage
fn format_outcome_status(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Planned => "planned",
        OutcomeStatus::InProgress => "in_progress",
        OutcomeStatus::Done => "done",
        OutcomeStatus::Skipped => "skipped",
    }
}

/// Build an Outcome from a database row
fn row_to_outcome(row: &rusqlite::Row) -> Result<Outcome, rusqlite::Error> {
    let status_str: String = row.get(3)?;
    let created_at_str: String = row.get(6)?;

    Ok(Outcome {
        id: row.get(0)?,
        week_id: row.get(1)?,
        title: row.get(2)?,
        status: parse_outcome_status(&status_str),
        metric: row.get(4)?,
        target: row.get(5)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// Build a MicroAction from a database row
fn row_to_action(row: &rusqlite::Row) -> Result<MicroAction, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let completed_at_str: Option<String> = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(MicroAction {
        id: row.get(0)?,
        outcome_id: row.get(1)?,
        date: parse_date_fallback(&date_str),
        label: row.get(3)?,
        duration_secs: row.get(4)?,
        completed_at: completed_at_str.map(|s| parse_datetime_fallback(&s)),
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// SQLite database for the planning entities.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/momentum.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("momentum.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path. Public for testing.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        migrations::migrate(&self.conn)
    }

    // === Weeks ===

    /// The week row for the week containing `now`, created on first touch.
    pub fn get_or_create_week(&self, now: NaiveDateTime) -> Result<Week, StoreError> {
        let date = now.date();
        let id = calendar::week_id(date);
        let starts_at = calendar::week_start(date);
        let ends_at = calendar::week_end(date);
        self.conn.execute(
            "INSERT OR IGNORE INTO weeks (id, starts_at, ends_at) VALUES (?1, ?2, ?3)",
            params![id, calendar::day_key(starts_at), calendar::day_key(ends_at)],
        )?;
        Ok(Week {
            id,
            starts_at,
            ends_at,
        })
    }

    pub fn get_week(&self, id: &str) -> Result<Option<Week>, StoreError> {
        let week = self
            .conn
            .query_row(
                "SELECT id, starts_at, ends_at FROM weeks WHERE id = ?1",
                params![id],
                |row| {
                    let starts_at: String = row.get(1)?;
                    let ends_at: String = row.get(2)?;
                    Ok(Week {
                        id: row.get(0)?,
                        starts_at: parse_date_fallback(&starts_at),
                        ends_at: parse_date_fallback(&ends_at),
                    })
                },
            )
            .optional()?;
        Ok(week)
    }

    // === Outcomes ===

    /// All outcomes of a week in creation order.
    pub fn list_outcomes(&self, week_id: &str) -> Result<Vec<Outcome>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, week_id, title, status, metric, target, created_at
             FROM outcomes
             WHERE week_id = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![week_id], row_to_outcome)?;
        let mut outcomes = Vec::new();
        for row in rows {
            outcomes.push(row?);
        }
        Ok(outcomes)
    }

    pub fn get_outcome(&self, id: &str) -> Result<Option<Outcome>, StoreError> {
        let outcome = self
            .conn
            .query_row(
                "SELECT id, week_id, title, status, metric, target, created_at
                 FROM outcomes WHERE id = ?1",
                params![id],
                row_to_outcome,
            )
            .optional()?;
        Ok(outcome)
    }

    /// Add an outcome to a week.
    ///
    /// Rejects an empty title, an unknown week, and any addition past the
    /// three-per-week cap.
    pub fn add_outcome(
        &self,
        week_id: &str,
        title: &str,
        metric: Option<String>,
        target: Option<f64>,
        now: NaiveDateTime,
    ) -> Result<Outcome, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::invalid("title", "cannot be empty"));
        }
        if self.get_week(week_id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "week",
                id: week_id.to_string(),
            });
        }

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM outcomes WHERE week_id = ?1",
            params![week_id],
            |row| row.get(0),
        )?;
        if count >= OUTCOME_CAP as i64 {
            return Err(StoreError::CapacityExceeded {
                week_id: week_id.to_string(),
                limit: OUTCOME_CAP,
            });
        }

        let outcome = Outcome {
            id: Uuid::new_v4().to_string(),
            week_id: week_id.to_string(),
            title: title.to_string(),
            status: OutcomeStatus::Planned,
            metric,
            target,
            created_at: now,
        };
        self.conn.execute(
            "INSERT INTO outcomes (id, week_id, title, status, metric, target, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                outcome.id,
                outcome.week_id,
                outcome.title,
                format_outcome_status(outcome.status),
                outcome.metric,
                outcome.target,
                format_datetime(outcome.created_at),
            ],
        )?;
        Ok(outcome)
    }

    pub fn set_outcome_status(
        &self,
        id: &str,
        status: OutcomeStatus,
    ) -> Result<Outcome, StoreError> {
        let changed = self.conn.execute(
            "UPDATE outcomes SET status = ?1 WHERE id = ?2",
            params![format_outcome_status(status), id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "outcome",
                id: id.to_string(),
            });
        }
        self.get_outcome(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "outcome",
            id: id.to_string(),
        })
    }

    /// Rename an outcome. Labels of already-minted micro-actions keep the
    /// old title.
    pub fn rename_outcome(&self, id: &str, title: &str) -> Result<Outcome, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::invalid("title", "cannot be empty"));
        }
        let changed = self.conn.execute(
            "UPDATE outcomes SET title = ?1 WHERE id = ?2",
            params![title, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "outcome",
                id: id.to_string(),
            });
        }
        self.get_outcome(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "outcome",
            id: id.to_string(),
        })
    }

    // === Micro-actions ===

    /// The day's open micro-action, if any. At most one can exist.
    pub fn open_action_on(&self, date: NaiveDate) -> Result<Option<MicroAction>, StoreError> {
        let action = self
            .conn
            .query_row(
                "SELECT id, outcome_id, date, label, duration_secs, completed_at, created_at
                 FROM actions
                 WHERE date = ?1 AND completed_at IS NULL
                 ORDER BY created_at ASC LIMIT 1",
                params![calendar::day_key(date)],
                row_to_action,
            )
            .optional()?;
        Ok(action)
    }

    /// Mint the day's micro-action for an outcome.
    ///
    /// The label freezes the outcome title at this moment. A planned
    /// outcome is promoted to in_progress. Fails while the day already
    /// has an open action.
    pub fn create_micro_action(
        &self,
        outcome_id: &str,
        date: NaiveDate,
        duration_secs: u64,
        now: NaiveDateTime,
    ) -> Result<MicroAction, StoreError> {
        let outcome = self
            .get_outcome(outcome_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "outcome",
                id: outcome_id.to_string(),
            })?;
        if self.open_action_on(date)?.is_some() {
            return Err(StoreError::OpenActionExists { date });
        }

        let action = MicroAction {
            id: Uuid::new_v4().to_string(),
            outcome_id: outcome_id.to_string(),
            date,
            label: action_label(&outcome.title),
            duration_secs,
            completed_at: None,
            created_at: now,
        };
        self.conn.execute(
            "INSERT INTO actions (id, outcome_id, date, label, duration_secs, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6)",
            params![
                action.id,
                action.outcome_id,
                calendar::day_key(action.date),
                action.label,
                action.duration_secs,
                format_datetime(action.created_at),
            ],
        )?;

        if outcome.status == OutcomeStatus::Planned {
            self.set_outcome_status(outcome_id, OutcomeStatus::InProgress)?;
        }
        Ok(action)
    }

    /// Complete a micro-action and promote its outcome to done.
    ///
    /// Completing an already-completed action is a no-op that returns the
    /// stored row unchanged.
    pub fn complete_micro_action(
        &self,
        id: &str,
        now: NaiveDateTime,
    ) -> Result<MicroAction, StoreError> {
        let mut action = self.get_action(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "micro-action",
            id: id.to_string(),
        })?;
        if !action.is_open() {
            return Ok(action);
        }

        self.conn.execute(
            "UPDATE actions SET completed_at = ?1 WHERE id = ?2",
            params![format_datetime(now), id],
        )?;
        action.completed_at = Some(now);

        if let Some(outcome) = self.get_outcome(&action.outcome_id)? {
            if outcome.status != OutcomeStatus::Done {
                self.set_outcome_status(&action.outcome_id, OutcomeStatus::Done)?;
            }
        }
        Ok(action)
    }

    pub fn get_action(&self, id: &str) -> Result<Option<MicroAction>, StoreError> {
        let action = self
            .conn
            .query_row(
                "SELECT id, outcome_id, date, label, duration_secs, completed_at, created_at
                 FROM actions WHERE id = ?1",
                params![id],
                row_to_action,
            )
            .optional()?;
        Ok(action)
    }

    pub fn list_actions_on(&self, date: NaiveDate) -> Result<Vec<MicroAction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, outcome_id, date, label, duration_secs, completed_at, created_at
             FROM actions
             WHERE date = ?1
             ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(params![calendar::day_key(date)], row_to_action)?;
        let mut actions = Vec::new();
        for row in rows {
            actions.push(row?);
        }
        Ok(actions)
    }

    pub fn list_actions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MicroAction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, outcome_id, date, label, duration_secs, completed_at, created_at
             FROM actions
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC, created_at ASC",
        )?;
        let rows = stmt.query_map(
            params![calendar::day_key(start), calendar::day_key(end)],
            row_to_action,
        )?;
        let mut actions = Vec::new();
        for row in rows {
            actions.push(row?);
        }
        Ok(actions)
    }

    // === Reviews ===

    pub fn upsert_review(&self, review: &Review) -> Result<(), StoreError> {
        let wins = serde_json::to_string(&review.wins)?;
        let kpi_snapshot = serde_json::to_string(&review.kpi_snapshot)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO reviews (week_id, notes, wins, kpi_snapshot, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                review.week_id,
                review.notes,
                wins,
                kpi_snapshot,
                format_datetime(review.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_review(&self, week_id: &str) -> Result<Option<Review>, StoreError> {
        let review = self
            .conn
            .query_row(
                "SELECT week_id, notes, wins, kpi_snapshot, updated_at
                 FROM reviews WHERE week_id = ?1",
                params![week_id],
                |row| {
                    let wins: String = row.get(2)?;
                    let kpi_snapshot: String = row.get(3)?;
                    let updated_at: String = row.get(4)?;
                    Ok(Review {
                        week_id: row.get(0)?,
                        notes: row.get(1)?,
                        wins: serde_json::from_str(&wins).unwrap_or_default(),
                        kpi_snapshot: serde_json::from_str(&kpi_snapshot).unwrap_or_default(),
                        updated_at: parse_datetime_fallback(&updated_at),
                    })
                },
            )
            .optional()?;
        Ok(review)
    }

    /// The most recent wins across all reviews, newest week first.
    pub fn recent_wins(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT wins FROM reviews ORDER BY week_id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut wins: Vec<String> = Vec::new();
        for row in rows {
            let parsed: Vec<String> = serde_json::from_str(&row?).unwrap_or_default();
            wins.extend(parsed);
        }
        if wins.len() > limit {
            wins = wins.split_off(wins.len() - limit);
        }
        wins.reverse();
        Ok(wins)
    }

    // === Ritual state blob ===

    /// Load the ritual state blob.
    ///
    /// Returns `None` when the key was never written. A blob that fails to
    /// parse is treated the same way so one corrupt write never bricks
    /// startup.
    pub fn load_ritual_state(&self) -> Result<Option<RitualState>, StoreError> {
        match self.kv_get(RITUAL_STATE_KEY)? {
            None => Ok(None),
            Some(raw) => match serde_json::from_str::<RitualState>(&raw) {
                Ok(mut state) => {
                    state.normalize();
                    Ok(Some(state))
                }
                Err(e) => {
                    tracing::warn!("ritual state blob is corrupt, starting fresh: {e}");
                    Ok(None)
                }
            },
        }
    }

    pub fn save_ritual_state(&self, state: &RitualState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.kv_set(RITUAL_STATE_KEY, &json)?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ritual::{HabitKey, WIND_DOWN_LOG_CAP};

    fn dt(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn week_row_is_created_once() {
        let db = Database::open_memory().unwrap();
        let a = db.get_or_create_week(dt(26, 9)).unwrap();
        let b = db.get_or_create_week(dt(27, 9)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id, "2025-W35");
        assert!(db.get_week("2025-W35").unwrap().is_some());
        assert!(db.get_week("2025-W01").unwrap().is_none());
    }

    #[test]
    fn outcome_cap_is_enforced() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        for i in 0..3 {
            db.add_outcome(&week.id, &format!("Outcome {i}"), None, None, dt(26, 9))
                .unwrap();
        }
        let err = db
            .add_outcome(&week.id, "One too many", None, None, dt(26, 9))
            .unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded { limit: 3, .. }));
        assert_eq!(db.list_outcomes(&week.id).unwrap().len(), 3);
    }

    #[test]
    fn outcome_title_is_validated_and_trimmed() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        assert!(db
            .add_outcome(&week.id, "   ", None, None, dt(26, 9))
            .is_err());
        let outcome = db
            .add_outcome(&week.id, "  Ship landing page  ", None, None, dt(26, 9))
            .unwrap();
        assert_eq!(outcome.title, "Ship landing page");
    }

    #[test]
    fn outcome_requires_existing_week() {
        let db = Database::open_memory().unwrap();
        let err = db
            .add_outcome("2030-W01", "Future plans", None, None, dt(26, 9))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "week", .. }));
    }

    #[test]
    fn action_creation_promotes_planned_outcome() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        let outcome = db
            .add_outcome(&week.id, "Ship landing page", None, None, dt(26, 9))
            .unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Planned);

        let action = db
            .create_micro_action(&outcome.id, dt(26, 9).date(), 120, dt(26, 9))
            .unwrap();
        assert_eq!(action.label, "2-min move on: Ship landing page");
        assert!(action.is_open());

        let outcome = db.get_outcome(&outcome.id).unwrap().unwrap();
        assert_eq!(outcome.status, OutcomeStatus::InProgress);
    }

    #[test]
    fn one_open_action_per_day() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        let first = db
            .add_outcome(&week.id, "First", None, None, dt(26, 9))
            .unwrap();
        let second = db
            .add_outcome(&week.id, "Second", None, None, dt(26, 9))
            .unwrap();

        let action = db
            .create_micro_action(&first.id, dt(26, 9).date(), 120, dt(26, 9))
            .unwrap();
        let err = db
            .create_micro_action(&second.id, dt(26, 9).date(), 120, dt(26, 10))
            .unwrap_err();
        assert!(matches!(err, StoreError::OpenActionExists { .. }));

        // Completing the open action unblocks the day
        db.complete_micro_action(&action.id, dt(26, 10)).unwrap();
        db.create_micro_action(&second.id, dt(26, 9).date(), 120, dt(26, 11))
            .unwrap();
        // A different day was never blocked
        assert!(db.open_action_on(dt(27, 9).date()).unwrap().is_none());
    }

    #[test]
    fn completion_promotes_outcome_and_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        let outcome = db
            .add_outcome(&week.id, "Ship landing page", None, None, dt(26, 9))
            .unwrap();
        let action = db
            .create_micro_action(&outcome.id, dt(26, 9).date(), 120, dt(26, 9))
            .unwrap();

        let done = db.complete_micro_action(&action.id, dt(26, 10)).unwrap();
        assert_eq!(done.completed_at, Some(dt(26, 10)));
        let outcome = db.get_outcome(&outcome.id).unwrap().unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Done);

        // Second completion keeps the first timestamp
        let again = db.complete_micro_action(&action.id, dt(26, 12)).unwrap();
        assert_eq!(again.completed_at, Some(dt(26, 10)));
    }

    #[test]
    fn rename_does_not_rewrite_minted_labels() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        let outcome = db
            .add_outcome(&week.id, "Old title", None, None, dt(26, 9))
            .unwrap();
        let action = db
            .create_micro_action(&outcome.id, dt(26, 9).date(), 120, dt(26, 9))
            .unwrap();

        db.rename_outcome(&outcome.id, "New title").unwrap();
        let stored = db.get_action(&action.id).unwrap().unwrap();
        assert_eq!(stored.label, "2-min move on: Old title");

        // The next minted action picks up the new title
        db.complete_micro_action(&action.id, dt(26, 10)).unwrap();
        let next = db
            .create_micro_action(&outcome.id, dt(27, 9).date(), 120, dt(27, 9))
            .unwrap();
        assert_eq!(next.label, "2-min move on: New title");
    }

    #[test]
    fn actions_listed_by_day_and_range() {
        let db = Database::open_memory().unwrap();
        let week = db.get_or_create_week(dt(26, 9)).unwrap();
        let outcome = db
            .add_outcome(&week.id, "Ship landing page", None, None, dt(26, 9))
            .unwrap();
        let a = db
            .create_micro_action(&outcome.id, dt(26, 9).date(), 120, dt(26, 9))
            .unwrap();
        db.complete_micro_action(&a.id, dt(26, 10)).unwrap();
        db.create_micro_action(&outcome.id, dt(27, 9).date(), 120, dt(27, 9))
            .unwrap();

        assert_eq!(db.list_actions_on(dt(26, 9).date()).unwrap().len(), 1);
        let range = db
            .list_actions_between(dt(26, 9).date(), dt(27, 9).date())
            .unwrap();
        assert_eq!(range.len(), 2);
        assert!(range[0].date < range[1].date);
    }

    #[test]
    fn review_roundtrip() {
        let db = Database::open_memory().unwrap();
        let mut review = Review::new("2025-W35", dt(31, 20));
        review.notes = "Solid week".to_string();
        review.wins = vec!["Shipped the page".to_string()];
        review.kpi_snapshot.insert("signups".to_string(), 12.0);

        db.upsert_review(&review).unwrap();
        let stored = db.get_review("2025-W35").unwrap().unwrap();
        assert_eq!(stored, review);
        assert!(db.get_review("2025-W34").unwrap().is_none());
    }

    #[test]
    fn recent_wins_are_newest_first() {
        let db = Database::open_memory().unwrap();
        let mut w34 = Review::new("2025-W34", dt(24, 20));
        w34.wins = vec!["a".to_string(), "b".to_string()];
        let mut w35 = Review::new("2025-W35", dt(31, 20));
        w35.wins = vec!["c".to_string(), "d".to_string()];
        db.upsert_review(&w34).unwrap();
        db.upsert_review(&w35).unwrap();

        assert_eq!(db.recent_wins(3).unwrap(), vec!["d", "c", "b"]);
        assert_eq!(db.recent_wins(10).unwrap().len(), 4);
    }

    #[test]
    fn ritual_state_blob_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_ritual_state().unwrap().is_none());

        let mut state = RitualState::default();
        state.toggle_habit(dt(26, 9).date(), HabitKey::Steps);
        state.mark_chimed(dt(26, 9).date());
        db.save_ritual_state(&state).unwrap();

        let loaded = db.load_ritual_state().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn corrupt_ritual_blob_reads_as_fresh() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RITUAL_STATE_KEY, "{not json").unwrap();
        assert!(db.load_ritual_state().unwrap().is_none());
    }

    #[test]
    fn oversized_ritual_blob_is_normalized_on_load() {
        let db = Database::open_memory().unwrap();
        let mut state = RitualState::default();
        for _ in 0..(WIND_DOWN_LOG_CAP + 10) {
            state.logs.push(crate::ritual::WindDownLog {
                ts: dt(26, 21),
                checklist: crate::ritual::WindDownChecklist::default(),
                note: None,
            });
        }
        db.save_ritual_state(&state).unwrap();
        let loaded = db.load_ritual_state().unwrap().unwrap();
        assert_eq!(loaded.logs.len(), WIND_DOWN_LOG_CAP);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}
