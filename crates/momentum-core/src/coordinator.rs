//! Application coordinator.
//!
//! Owns the database, the config, the ritual scheduler and the autosave
//! gate, and wires them together: plan commands go straight to the
//! store, ritual commands mutate scheduler state and mark it dirty, and
//! `step` advances the clock and persists whatever is due. The CLI holds
//! exactly one of these per invocation.

use chrono::{NaiveDateTime, NaiveTime};

use crate::autosave::{SaveStatus, WriteCoalescer};
use crate::cue::Chime;
use crate::error::{CoreError, StoreError};
use crate::events::Event;
use crate::plan::{MicroAction, Outcome, Week};
use crate::ritual::{HabitKey, Mode, RitualState, WindDownChecklist};
use crate::store::{Config, Database};
use crate::timer::{RitualScheduler, TimerPurpose};

pub struct Coordinator {
    db: Database,
    config: Config,
    scheduler: RitualScheduler,
    /// Gate in front of the ritual-state blob.
    blob_saves: WriteCoalescer,
    chime: Chime,
}

impl Coordinator {
    /// Open the default database and config.
    pub fn open() -> Result<Self, CoreError> {
        let config = Config::load_or_default();
        let db = Database::open()?;
        Ok(Self::with_parts(db, config)?)
    }

    /// Assemble from explicit parts. Public for testing.
    ///
    /// The persisted ritual state wins over config; the config only
    /// seeds the blob on first run.
    pub fn with_parts(db: Database, config: Config) -> Result<Self, StoreError> {
        let state = match db.load_ritual_state()? {
            Some(state) => state,
            None => {
                let mut state = RitualState::default();
                state.set_wind_down_time(config.wind_down_time());
                state
            }
        };
        let scheduler = RitualScheduler::new(state, config.timer.action_secs);
        let blob_saves = WriteCoalescer::new(
            config.autosave.debounce_ms,
            config.autosave.min_write_interval_ms,
        );
        let chime = Chime::new(config.ritual.chime_enabled);
        Ok(Self {
            db,
            config,
            scheduler,
            blob_saves,
            chime,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scheduler(&self) -> &RitualScheduler {
        &self.scheduler
    }

    pub fn save_status(&self) -> SaveStatus {
        self.blob_saves.status()
    }

    pub fn current_week(&self, now: NaiveDateTime) -> Result<Week, StoreError> {
        self.db.get_or_create_week(now)
    }

    // ── Plan commands ────────────────────────────────────────────────

    /// Add an outcome to the current week, creating the week row if
    /// this is its first touch.
    pub fn add_outcome(
        &self,
        title: &str,
        metric: Option<String>,
        target: Option<f64>,
        now: NaiveDateTime,
    ) -> Result<Outcome, StoreError> {
        let week = self.db.get_or_create_week(now)?;
        self.db.add_outcome(&week.id, title, metric, target, now)
    }

    /// Advance an outcome one step around the status cycle.
    pub fn cycle_outcome(&self, id: &str) -> Result<Outcome, StoreError> {
        let outcome = self.db.get_outcome(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "outcome",
            id: id.to_string(),
        })?;
        self.db.set_outcome_status(id, outcome.status.cycle())
    }

    /// Mint today's micro-action for an outcome.
    pub fn create_micro_action(
        &self,
        outcome_id: &str,
        now: NaiveDateTime,
    ) -> Result<MicroAction, StoreError> {
        self.db
            .create_micro_action(outcome_id, now.date(), self.config.timer.action_secs, now)
    }

    /// Mint today's micro-action and start its countdown in one move.
    pub fn start_micro_action(
        &mut self,
        outcome_id: &str,
        now: NaiveDateTime,
    ) -> Result<(MicroAction, Vec<Event>), StoreError> {
        let action = self.create_micro_action(outcome_id, now)?;
        let events = self.start_action_timer(&action, now);
        Ok((action, events))
    }

    /// Start the countdown for an already-minted action.
    pub fn start_action_timer(&mut self, action: &MicroAction, now: NaiveDateTime) -> Vec<Event> {
        self.scheduler
            .timer_mut()
            .start(
                TimerPurpose::MicroAction {
                    action_id: action.id.clone(),
                },
                action.duration_secs,
                now,
            )
            .into_iter()
            .collect()
    }

    pub fn complete_micro_action(
        &self,
        id: &str,
        now: NaiveDateTime,
    ) -> Result<MicroAction, StoreError> {
        self.db.complete_micro_action(id, now)
    }

    // ── Ritual commands ──────────────────────────────────────────────

    /// Toggle a habit for today and report its new state.
    pub fn toggle_habit(&mut self, key: HabitKey, now: NaiveDateTime) -> bool {
        let done = self.scheduler.state_mut().toggle_habit(now.date(), key);
        self.blob_saves.note_burst();
        done
    }

    pub fn set_stress(&mut self, value: u8, now: NaiveDateTime) -> Result<(), StoreError> {
        self.scheduler.state_mut().set_stress(now.date(), value)?;
        self.blob_saves.note_burst();
        Ok(())
    }

    pub fn cycle_mode(&mut self, now: NaiveDateTime) -> Event {
        let event = self.scheduler.cycle_mode(now);
        self.blob_saves.note_change(now);
        event
    }

    pub fn set_mode(&mut self, mode: Mode, now: NaiveDateTime) {
        self.scheduler.set_mode(mode);
        self.blob_saves.note_change(now);
    }

    pub fn set_wind_down_time(&mut self, time: NaiveTime, now: NaiveDateTime) {
        self.scheduler.state_mut().set_wind_down_time(time);
        self.blob_saves.note_change(now);
    }

    /// Log tonight's wind-down checklist.
    pub fn save_wind_down(
        &mut self,
        checklist: WindDownChecklist,
        note: Option<String>,
        now: NaiveDateTime,
    ) -> Vec<Event> {
        let events = self.scheduler.save_wind_down(checklist, note, now);
        self.blob_saves.note_change(now);
        events
    }

    /// Start the wind-down countdown.
    pub fn start_wind_down_timer(&mut self, now: NaiveDateTime) -> Option<Event> {
        self.scheduler.timer_mut().start(
            TimerPurpose::WindDown,
            self.config.timer.wind_down_secs,
            now,
        )
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Advance everything one tick.
    ///
    /// An elapsed micro-action countdown completes the action in the
    /// store; the chime rings the cue. Ritual-state writes land here
    /// when they are due.
    pub fn step(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let mut events = self.scheduler.tick(now);

        let mut follow_ups = Vec::new();
        for event in &events {
            match event {
                Event::TimerElapsed {
                    purpose: TimerPurpose::MicroAction { action_id },
                    ..
                } => match self.db.complete_micro_action(action_id, now) {
                    Ok(action) => follow_ups.push(Event::ActionCompleted {
                        action_id: action.id.clone(),
                        outcome_id: action.outcome_id.clone(),
                        at: now,
                    }),
                    Err(e) => {
                        tracing::warn!("elapsed action {action_id} not completed: {e}");
                    }
                },
                Event::ChimeFired { .. } => {
                    self.chime.ring();
                    self.blob_saves.note_burst();
                }
                _ => {}
            }
        }
        events.extend(follow_ups);

        self.flush_blob_if_due(now);
        events
    }

    /// Flush pending ritual state and consume the coordinator.
    pub fn shutdown(mut self) -> Result<(), StoreError> {
        if self.blob_saves.take_pending() {
            self.db.save_ritual_state(self.scheduler.state())?;
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_blob_if_due(&mut self, now: NaiveDateTime) {
        if !self.blob_saves.write_due(now) {
            return;
        }
        match self.db.save_ritual_state(self.scheduler.state()) {
            Ok(()) => self.blob_saves.mark_written(now),
            Err(e) => {
                tracing::warn!("ritual state save failed, keeping in-memory state: {e}");
                self.blob_saves.mark_failed(now);
            }
        }
    }
}
