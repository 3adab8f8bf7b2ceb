//! # Momentum Core Library
//!
//! This library provides the core business logic for the Momentum weekly
//! planning engine. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any future
//! GUI being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Plan**: Weekly outcomes (at most three per week) with daily
//!   two-minute micro-actions and a per-week review
//! - **Ritual**: Daily habit checklist, stress rating and the evening
//!   wind-down window, persisted as one state blob
//! - **Timer**: A wall-clock-based countdown state machine that requires
//!   the caller to periodically invoke `tick()` for progress updates
//! - **Storage**: SQLite-based entity storage and TOML-based configuration
//! - **Autosave**: Debounced write coalescing so rapid edits land as one
//!   write
//!
//! ## Key Components
//!
//! - [`Coordinator`]: Wires the store, the scheduler and the autosave gate
//! - [`Database`]: Week, outcome, action and review persistence
//! - [`RitualScheduler`]: Chime, mode and panel state machine
//! - [`Config`]: Application configuration management

pub mod autosave;
pub mod calendar;
pub mod coordinator;
pub mod cue;
pub mod error;
pub mod events;
pub mod plan;
pub mod ritual;
pub mod stats;
pub mod store;
pub mod timer;

pub use autosave::{ReviewAutosave, SaveStatus, WriteCoalescer};
pub use coordinator::Coordinator;
pub use error::{CoreError, Result, StoreError};
pub use events::Event;
pub use plan::{MicroAction, Outcome, OutcomeStatus, Review, Week};
pub use ritual::{HabitKey, HabitLog, Mode, RitualState, WindDownChecklist, WindDownLog};
pub use store::{Config, Database};
pub use timer::{CountdownTimer, RitualScheduler, TimerPurpose, TimerState};
