//! Core error types for momentum-core.
//!
//! This module defines the error hierarchy using thiserror so callers
//! can match on failures instead of parsing strings.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for momentum-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Entity store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Entity-store errors.
///
/// Every variant that rejects a write names the rule it enforces so the
/// CLI can surface it verbatim.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A field failed validation before reaching the database
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// The per-week outcome cap would be exceeded
    #[error("Week {week_id} already has {limit} outcomes")]
    CapacityExceeded { week_id: String, limit: usize },

    /// A micro-action for this day is still open
    #[error("An open micro-action already exists for {date}; complete it first")]
    OpenActionExists { date: NaiveDate },

    /// Referenced entity does not exist
    #[error("No {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Row payload could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Shorthand for `InvalidInput` with owned strings.
    pub fn invalid(field: &str, message: &str) -> Self {
        StoreError::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
