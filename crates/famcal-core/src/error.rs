use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Frequency, OccurrenceScope};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Rejected while building a [`crate::recurrence::RecurrenceRule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("interval must be a positive integer, got {0}")]
    NonPositiveInterval(i64),

    #[error("interval {0} is too large")]
    IntervalTooLarge(i64),

    #[error("occurrence count must be at least 1")]
    ZeroCount,

    #[error("end date {end} is before the series start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// The requested window cannot be expanded safely. Callers must narrow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("window of {requested_days} days exceeds the {max_days}-day limit for {frequency} events")]
    TooLarge {
        frequency: Frequency,
        requested_days: i64,
        max_days: i64,
    },

    #[error("expansion exceeded {limit} instances")]
    TooManyInstances { limit: usize },

    #[error("window end {end} is before window start {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Storage(#[from] CoreError),
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(CoreError::Database(err))
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{date} is not an occurrence of event {event_id}")]
    InvalidOccurrence { event_id: Uuid, date: NaiveDate },

    #[error("The occurrence was changed concurrently; retry the edit")]
    Conflict,

    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Member {actor} may not change event {event_id} with scope '{scope}'")]
    PermissionDenied {
        actor: Uuid,
        event_id: Uuid,
        scope: OccurrenceScope,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(CoreError),
}

impl From<sqlx::Error> for EditError {
    fn from(err: sqlx::Error) -> Self {
        if is_conflict(&err) {
            Self::Conflict
        } else {
            Self::Storage(CoreError::Database(err))
        }
    }
}

impl From<CoreError> for EditError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => Self::from(e),
            CoreError::InvalidRule(e) => Self::InvalidInput(e.to_string()),
            CoreError::InvalidTimezone(tz) => Self::InvalidInput(format!("invalid timezone '{}'", tz)),
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::Storage(other),
        }
    }
}

impl From<RuleError> for EditError {
    fn from(err: RuleError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("{date} is not an occurrence of event {event_id}")]
    InvalidOccurrence { event_id: Uuid, date: NaiveDate },

    #[error("Event {0} is not a task")]
    NotTaskEvent(Uuid),

    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Member {participant} does not belong to the family of event {event_id}")]
    PermissionDenied { participant: Uuid, event_id: Uuid },

    #[error(transparent)]
    Storage(#[from] CoreError),
}

impl From<sqlx::Error> for CompletionError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(CoreError::Database(err))
    }
}

impl CompletionError {
    /// Another toggle for the same occurrence committed first.
    pub(crate) fn is_conflict(&self) -> bool {
        matches!(self, Self::Storage(CoreError::Database(err)) if is_conflict(err))
    }
}

/// Unique violations and SQLite busy/locked results mean another writer won
/// the race for the same rows.
pub(crate) fn is_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || matches!(db_err.code().as_deref(), Some("5" | "6" | "517"))
        }
        _ => false,
    }
}
