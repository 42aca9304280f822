use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::recurrence::RecurrenceRule;

// ============================================================================
// Family directory
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Role of a member inside one family. Closed set: every permission check
/// matches on it exhaustively.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum FamilyRole {
    Admin,
    Parent,
    Child,
}

impl std::fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FamilyRole::Admin => write!(f, "admin"),
            FamilyRole::Parent => write!(f, "parent"),
            FamilyRole::Child => write!(f, "child"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid family role: {0}")]
pub struct ParseFamilyRoleError(String);

impl FromStr for FamilyRole {
    type Err = ParseFamilyRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(FamilyRole::Admin),
            "parent" => Ok(FamilyRole::Parent),
            "child" => Ok(FamilyRole::Child),
            _ => Err(ParseFamilyRoleError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub family_id: Uuid,
    pub display_name: String,
    pub role: FamilyRole,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Recurrence description
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::None => write!(f, "none"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "once" => Ok(Frequency::None),
            "daily" | "day" => Ok(Frequency::Daily),
            "weekly" | "week" => Ok(Frequency::Weekly),
            "monthly" | "month" => Ok(Frequency::Monthly),
            "yearly" | "year" | "annually" => Ok(Frequency::Yearly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// When a series stops producing occurrences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EndCondition {
    Never,
    /// Last allowed occurrence date (inclusive).
    OnDate(NaiveDate),
    /// Total number of occurrences, counted from the series start.
    AfterCount(u32),
}

/// Recurrence as supplied by a caller, before it is anchored to a start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceSpec {
    pub frequency: Frequency,
    pub interval: i64,
    pub end: EndCondition,
}

impl RecurrenceSpec {
    pub fn new(frequency: Frequency, interval: i64, end: EndCondition) -> Self {
        Self { frequency, interval, end }
    }

    /// A recurrence that never repeats.
    pub fn once() -> Self {
        Self::new(Frequency::None, 1, EndCondition::Never)
    }
}

// ============================================================================
// Events
// ============================================================================

/// A calendar event. Recurring events own their [`RecurrenceRule`]; modified
/// occurrence snapshots carry `detached_from` and never recur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub family_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub ends_at: NaiveDateTime,
    pub all_day: bool,
    pub is_task: bool,
    /// IANA timezone name the local times are expressed in
    pub timezone: String,
    pub participants: Vec<Uuid>,
    pub created_by: Uuid,
    pub recurrence: RecurrenceRule,
    /// Series this snapshot overrides an occurrence of
    pub detached_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    #[inline]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.recurrence.starts_at()
    }

    #[inline]
    pub fn start_date(&self) -> NaiveDate {
        self.recurrence.start_date()
    }

    #[inline]
    pub fn is_recurring(&self) -> bool {
        self.recurrence.frequency() != Frequency::None
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        self.detached_from.is_some()
    }

    pub fn duration(&self) -> Duration {
        self.ends_at - self.starts_at()
    }

    pub fn has_participant(&self, member_id: Uuid) -> bool {
        self.participants.contains(&member_id)
    }

    /// Start and end of the slot on `date`, keeping time of day and duration.
    pub fn span_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let starts_at = date.and_time(self.starts_at().time());
        (starts_at, starts_at + self.duration())
    }

    /// A non-recurring copy of this event placed on `date`, ready to become
    /// the modified snapshot of that occurrence.
    pub fn detached_at(&self, date: NaiveDate, now: DateTime<Utc>) -> Event {
        let (starts_at, ends_at) = self.span_on(date);
        Event {
            id: Uuid::now_v7(),
            ends_at,
            recurrence: RecurrenceRule::once(starts_at),
            detached_from: Some(self.detached_from.unwrap_or(self.id)),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Data required to create an event.
#[derive(Debug, Clone)]
pub struct NewEventData {
    pub family_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: NaiveDateTime,
    /// Defaults to one hour after the start, or one day for all-day events
    pub ends_at: Option<NaiveDateTime>,
    pub all_day: bool,
    pub is_task: bool,
    pub timezone: Option<String>,
    pub participants: Vec<Uuid>,
    pub recurrence: Option<RecurrenceSpec>,
}

impl Default for NewEventData {
    fn default() -> Self {
        Self {
            family_id: Uuid::nil(),
            created_by: Uuid::nil(),
            title: String::new(),
            description: None,
            location: None,
            starts_at: Utc::now().date_naive().and_time(NaiveTime::MIN),
            ends_at: None,
            all_day: false,
            is_task: false,
            timezone: None,
            participants: Vec::new(),
            recurrence: None,
        }
    }
}

/// Field changes applied by an occurrence edit. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct UpdateEventData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub all_day: Option<bool>,
    pub is_task: Option<bool>,
    pub timezone: Option<String>,
    pub participants: Option<Vec<Uuid>>,
    /// Replaces the recurrence rule; anchored at the (possibly new) start
    pub recurrence: Option<RecurrenceSpec>,
}

impl UpdateEventData {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.all_day.is_none()
            && self.is_task.is_none()
            && self.timezone.is_none()
            && self.participants.is_none()
            && self.recurrence.is_none()
    }

    /// Applies the changes to `event`. Moving the start keeps the duration
    /// unless a new end is given as well.
    pub fn apply(&self, event: &mut Event, now: DateTime<Utc>) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput("title cannot be empty".to_string()));
            }
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(is_task) = self.is_task {
            event.is_task = is_task;
        }
        if let Some(timezone) = &self.timezone {
            crate::timezone::validate_timezone(timezone)?;
            event.timezone = timezone.clone();
        }
        if let Some(participants) = &self.participants {
            event.participants = participants.clone();
        }

        let duration = event.duration();
        let starts_at = self.starts_at.unwrap_or_else(|| event.starts_at());
        event.recurrence = match self.recurrence {
            Some(spec) => RecurrenceRule::from_spec(spec, starts_at)?,
            None => event.recurrence.with_start(starts_at)?,
        };
        event.ends_at = self.ends_at.unwrap_or(starts_at + duration);
        if event.ends_at < starts_at {
            return Err(CoreError::InvalidInput(format!(
                "event ends at {} before it starts at {}",
                event.ends_at, starts_at
            )));
        }

        event.updated_at = now;
        Ok(())
    }
}

// ============================================================================
// Exceptions and completions
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum ExceptionKind {
    /// Occurrence hidden entirely (no snapshot)
    Cancelled,
    /// Occurrence replaced by a detached snapshot event
    Modified,
}

impl std::fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExceptionKind::Cancelled => write!(f, "cancelled"),
            ExceptionKind::Modified => write!(f, "modified"),
        }
    }
}

/// Override for one occurrence of a series, keyed by the original slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ExceptionRecord {
    pub event_id: Uuid,
    /// Originally scheduled occurrence date
    pub occurrence_date: NaiveDate,
    pub kind: ExceptionKind,
    /// Snapshot event, present iff `kind` is `Modified`
    pub modified_event_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ExceptionRecord {
    pub fn cancelled(event_id: Uuid, occurrence_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            event_id,
            occurrence_date,
            kind: ExceptionKind::Cancelled,
            modified_event_id: None,
            created_at: now,
        }
    }

    pub fn modified(
        event_id: Uuid,
        occurrence_date: NaiveDate,
        snapshot_id: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            occurrence_date,
            kind: ExceptionKind::Modified,
            modified_event_id: Some(snapshot_id),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CompletionRecord {
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub occurrence_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

/// Shared completion of one occurrence: complete for everybody as soon as
/// any participant marked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CompletionState {
    Incomplete,
    Complete {
        completed_by: Vec<Uuid>,
        completed_at: DateTime<Utc>,
    },
}

impl CompletionState {
    pub fn from_records(records: &[CompletionRecord]) -> Self {
        match records.iter().map(|r| r.completed_at).min() {
            Some(completed_at) => CompletionState::Complete {
                completed_by: records.iter().map(|r| r.participant_id).collect(),
                completed_at,
            },
            None => CompletionState::Incomplete,
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, CompletionState::Complete { .. })
    }
}

// ============================================================================
// Occurrences and scopes
// ============================================================================

/// Breadth of an occurrence edit or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccurrenceScope {
    /// Only the selected occurrence
    This,
    /// The selected occurrence and every later one
    ThisAndFollowing,
    /// The whole series
    All,
}

impl std::fmt::Display for OccurrenceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OccurrenceScope::This => write!(f, "this"),
            OccurrenceScope::ThisAndFollowing => write!(f, "following"),
            OccurrenceScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for OccurrenceScope {
    type Err = ParseOccurrenceScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "this" | "occurrence" => Ok(OccurrenceScope::This),
            "following" | "this_and_following" | "future" => Ok(OccurrenceScope::ThisAndFollowing),
            "all" | "series" | "entire" => Ok(OccurrenceScope::All),
            _ => Err(ParseOccurrenceScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid occurrence scope: {0}")]
pub struct ParseOccurrenceScopeError(String);

/// What an occurrence query expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceTarget {
    Event(Uuid),
    Family(Uuid),
}

/// One visible instance of an event. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Series (or single event) the slot belongs to
    pub event_id: Uuid,
    /// Original slot date; the key exceptions and completions use
    pub occurrence_date: NaiveDate,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    /// Effective fields: the base event or the modified snapshot
    pub event: Event,
    pub modified: bool,
    pub completed: bool,
}
