use crate::cache::{CacheInvalidationNotifier, CacheScope, NoopNotifier};
use crate::db::DbPool;
use crate::error::{CompletionError, CoreError, EditError, QueryError};
use crate::models::{
    CompletionState, Event, ExceptionRecord, Family, FamilyRole, Member, NewEventData, Occurrence,
    OccurrenceScope, OccurrenceTarget, UpdateEventData,
};
use crate::range::RangeLimits;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

pub mod completions;
pub mod events;
pub mod exceptions;
pub mod families;
pub mod occurrences;
pub mod scope;

/// Domain-specific trait for the family directory
#[async_trait]
pub trait FamilyRepository {
    async fn add_family(&self, name: String) -> Result<Family, CoreError>;
    async fn find_family_by_id(&self, id: Uuid) -> Result<Option<Family>, CoreError>;
    async fn find_families(&self) -> Result<Vec<Family>, CoreError>;
    async fn add_member(&self, family_id: Uuid, display_name: String, role: FamilyRole) -> Result<Member, CoreError>;
    async fn find_member_by_id(&self, id: Uuid) -> Result<Option<Member>, CoreError>;
    async fn find_member_by_name(&self, family_id: Uuid, display_name: &str) -> Result<Option<Member>, CoreError>;
    async fn find_members(&self, family_id: Uuid) -> Result<Vec<Member>, CoreError>;
}

/// Domain-specific trait for event definitions
#[async_trait]
pub trait EventRepository {
    async fn add_event(&self, data: NewEventData) -> Result<Event, CoreError>;
    async fn load_event(&self, id: Uuid) -> Result<Option<Event>, CoreError>;
    /// Top-level events of a family; occurrence snapshots are excluded
    async fn find_events_for_family(&self, family_id: Uuid) -> Result<Vec<Event>, CoreError>;
}

/// Domain-specific trait for per-occurrence overrides
#[async_trait]
pub trait ExceptionRepository {
    async fn load_exceptions(&self, event_id: Uuid) -> Result<Vec<ExceptionRecord>, CoreError>;
    async fn load_exception(&self, event_id: Uuid, occurrence_date: NaiveDate) -> Result<Option<ExceptionRecord>, CoreError>;
}

/// Domain-specific trait for shared occurrence completion
#[async_trait]
pub trait CompletionRepository {
    async fn toggle_completion(
        &self,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        participant_id: Uuid,
    ) -> Result<CompletionState, CompletionError>;
    async fn completion_state(&self, event_id: Uuid, occurrence_date: NaiveDate) -> Result<CompletionState, CompletionError>;
}

/// Domain-specific trait for occurrence queries and scoped edits
#[async_trait]
pub trait OccurrenceRepository {
    async fn get_occurrences(
        &self,
        target: OccurrenceTarget,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<Occurrence>, QueryError>;
    async fn edit_occurrence(
        &self,
        actor: Uuid,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        scope: OccurrenceScope,
        patch: UpdateEventData,
    ) -> Result<Event, EditError>;
    async fn delete_occurrence(
        &self,
        actor: Uuid,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        scope: OccurrenceScope,
    ) -> Result<(), EditError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    FamilyRepository +
    EventRepository +
    ExceptionRepository +
    CompletionRepository +
    OccurrenceRepository
{
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
    limits: RangeLimits,
    notifier: Arc<dyn CacheInvalidationNotifier>,
}

impl SqliteRepository {
    pub fn new(pool: DbPool, limits: RangeLimits) -> Self {
        Self {
            pool,
            limits,
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Replaces the cache notifier invoked after each committed mutation.
    pub fn with_notifier(mut self, notifier: Arc<dyn CacheInvalidationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn limits(&self) -> &RangeLimits {
        &self.limits
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Must only be called once the writes have committed.
    pub(crate) fn notify(&self, scopes: &[CacheScope]) {
        for scope in scopes {
            self.notifier.invalidate(*scope);
        }
    }
}

impl Repository for SqliteRepository {}
