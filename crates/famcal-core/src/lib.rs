//! # Famcal Core Library
//!
//! Occurrence engine for shared family calendars: recurring events are
//! expanded into dated occurrences on demand, single occurrences can be
//! edited or cancelled without touching the series rule, and task-like
//! events carry a completion flag shared by every participant.
//!
//! ## Features
//!
//! - **Arithmetic Recurrence**: daily, weekly, monthly and yearly rules with
//!   intervals, end dates and occurrence counts; month ends clamp
//! - **Bounded Expansion**: per-frequency window limits and a hard cap on
//!   instances per event
//! - **Per-Occurrence Exceptions**: cancel or modify one slot; the override
//!   stays keyed by the original date
//! - **Scoped Edits**: this occurrence, this and following (series split),
//!   or the whole series, each applied atomically
//! - **Shared Completion**: one participant marking a task occurrence
//!   completes it for everybody
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`recurrence`]: Recurrence rules and the occurrence generator
//! - [`range`]: Window limits checked before expansion
//! - [`materialize`]: Overlay of exceptions on generated dates
//! - [`scope`]: Planning of scoped edits and deletes
//! - [`access`]: Role-based edit permissions
//! - [`cache`]: Cache invalidation contract
//! - [`repository`]: Data access layer with Repository pattern
//! - [`timezone`]: Timezone utilities and validation
//! - [`error`]: Error types for each operation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use famcal_core::{
//!     db,
//!     models::{EndCondition, FamilyRole, Frequency, NewEventData, OccurrenceTarget, RecurrenceSpec},
//!     range::RangeLimits,
//!     repository::{EventRepository, FamilyRepository, OccurrenceRepository, SqliteRepository},
//! };
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("famcal.db").await?;
//!     let repo = SqliteRepository::new(pool, RangeLimits::default());
//!
//!     let family = repo.add_family("Garcia".to_string()).await?;
//!     let parent = repo.add_member(family.id, "Ana".to_string(), FamilyRole::Parent).await?;
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     repo.add_event(NewEventData {
//!         family_id: family.id,
//!         created_by: parent.id,
//!         title: "Swim practice".to_string(),
//!         starts_at: start.and_hms_opt(17, 0, 0).unwrap(),
//!         recurrence: Some(RecurrenceSpec::new(Frequency::Weekly, 1, EndCondition::Never)),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
//!     for occurrence in repo.get_occurrences(OccurrenceTarget::Family(family.id), start, end).await? {
//!         println!("{} {}", occurrence.starts_at, occurrence.event.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod cache;
pub mod db;
pub mod error;
pub mod materialize;
pub mod models;
pub mod range;
pub mod recurrence;
pub mod repository;
pub mod scope;
pub mod timezone;
