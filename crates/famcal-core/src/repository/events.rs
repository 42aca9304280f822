use crate::cache::CacheScope;
use crate::error::CoreError;
use crate::models::{EndCondition, Event, Frequency, Member, NewEventData};
use crate::recurrence::RecurrenceRule;
use crate::repository::SqliteRepository;
use crate::timezone::validate_timezone;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, Sqlite, Transaction};
use tracing::debug;
use uuid::Uuid;

/// Column list matching [`EventRow`].
pub(crate) const EVENT_COLUMNS: &str = "id, family_id, title, description, location, starts_at, ends_at, \
    all_day, is_task, timezone, participants, created_by, frequency, recurrence_interval, \
    recurrence_until, recurrence_count, detached_from, created_at, updated_at";

/// Flat storage shape of an [`Event`]; the rule is spread over four columns.
#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    id: Uuid,
    family_id: Uuid,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    all_day: bool,
    is_task: bool,
    timezone: String,
    participants: String,
    created_by: Uuid,
    frequency: Frequency,
    recurrence_interval: i64,
    recurrence_until: Option<NaiveDate>,
    recurrence_count: Option<i64>,
    detached_from: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = CoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let end = match (row.recurrence_until, row.recurrence_count) {
            (None, None) => EndCondition::Never,
            (Some(until), None) => EndCondition::OnDate(until),
            (None, Some(count)) => EndCondition::AfterCount(u32::try_from(count).map_err(|_| {
                CoreError::CorruptRecord(format!("event {} has occurrence count {}", row.id, count))
            })?),
            (Some(_), Some(_)) => {
                return Err(CoreError::CorruptRecord(format!(
                    "event {} has both an end date and an occurrence count",
                    row.id
                )))
            }
        };
        let recurrence = RecurrenceRule::new(row.frequency, row.recurrence_interval, row.starts_at, end)
            .map_err(|e| CoreError::CorruptRecord(format!("event {}: {}", row.id, e)))?;

        Ok(Event {
            id: row.id,
            family_id: row.family_id,
            title: row.title,
            description: row.description,
            location: row.location,
            ends_at: row.ends_at,
            all_day: row.all_day,
            is_task: row.is_task,
            timezone: row.timezone,
            participants: serde_json::from_str(&row.participants)?,
            created_by: row.created_by,
            recurrence,
            detached_from: row.detached_from,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn end_columns(end: EndCondition) -> (Option<NaiveDate>, Option<i64>) {
    match end {
        EndCondition::Never => (None, None),
        EndCondition::OnDate(until) => (Some(until), None),
        EndCondition::AfterCount(count) => (None, Some(i64::from(count))),
    }
}

pub(crate) fn rows_to_events(rows: Vec<EventRow>) -> Result<Vec<Event>, CoreError> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl super::EventRepository for SqliteRepository {
    async fn add_event(&self, data: NewEventData) -> Result<Event, CoreError> {
        if data.title.trim().is_empty() {
            return Err(CoreError::InvalidInput("Event title cannot be empty".to_string()));
        }
        let timezone = data.timezone.unwrap_or_else(|| "UTC".to_string());
        validate_timezone(&timezone)?;

        let recurrence = match data.recurrence {
            Some(spec) => RecurrenceRule::from_spec(spec, data.starts_at)?,
            None => RecurrenceRule::once(data.starts_at),
        };
        let default_length = if data.all_day { Duration::days(1) } else { Duration::hours(1) };
        let ends_at = data.ends_at.unwrap_or(data.starts_at + default_length);
        if ends_at < data.starts_at {
            return Err(CoreError::InvalidInput(format!(
                "Event ends at {} before it starts at {}",
                ends_at, data.starts_at
            )));
        }

        let mut tx = self.pool().begin().await?;

        let members: Vec<Member> = sqlx::query_as("SELECT * FROM family_members WHERE family_id = $1")
            .bind(data.family_id)
            .fetch_all(&mut *tx)
            .await?;
        if !members.iter().any(|m| m.id == data.created_by) {
            return Err(CoreError::InvalidInput(format!(
                "Member {} does not belong to family {}",
                data.created_by, data.family_id
            )));
        }
        if let Some(stranger) = data.participants.iter().find(|p| !members.iter().any(|m| m.id == **p)) {
            return Err(CoreError::InvalidInput(format!(
                "Participant {} does not belong to family {}",
                stranger, data.family_id
            )));
        }

        let now = Utc::now();
        let mut participants = data.participants;
        participants.sort();
        participants.dedup();
        let event = Event {
            id: Uuid::now_v7(),
            family_id: data.family_id,
            title: data.title.trim().to_string(),
            description: data.description,
            location: data.location,
            ends_at,
            all_day: data.all_day,
            is_task: data.is_task,
            timezone,
            participants,
            created_by: data.created_by,
            recurrence,
            detached_from: None,
            created_at: now,
            updated_at: now,
        };

        Self::insert_event_in_transaction(&mut tx, &event).await?;
        tx.commit().await?;

        debug!(event_id = %event.id, family_id = %event.family_id, "event created");
        self.notify(&[CacheScope::Family(event.family_id)]);
        Ok(event)
    }

    async fn load_event(&self, id: Uuid) -> Result<Option<Event>, CoreError> {
        let row: Option<EventRow> = sqlx::query_as(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(Event::try_from).transpose()
    }

    async fn find_events_for_family(&self, family_id: Uuid) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {} FROM events WHERE family_id = $1 AND detached_from IS NULL ORDER BY starts_at",
            EVENT_COLUMNS
        ))
        .bind(family_id)
        .fetch_all(self.pool())
        .await?;
        rows_to_events(rows)
    }
}

impl SqliteRepository {
    pub(crate) async fn load_event_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<Option<Event>, CoreError> {
        let row: Option<EventRow> = sqlx::query_as(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        row.map(Event::try_from).transpose()
    }

    /// Top-level events of a family that may have occurrences before `before`.
    pub(crate) async fn find_family_events_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        family_id: Uuid,
        before: NaiveDateTime,
    ) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            r#"SELECT {} FROM events
            WHERE family_id = $1 AND detached_from IS NULL AND starts_at < $2
            ORDER BY starts_at"#,
            EVENT_COLUMNS
        ))
        .bind(family_id)
        .bind(before)
        .fetch_all(&mut **tx)
        .await?;
        rows_to_events(rows)
    }

    pub(crate) async fn insert_event_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event: &Event,
    ) -> Result<(), CoreError> {
        let (until, count) = end_columns(event.recurrence.end());
        sqlx::query(&format!(
            r#"INSERT INTO events ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"#,
            EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(event.family_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at())
        .bind(event.ends_at)
        .bind(event.all_day)
        .bind(event.is_task)
        .bind(&event.timezone)
        .bind(serde_json::to_string(&event.participants)?)
        .bind(event.created_by)
        .bind(event.recurrence.frequency())
        .bind(i64::from(event.recurrence.interval()))
        .bind(until)
        .bind(count)
        .bind(event.detached_from)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Rewrites every mutable column. Returns whether the row existed.
    pub(crate) async fn update_event_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event: &Event,
    ) -> Result<bool, CoreError> {
        let (until, count) = end_columns(event.recurrence.end());
        let result = sqlx::query(
            r#"UPDATE events
            SET title = $1, description = $2, location = $3, starts_at = $4, ends_at = $5,
                all_day = $6, is_task = $7, timezone = $8, participants = $9,
                frequency = $10, recurrence_interval = $11, recurrence_until = $12,
                recurrence_count = $13, updated_at = $14
            WHERE id = $15"#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at())
        .bind(event.ends_at)
        .bind(event.all_day)
        .bind(event.is_task)
        .bind(&event.timezone)
        .bind(serde_json::to_string(&event.participants)?)
        .bind(event.recurrence.frequency())
        .bind(i64::from(event.recurrence.interval()))
        .bind(until)
        .bind(count)
        .bind(event.updated_at)
        .bind(event.id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub(crate) async fn delete_event_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes an event together with its completions, exceptions and
    /// occurrence snapshots.
    pub(crate) async fn delete_series_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<bool, CoreError> {
        sqlx::query("DELETE FROM occurrence_completions WHERE event_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM occurrence_exceptions WHERE event_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM events WHERE detached_from = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Self::delete_event_in_transaction(tx, id).await
    }
}
