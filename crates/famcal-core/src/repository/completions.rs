use crate::cache::CacheScope;
use crate::error::CompletionError;
use crate::models::{CompletionRecord, CompletionState, Event, ExceptionKind, ExceptionRecord};
use crate::repository::{CompletionRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

#[async_trait]
impl CompletionRepository for SqliteRepository {
    async fn toggle_completion(
        &self,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        participant_id: Uuid,
    ) -> Result<CompletionState, CompletionError> {
        match self.toggle_once(event_id, occurrence_date, participant_id).await {
            Err(err) if err.is_conflict() => {
                // The other writer's result stands.
                debug!(
                    event_id = %event_id,
                    occurrence_date = %occurrence_date,
                    participant_id = %participant_id,
                    "concurrent completion toggle, reporting current state"
                );
                self.completion_state(event_id, occurrence_date).await
            }
            other => other,
        }
    }

    async fn completion_state(&self, event_id: Uuid, occurrence_date: NaiveDate) -> Result<CompletionState, CompletionError> {
        let mut tx = self.pool().begin().await?;

        let event = Self::load_event_in_transaction(&mut tx, event_id)
            .await?
            .ok_or(CompletionError::NotFound(event_id))?;
        if !event.is_task {
            return Err(CompletionError::NotTaskEvent(event_id));
        }
        Self::ensure_visible_occurrence(&mut tx, &event, occurrence_date).await?;

        let records = Self::completions_in_transaction(&mut tx, event_id, occurrence_date).await?;
        tx.commit().await?;
        Ok(CompletionState::from_records(&records))
    }
}

impl SqliteRepository {
    async fn toggle_once(
        &self,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        participant_id: Uuid,
    ) -> Result<CompletionState, CompletionError> {
        let mut tx = self.pool().begin().await?;

        let event = Self::load_event_in_transaction(&mut tx, event_id)
            .await?
            .ok_or(CompletionError::NotFound(event_id))?;
        if !event.is_task {
            return Err(CompletionError::NotTaskEvent(event_id));
        }

        let member = Self::find_member_in_transaction(&mut tx, participant_id).await?;
        if !matches!(member, Some(ref m) if m.family_id == event.family_id) {
            return Err(CompletionError::PermissionDenied {
                participant: participant_id,
                event_id,
            });
        }

        Self::ensure_visible_occurrence(&mut tx, &event, occurrence_date).await?;

        let existing = Self::completions_in_transaction(&mut tx, event_id, occurrence_date).await?;
        if existing.is_empty() {
            // A concurrent toggle for the same participant already inserted the
            // row: the occurrence is complete either way.
            sqlx::query(
                r#"INSERT INTO occurrence_completions (event_id, occurrence_date, participant_id, completed_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (event_id, occurrence_date, participant_id) DO NOTHING"#,
            )
            .bind(event_id)
            .bind(occurrence_date)
            .bind(participant_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query("DELETE FROM occurrence_completions WHERE event_id = $1 AND occurrence_date = $2")
                .bind(event_id)
                .bind(occurrence_date)
                .execute(&mut *tx)
                .await?;
        }

        let records = Self::completions_in_transaction(&mut tx, event_id, occurrence_date).await?;
        tx.commit().await?;

        let state = CompletionState::from_records(&records);
        debug!(
            event_id = %event_id,
            occurrence_date = %occurrence_date,
            participant_id = %participant_id,
            complete = state.is_complete(),
            "completion toggled"
        );
        self.notify(&[CacheScope::Event(event_id), CacheScope::Family(event.family_id)]);
        Ok(state)
    }

    /// The event must be a series root, the date must be produced by its rule
    /// and not cancelled.
    async fn ensure_visible_occurrence(
        tx: &mut Transaction<'_, Sqlite>,
        event: &Event,
        occurrence_date: NaiveDate,
    ) -> Result<(), CompletionError> {
        let invalid = CompletionError::InvalidOccurrence {
            event_id: event.id,
            date: occurrence_date,
        };
        if event.is_detached() || !event.recurrence.produces(occurrence_date) {
            return Err(invalid);
        }

        let exception: Option<ExceptionRecord> = sqlx::query_as(
            "SELECT * FROM occurrence_exceptions WHERE event_id = $1 AND occurrence_date = $2",
        )
        .bind(event.id)
        .bind(occurrence_date)
        .fetch_optional(&mut **tx)
        .await?;
        match exception {
            Some(record) if record.kind == ExceptionKind::Cancelled => Err(invalid),
            _ => Ok(()),
        }
    }

    pub(crate) async fn completions_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event_id: Uuid,
        occurrence_date: NaiveDate,
    ) -> Result<Vec<CompletionRecord>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT * FROM occurrence_completions
            WHERE event_id = $1 AND occurrence_date = $2
            ORDER BY completed_at"#,
        )
        .bind(event_id)
        .bind(occurrence_date)
        .fetch_all(&mut **tx)
        .await
    }

    /// Dates in `[start, end)` with at least one completion row.
    pub(crate) async fn completed_dates_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<NaiveDate>, sqlx::Error> {
        let dates: Vec<(NaiveDate,)> = sqlx::query_as(
            r#"SELECT DISTINCT occurrence_date FROM occurrence_completions
            WHERE event_id = $1 AND occurrence_date >= $2 AND occurrence_date < $3"#,
        )
        .bind(event_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut **tx)
        .await?;
        Ok(dates.into_iter().map(|(d,)| d).collect())
    }
}
