use crate::error::CoreError;
use crate::models::{Event, ExceptionRecord};
use crate::repository::events::{rows_to_events, EventRow, EVENT_COLUMNS};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::ExceptionRepository for SqliteRepository {
    async fn load_exceptions(&self, event_id: Uuid) -> Result<Vec<ExceptionRecord>, CoreError> {
        let exceptions = sqlx::query_as(
            "SELECT * FROM occurrence_exceptions WHERE event_id = $1 ORDER BY occurrence_date",
        )
        .bind(event_id)
        .fetch_all(self.pool())
        .await?;
        Ok(exceptions)
    }

    async fn load_exception(&self, event_id: Uuid, occurrence_date: NaiveDate) -> Result<Option<ExceptionRecord>, CoreError> {
        let exception = sqlx::query_as(
            "SELECT * FROM occurrence_exceptions WHERE event_id = $1 AND occurrence_date = $2",
        )
        .bind(event_id)
        .bind(occurrence_date)
        .fetch_optional(self.pool())
        .await?;
        Ok(exception)
    }
}

impl SqliteRepository {
    pub(crate) async fn exceptions_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event_id: Uuid,
    ) -> Result<Vec<ExceptionRecord>, CoreError> {
        let exceptions = sqlx::query_as(
            "SELECT * FROM occurrence_exceptions WHERE event_id = $1 ORDER BY occurrence_date",
        )
        .bind(event_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(exceptions)
    }

    /// Exceptions whose original slot lies in `[start, end)`.
    pub(crate) async fn exceptions_between_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExceptionRecord>, CoreError> {
        let exceptions = sqlx::query_as(
            r#"SELECT * FROM occurrence_exceptions
            WHERE event_id = $1 AND occurrence_date >= $2 AND occurrence_date < $3
            ORDER BY occurrence_date"#,
        )
        .bind(event_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut **tx)
        .await?;
        Ok(exceptions)
    }

    /// Snapshot events referenced by the exceptions of `event_id` in
    /// `[start, end)`.
    pub(crate) async fn snapshots_between_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            r#"SELECT {} FROM events WHERE id IN (
                SELECT modified_event_id FROM occurrence_exceptions
                WHERE event_id = $1 AND occurrence_date >= $2 AND occurrence_date < $3
                AND modified_event_id IS NOT NULL
            )"#,
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut **tx)
        .await?;
        rows_to_events(rows)
    }

    pub(crate) async fn snapshots_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        event_id: Uuid,
    ) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {} FROM events WHERE detached_from = $1",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&mut **tx)
        .await?;
        rows_to_events(rows)
    }

    /// Fails with a unique violation if the slot already has an exception.
    pub(crate) async fn insert_exception_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        record: &ExceptionRecord,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO occurrence_exceptions (event_id, occurrence_date, kind, modified_event_id, created_at)
            VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(record.event_id)
        .bind(record.occurrence_date)
        .bind(record.kind)
        .bind(record.modified_event_id)
        .bind(record.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Compare-and-swap: only succeeds while the stored row still matches
    /// `previous`.
    pub(crate) async fn replace_exception_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        previous: &ExceptionRecord,
        next: &ExceptionRecord,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"UPDATE occurrence_exceptions
            SET kind = $1, modified_event_id = $2, created_at = $3
            WHERE event_id = $4 AND occurrence_date = $5 AND kind = $6 AND modified_event_id IS $7"#,
        )
        .bind(next.kind)
        .bind(next.modified_event_id)
        .bind(next.created_at)
        .bind(previous.event_id)
        .bind(previous.occurrence_date)
        .bind(previous.kind)
        .bind(previous.modified_event_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Compare-and-delete counterpart of [`Self::replace_exception_in_transaction`].
    pub(crate) async fn delete_exception_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        record: &ExceptionRecord,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"DELETE FROM occurrence_exceptions
            WHERE event_id = $1 AND occurrence_date = $2 AND kind = $3 AND modified_event_id IS $4"#,
        )
        .bind(record.event_id)
        .bind(record.occurrence_date)
        .bind(record.kind)
        .bind(record.modified_event_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Moves an exception and its snapshot to another series.
    pub(crate) async fn reassign_exception_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        record: &ExceptionRecord,
        to: Uuid,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"UPDATE occurrence_exceptions SET event_id = $1
            WHERE event_id = $2 AND occurrence_date = $3 AND kind = $4 AND modified_event_id IS $5"#,
        )
        .bind(to)
        .bind(record.event_id)
        .bind(record.occurrence_date)
        .bind(record.kind)
        .bind(record.modified_event_id)
        .execute(&mut **tx)
        .await?;
        if result.rows_affected() != 1 {
            return Ok(false);
        }

        if let Some(snapshot_id) = record.modified_event_id {
            sqlx::query("UPDATE events SET detached_from = $1 WHERE id = $2")
                .bind(to)
                .bind(snapshot_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(true)
    }
}
