use crate::error::{EditError, QueryError};
use crate::materialize::{materialize_bounded, ExceptionSet};
use crate::models::{Event, Family, Occurrence, OccurrenceScope, OccurrenceTarget, UpdateEventData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn get_occurrences(
        &self,
        target: OccurrenceTarget,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<Occurrence>, QueryError> {
        let mut tx = self.pool().begin().await?;

        let events: Vec<Event> = match target {
            OccurrenceTarget::Event(id) => {
                let event = Self::load_event_in_transaction(&mut tx, id)
                    .await?
                    .ok_or(QueryError::NotFound(id))?;
                vec![event]
            }
            OccurrenceTarget::Family(id) => {
                let family: Option<Family> = sqlx::query_as("SELECT * FROM families WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
                if family.is_none() {
                    return Err(QueryError::NotFound(id));
                }
                let before = window_end.and_time(NaiveTime::MIN);
                Self::find_family_events_in_transaction(&mut tx, id, before).await?
            }
        };

        // Every event is checked before any is expanded.
        for event in &events {
            self.limits().validate(&event.recurrence, window_start, window_end)?;
        }

        let mut occurrences = Vec::new();
        for event in &events {
            let records = Self::exceptions_between_in_transaction(&mut tx, event.id, window_start, window_end).await?;
            let exceptions = if records.is_empty() {
                ExceptionSet::new()
            } else {
                let snapshots =
                    Self::snapshots_between_in_transaction(&mut tx, event.id, window_start, window_end).await?;
                ExceptionSet::from_records(&records, snapshots)?
            };

            let mut expanded =
                materialize_bounded(event, window_start, window_end, &exceptions, self.limits().max_instances)?;

            if event.is_task && !expanded.is_empty() {
                let completed =
                    Self::completed_dates_in_transaction(&mut tx, event.id, window_start, window_end).await?;
                for occurrence in expanded.iter_mut() {
                    occurrence.completed = completed.contains(&occurrence.occurrence_date);
                }
            }
            occurrences.append(&mut expanded);
        }

        tx.commit().await?;

        occurrences.sort_by(|a, b| {
            a.starts_at
                .cmp(&b.starts_at)
                .then_with(|| a.event.title.cmp(&b.event.title))
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
        Ok(occurrences)
    }

    async fn edit_occurrence(
        &self,
        actor: Uuid,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        scope: OccurrenceScope,
        patch: UpdateEventData,
    ) -> Result<Event, EditError> {
        let plan = self
            .apply_scoped_change(actor, event_id, occurrence_date, scope, |state, now| {
                crate::scope::plan_edit(state, occurrence_date, scope, &patch, now)
            })
            .await?;
        plan.result.ok_or(EditError::NotFound(event_id))
    }

    async fn delete_occurrence(
        &self,
        actor: Uuid,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        scope: OccurrenceScope,
    ) -> Result<(), EditError> {
        self.apply_scoped_change(actor, event_id, occurrence_date, scope, |state, now| {
            crate::scope::plan_delete(state, occurrence_date, scope, now)
        })
        .await?;
        Ok(())
    }
}
