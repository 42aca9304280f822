use crate::access::{may_edit, Relation};
use crate::error::EditError;
use crate::models::OccurrenceScope;
use crate::repository::SqliteRepository;
use crate::scope::{EditPlan, Mutation, SeriesState};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};
use tracing::debug;
use uuid::Uuid;

impl SqliteRepository {
    /// Loads the series, checks the actor's rights, plans the change and
    /// applies it in one transaction. The cache is notified after commit.
    pub(crate) async fn apply_scoped_change<F>(
        &self,
        actor: Uuid,
        event_id: Uuid,
        occurrence_date: NaiveDate,
        scope: OccurrenceScope,
        planner: F,
    ) -> Result<EditPlan, EditError>
    where
        F: FnOnce(&SeriesState, DateTime<Utc>) -> Result<EditPlan, EditError> + Send,
    {
        let mut tx = self.pool().begin().await?;

        let event = Self::load_event_in_transaction(&mut tx, event_id)
            .await?
            .ok_or(EditError::NotFound(event_id))?;

        let denied = EditError::PermissionDenied {
            actor,
            event_id,
            scope,
        };
        let member = match Self::find_member_in_transaction(&mut tx, actor).await? {
            Some(member) if member.family_id == event.family_id => member,
            _ => return Err(denied),
        };
        if !may_edit(member.role, Relation::of(actor, &event), scope) {
            return Err(denied);
        }

        let state = SeriesState {
            exceptions: Self::exceptions_in_transaction(&mut tx, event_id).await?,
            snapshots: Self::snapshots_in_transaction(&mut tx, event_id).await?,
            event,
        };
        let plan = planner(&state, Utc::now())?;

        for mutation in &plan.mutations {
            Self::apply_mutation_in_transaction(&mut tx, mutation).await?;
        }
        tx.commit().await?;

        debug!(
            event_id = %event_id,
            occurrence_date = %occurrence_date,
            scope = %scope,
            mutations = plan.mutations.len(),
            result_id = ?plan.result.as_ref().map(|e| e.id),
            "occurrence change committed"
        );
        self.notify(&plan.invalidate);
        Ok(plan)
    }

    async fn apply_mutation_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        mutation: &Mutation,
    ) -> Result<(), EditError> {
        let applied = match mutation {
            Mutation::InsertEvent(event) => {
                Self::insert_event_in_transaction(tx, event).await?;
                true
            }
            Mutation::UpdateEvent(event) => {
                if !Self::update_event_in_transaction(tx, event).await? {
                    return Err(EditError::NotFound(event.id));
                }
                true
            }
            Mutation::DeleteEvent(id) => Self::delete_event_in_transaction(tx, *id).await?,
            Mutation::DeleteSeries(id) => {
                if !Self::delete_series_in_transaction(tx, *id).await? {
                    return Err(EditError::NotFound(*id));
                }
                true
            }
            Mutation::InsertException(record) => {
                Self::insert_exception_in_transaction(tx, record).await?;
                true
            }
            Mutation::ReplaceException { previous, next } => {
                Self::replace_exception_in_transaction(tx, previous, next).await?
            }
            Mutation::DeleteException(record) => Self::delete_exception_in_transaction(tx, record).await?,
            Mutation::ReassignException { record, to } => {
                Self::reassign_exception_in_transaction(tx, record, *to).await?
            }
            Mutation::ReassignCompletions { from, to, on_or_after } => {
                sqlx::query(
                    "UPDATE occurrence_completions SET event_id = $1 WHERE event_id = $2 AND occurrence_date >= $3",
                )
                .bind(to)
                .bind(from)
                .bind(on_or_after)
                .execute(&mut **tx)
                .await?;
                true
            }
            Mutation::DeleteCompletions { event_id, on_or_after } => {
                sqlx::query("DELETE FROM occurrence_completions WHERE event_id = $1 AND occurrence_date >= $2")
                    .bind(event_id)
                    .bind(on_or_after)
                    .execute(&mut **tx)
                    .await?;
                true
            }
        };

        // A row read at the start of the edit changed underneath us.
        if applied {
            Ok(())
        } else {
            Err(EditError::Conflict)
        }
    }
}
