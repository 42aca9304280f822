//! Planning of occurrence edits and deletes.
//!
//! The planner is pure: it turns the current state of a series plus a
//! requested change into an ordered list of [`Mutation`]s. The repository
//! applies a plan inside a single transaction, so a plan either lands
//! completely or not at all.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::cache::CacheScope;
use crate::error::{CoreError, EditError};
use crate::models::{Event, ExceptionKind, ExceptionRecord, OccurrenceScope, UpdateEventData};
use crate::recurrence::RecurrenceRule;

/// A series as loaded before an edit.
#[derive(Debug, Clone)]
pub struct SeriesState {
    pub event: Event,
    pub exceptions: Vec<ExceptionRecord>,
    /// Snapshot events referenced by modified exceptions
    pub snapshots: Vec<Event>,
}

impl SeriesState {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            exceptions: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn exception_at(&self, date: NaiveDate) -> Option<&ExceptionRecord> {
        self.exceptions.iter().find(|e| e.occurrence_date == date)
    }

    fn snapshot_of(&self, record: &ExceptionRecord) -> Result<Option<&Event>, EditError> {
        match record.modified_event_id {
            None => Ok(None),
            Some(id) => self.snapshots.iter().find(|s| s.id == id).map(Some).ok_or_else(|| {
                EditError::Storage(CoreError::CorruptRecord(format!(
                    "snapshot {} of event {} on {} is missing",
                    id, record.event_id, record.occurrence_date
                )))
            }),
        }
    }
}

/// One write of an edit plan, applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    InsertEvent(Event),
    UpdateEvent(Event),
    /// Removes a single event row (a snapshot or a lone event)
    DeleteEvent(Uuid),
    /// Removes an event with its exceptions, snapshots and completions
    DeleteSeries(Uuid),
    InsertException(ExceptionRecord),
    /// Compare-and-swap on the previously read record
    ReplaceException {
        previous: ExceptionRecord,
        next: ExceptionRecord,
    },
    /// Compare-and-delete on the previously read record
    DeleteException(ExceptionRecord),
    /// Moves an exception (and its snapshot) to another series, same date
    ReassignException { record: ExceptionRecord, to: Uuid },
    ReassignCompletions {
        from: Uuid,
        to: Uuid,
        on_or_after: NaiveDate,
    },
    DeleteCompletions { event_id: Uuid, on_or_after: NaiveDate },
}

/// Ordered writes plus what the caller gets back and what goes stale.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    pub mutations: Vec<Mutation>,
    /// Event returned to the caller (snapshot, rewritten base or new series)
    pub result: Option<Event>,
    pub invalidate: Vec<CacheScope>,
}

impl EditPlan {
    fn for_event(event: &Event) -> Self {
        Self {
            mutations: Vec::new(),
            result: None,
            invalidate: vec![CacheScope::Event(event.id), CacheScope::Family(event.family_id)],
        }
    }

    fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    /// Deletes an exception and then its snapshot, if any.
    fn drop_exception(&mut self, record: &ExceptionRecord) {
        self.push(Mutation::DeleteException(record.clone()));
        if let Some(snapshot_id) = record.modified_event_id {
            self.push(Mutation::DeleteEvent(snapshot_id));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

fn ensure_editable(event: &Event) -> Result<(), EditError> {
    if event.is_detached() {
        return Err(EditError::InvalidInput(format!(
            "event {} is an occurrence override; edit it through its series",
            event.id
        )));
    }
    Ok(())
}

/// Validates `date` against the series and returns its index.
fn occurrence_index(event: &Event, date: NaiveDate) -> Result<u64, EditError> {
    event.recurrence.index_of(date).ok_or(EditError::InvalidOccurrence {
        event_id: event.id,
        date,
    })
}

/// Re-expresses times given for the occurrence on `date` relative to the
/// series start, so moving one slot by an hour moves the series by an hour.
fn rebased(patch: &UpdateEventData, event: &Event, date: NaiveDate) -> UpdateEventData {
    let (slot_start, _) = event.span_on(date);
    let delta: Duration = event.starts_at() - slot_start;
    UpdateEventData {
        starts_at: patch.starts_at.map(|t| t + delta),
        ends_at: patch.ends_at.map(|t| t + delta),
        ..patch.clone()
    }
}

/// Plans `editOccurrence` for `date` of the series in `state`.
pub fn plan_edit(
    state: &SeriesState,
    date: NaiveDate,
    scope: OccurrenceScope,
    patch: &UpdateEventData,
    now: DateTime<Utc>,
) -> Result<EditPlan, EditError> {
    let event = &state.event;
    ensure_editable(event)?;

    if !event.is_recurring() {
        if date != event.start_date() {
            return Err(EditError::InvalidOccurrence {
                event_id: event.id,
                date,
            });
        }
        return plan_edit_all(state, date, patch, now);
    }

    let index = occurrence_index(event, date)?;
    match scope {
        OccurrenceScope::This => plan_edit_this(state, date, patch, now),
        OccurrenceScope::ThisAndFollowing if index == 0 => plan_edit_all(state, date, patch, now),
        OccurrenceScope::ThisAndFollowing => plan_edit_following(state, date, patch, now),
        OccurrenceScope::All => plan_edit_all(state, date, patch, now),
    }
}

fn plan_edit_this(
    state: &SeriesState,
    date: NaiveDate,
    patch: &UpdateEventData,
    now: DateTime<Utc>,
) -> Result<EditPlan, EditError> {
    if patch.recurrence.is_some() {
        return Err(EditError::InvalidInput(
            "a single occurrence cannot change the recurrence; edit the following occurrences or the whole series"
                .to_string(),
        ));
    }

    let event = &state.event;
    let existing = state.exception_at(date);
    let current_snapshot = match existing {
        Some(record) => state.snapshot_of(record)?,
        None => None,
    };

    let mut snapshot = match current_snapshot {
        Some(current) => Event {
            id: Uuid::now_v7(),
            created_at: now,
            ..current.clone()
        },
        None => event.detached_at(date, now),
    };
    patch.apply(&mut snapshot, now)?;

    let mut plan = EditPlan::for_event(event);
    let record = ExceptionRecord::modified(event.id, date, snapshot.id, now);
    plan.push(Mutation::InsertEvent(snapshot.clone()));
    match existing {
        Some(previous) => {
            plan.push(Mutation::ReplaceException {
                previous: previous.clone(),
                next: record,
            });
            if let Some(old_snapshot) = previous.modified_event_id {
                plan.push(Mutation::DeleteEvent(old_snapshot));
            }
        }
        None => plan.push(Mutation::InsertException(record)),
    }
    plan.result = Some(snapshot);
    Ok(plan)
}

fn plan_edit_following(
    state: &SeriesState,
    date: NaiveDate,
    patch: &UpdateEventData,
    now: DateTime<Utc>,
) -> Result<EditPlan, EditError> {
    let event = &state.event;
    let head_rule = event
        .recurrence
        .truncated_before(date)
        .ok_or(EditError::InvalidOccurrence { event_id: event.id, date })?;

    let (starts_at, ends_at) = event.span_on(date);
    let remaining = event.recurrence.remaining_end(date)?;
    let tail_rule = RecurrenceRule::new(
        event.recurrence.frequency(),
        i64::from(event.recurrence.interval()),
        starts_at,
        remaining,
    )?;

    let mut tail = Event {
        id: Uuid::now_v7(),
        ends_at,
        recurrence: tail_rule,
        detached_from: None,
        created_at: now,
        updated_at: now,
        ..event.clone()
    };
    patch.apply(&mut tail, now)?;

    let head = Event {
        recurrence: head_rule,
        updated_at: now,
        ..event.clone()
    };

    let mut plan = EditPlan::for_event(event);
    plan.invalidate.insert(1, CacheScope::Event(tail.id));
    plan.push(Mutation::InsertEvent(tail.clone()));
    plan.push(Mutation::UpdateEvent(head));

    let mut later: Vec<&ExceptionRecord> = state.exceptions.iter().filter(|e| e.occurrence_date >= date).collect();
    later.sort_by_key(|e| e.occurrence_date);
    for record in later {
        if record.occurrence_date == date || !tail.recurrence.produces(record.occurrence_date) {
            plan.drop_exception(record);
        } else {
            plan.push(Mutation::ReassignException {
                record: record.clone(),
                to: tail.id,
            });
        }
    }

    plan.push(Mutation::ReassignCompletions {
        from: event.id,
        to: tail.id,
        on_or_after: date,
    });
    plan.result = Some(tail);
    Ok(plan)
}

fn plan_edit_all(
    state: &SeriesState,
    date: NaiveDate,
    patch: &UpdateEventData,
    now: DateTime<Utc>,
) -> Result<EditPlan, EditError> {
    let event = &state.event;
    let mut updated = event.clone();
    rebased(patch, event, date).apply(&mut updated, now)?;

    let mut plan = EditPlan::for_event(event);
    plan.push(Mutation::UpdateEvent(updated.clone()));

    let mut stale: Vec<&ExceptionRecord> = state
        .exceptions
        .iter()
        .filter(|e| !updated.is_recurring() || !updated.recurrence.produces(e.occurrence_date))
        .collect();
    stale.sort_by_key(|e| e.occurrence_date);
    for record in stale {
        plan.drop_exception(record);
    }

    plan.result = Some(updated);
    Ok(plan)
}

/// Plans `deleteOccurrence` for `date` of the series in `state`.
pub fn plan_delete(
    state: &SeriesState,
    date: NaiveDate,
    scope: OccurrenceScope,
    now: DateTime<Utc>,
) -> Result<EditPlan, EditError> {
    let event = &state.event;
    ensure_editable(event)?;

    let mut plan = EditPlan::for_event(event);
    if !event.is_recurring() {
        if date != event.start_date() {
            return Err(EditError::InvalidOccurrence {
                event_id: event.id,
                date,
            });
        }
        plan.push(Mutation::DeleteSeries(event.id));
        return Ok(plan);
    }

    let index = occurrence_index(event, date)?;
    match scope {
        OccurrenceScope::This => {
            let cancelled = ExceptionRecord::cancelled(event.id, date, now);
            match state.exception_at(date) {
                Some(previous) if previous.kind == ExceptionKind::Cancelled => {}
                Some(previous) => {
                    plan.push(Mutation::ReplaceException {
                        previous: previous.clone(),
                        next: cancelled,
                    });
                    if let Some(snapshot_id) = previous.modified_event_id {
                        plan.push(Mutation::DeleteEvent(snapshot_id));
                    }
                }
                None => plan.push(Mutation::InsertException(cancelled)),
            }
        }
        OccurrenceScope::ThisAndFollowing if index > 0 => {
            let head_rule = event
                .recurrence
                .truncated_before(date)
                .ok_or(EditError::InvalidOccurrence { event_id: event.id, date })?;
            plan.push(Mutation::UpdateEvent(Event {
                recurrence: head_rule,
                updated_at: now,
                ..event.clone()
            }));

            let mut later: Vec<&ExceptionRecord> =
                state.exceptions.iter().filter(|e| e.occurrence_date >= date).collect();
            later.sort_by_key(|e| e.occurrence_date);
            for record in later {
                plan.drop_exception(record);
            }
            plan.push(Mutation::DeleteCompletions {
                event_id: event.id,
                on_or_after: date,
            });
        }
        OccurrenceScope::ThisAndFollowing | OccurrenceScope::All => {
            plan.push(Mutation::DeleteSeries(event.id));
        }
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EndCondition, Frequency, RecurrenceSpec};
    use chrono::{NaiveDateTime, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32) -> NaiveDateTime {
        d.and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    fn series(frequency: Frequency, end: EndCondition) -> Event {
        let starts_at = at(date(2024, 1, 1), 9);
        let now = Utc::now();
        Event {
            id: Uuid::now_v7(),
            family_id: Uuid::now_v7(),
            title: "Piano lesson".to_string(),
            description: None,
            location: None,
            ends_at: starts_at + Duration::hours(1),
            all_day: false,
            is_task: false,
            timezone: "UTC".to_string(),
            participants: vec![],
            created_by: Uuid::now_v7(),
            recurrence: RecurrenceRule::new(frequency, 1, starts_at, end).unwrap(),
            detached_from: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn retitle(title: &str) -> UpdateEventData {
        UpdateEventData {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    mod this_scope_tests {
        use super::*;

        #[test]
        fn test_first_edit_inserts_snapshot_then_exception() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let plan = plan_edit(&state, date(2024, 1, 8), OccurrenceScope::This, &retitle("Recital"), Utc::now())
                .unwrap();

            let snapshot = plan.result.clone().unwrap();
            assert_eq!(snapshot.title, "Recital");
            assert_eq!(snapshot.detached_from, Some(state.event.id));
            assert_eq!(snapshot.starts_at(), at(date(2024, 1, 8), 9));
            assert!(!snapshot.is_recurring());

            assert!(matches!(&plan.mutations[0], Mutation::InsertEvent(e) if e.id == snapshot.id));
            assert!(matches!(
                &plan.mutations[1],
                Mutation::InsertException(r) if r.modified_event_id == Some(snapshot.id)
            ));
            assert_eq!(plan.mutations.len(), 2);
        }

        #[test]
        fn test_second_edit_replaces_and_deletes_old_snapshot() {
            let event = series(Frequency::Weekly, EndCondition::Never);
            let mut old = event.detached_at(date(2024, 1, 8), Utc::now());
            old.location = Some("Hall".to_string());
            let record = ExceptionRecord::modified(event.id, date(2024, 1, 8), old.id, Utc::now());
            let state = SeriesState {
                event,
                exceptions: vec![record.clone()],
                snapshots: vec![old.clone()],
            };

            let plan = plan_edit(&state, date(2024, 1, 8), OccurrenceScope::This, &retitle("Recital"), Utc::now())
                .unwrap();
            let snapshot = plan.result.clone().unwrap();
            assert_ne!(snapshot.id, old.id);
            assert_eq!(snapshot.location.as_deref(), Some("Hall"));
            assert!(matches!(&plan.mutations[1], Mutation::ReplaceException { previous, .. } if *previous == record));
            assert_eq!(plan.mutations[2], Mutation::DeleteEvent(old.id));
        }

        #[test]
        fn test_rejects_date_not_in_series() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let result = plan_edit(&state, date(2024, 1, 9), OccurrenceScope::This, &retitle("x"), Utc::now());
            assert!(matches!(result, Err(EditError::InvalidOccurrence { .. })));
        }

        #[test]
        fn test_rejects_recurrence_change() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let patch = UpdateEventData {
                recurrence: Some(RecurrenceSpec::new(Frequency::Daily, 1, EndCondition::Never)),
                ..Default::default()
            };
            let result = plan_edit(&state, date(2024, 1, 8), OccurrenceScope::This, &patch, Utc::now());
            assert!(matches!(result, Err(EditError::InvalidInput(_))));
        }
    }

    mod following_scope_tests {
        use super::*;

        #[test]
        fn test_split_truncates_and_starts_new_series() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let plan = plan_edit(
                &state,
                date(2024, 2, 5),
                OccurrenceScope::ThisAndFollowing,
                &retitle("Piano (new teacher)"),
                Utc::now(),
            )
            .unwrap();

            let tail = plan.result.clone().unwrap();
            assert_eq!(tail.start_date(), date(2024, 2, 5));
            assert_eq!(tail.title, "Piano (new teacher)");
            assert_eq!(tail.recurrence.end(), EndCondition::Never);
            assert_ne!(tail.id, state.event.id);

            let head = plan
                .mutations
                .iter()
                .find_map(|m| match m {
                    Mutation::UpdateEvent(e) => Some(e.clone()),
                    _ => None,
                })
                .unwrap();
            assert_eq!(head.recurrence.end(), EndCondition::OnDate(date(2024, 1, 29)));
            assert_eq!(head.title, "Piano lesson");
            assert!(plan.invalidate.contains(&CacheScope::Event(tail.id)));
        }

        #[test]
        fn test_split_keeps_remaining_count() {
            let state = SeriesState::new(series(Frequency::Daily, EndCondition::AfterCount(10)));
            let plan = plan_edit(
                &state,
                date(2024, 1, 4),
                OccurrenceScope::ThisAndFollowing,
                &retitle("Later"),
                Utc::now(),
            )
            .unwrap();
            assert_eq!(plan.result.unwrap().recurrence.end(), EndCondition::AfterCount(7));
        }

        #[test]
        fn test_split_moves_later_exceptions_and_supersedes_current() {
            let event = series(Frequency::Weekly, EndCondition::Never);
            let at_split = ExceptionRecord::cancelled(event.id, date(2024, 2, 5), Utc::now());
            let later = ExceptionRecord::cancelled(event.id, date(2024, 2, 19), Utc::now());
            let earlier = ExceptionRecord::cancelled(event.id, date(2024, 1, 15), Utc::now());
            let state = SeriesState {
                event,
                exceptions: vec![later.clone(), at_split.clone(), earlier],
                snapshots: vec![],
            };

            let plan = plan_edit(
                &state,
                date(2024, 2, 5),
                OccurrenceScope::ThisAndFollowing,
                &retitle("New"),
                Utc::now(),
            )
            .unwrap();
            let tail_id = plan.result.as_ref().unwrap().id;

            assert!(plan.mutations.contains(&Mutation::DeleteException(at_split)));
            assert!(plan.mutations.contains(&Mutation::ReassignException { record: later, to: tail_id }));
            assert_eq!(
                plan.mutations.last(),
                Some(&Mutation::ReassignCompletions {
                    from: state.event.id,
                    to: tail_id,
                    on_or_after: date(2024, 2, 5),
                })
            );
            assert_eq!(
                plan.mutations.iter().filter(|m| matches!(m, Mutation::DeleteException(_))).count(),
                1
            );
        }

        #[test]
        fn test_split_at_first_occurrence_rewrites_series() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let plan = plan_edit(
                &state,
                date(2024, 1, 1),
                OccurrenceScope::ThisAndFollowing,
                &retitle("Renamed"),
                Utc::now(),
            )
            .unwrap();
            let result = plan.result.unwrap();
            assert_eq!(result.id, state.event.id);
            assert_eq!(plan.mutations.len(), 1);
        }
    }

    mod all_scope_tests {
        use super::*;

        #[test]
        fn test_moving_one_slot_moves_series() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let patch = UpdateEventData {
                starts_at: Some(at(date(2024, 1, 15), 10)),
                ..Default::default()
            };
            let plan = plan_edit(&state, date(2024, 1, 15), OccurrenceScope::All, &patch, Utc::now()).unwrap();
            let updated = plan.result.unwrap();
            assert_eq!(updated.starts_at(), at(date(2024, 1, 1), 10));
            assert_eq!(updated.duration(), Duration::hours(1));
        }

        #[test]
        fn test_drops_exceptions_the_new_rule_skips() {
            let event = series(Frequency::Daily, EndCondition::Never);
            let snapshot = event.detached_at(date(2024, 1, 2), Utc::now());
            let odd = ExceptionRecord::modified(event.id, date(2024, 1, 2), snapshot.id, Utc::now());
            let even = ExceptionRecord::cancelled(event.id, date(2024, 1, 3), Utc::now());
            let state = SeriesState {
                event,
                exceptions: vec![odd.clone(), even.clone()],
                snapshots: vec![snapshot.clone()],
            };
            let patch = UpdateEventData {
                recurrence: Some(RecurrenceSpec::new(Frequency::Daily, 2, EndCondition::Never)),
                ..Default::default()
            };

            let plan = plan_edit(&state, date(2024, 1, 1), OccurrenceScope::All, &patch, Utc::now()).unwrap();
            assert_eq!(
                &plan.mutations[1..],
                &[Mutation::DeleteException(odd), Mutation::DeleteEvent(snapshot.id)]
            );
            assert!(!plan.mutations.contains(&Mutation::DeleteException(even)));
        }

        #[test]
        fn test_ending_recurrence_drops_every_exception() {
            let event = series(Frequency::Weekly, EndCondition::Never);
            let first = ExceptionRecord::cancelled(event.id, date(2024, 1, 1), Utc::now());
            let later = ExceptionRecord::cancelled(event.id, date(2024, 1, 8), Utc::now());
            let state = SeriesState {
                event,
                exceptions: vec![later.clone(), first.clone()],
                snapshots: vec![],
            };
            let patch = UpdateEventData {
                recurrence: Some(RecurrenceSpec::once()),
                ..Default::default()
            };

            let plan = plan_edit(&state, date(2024, 1, 15), OccurrenceScope::All, &patch, Utc::now()).unwrap();
            assert!(!plan.result.as_ref().unwrap().is_recurring());
            assert_eq!(
                &plan.mutations[1..],
                &[Mutation::DeleteException(first), Mutation::DeleteException(later)]
            );
        }
    }

    mod delete_tests {
        use super::*;

        #[test]
        fn test_delete_this_cancels() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let plan = plan_delete(&state, date(2024, 1, 8), OccurrenceScope::This, Utc::now()).unwrap();
            assert!(matches!(
                &plan.mutations[..],
                [Mutation::InsertException(r)] if r.kind == ExceptionKind::Cancelled
            ));
        }

        #[test]
        fn test_delete_this_twice_is_a_noop() {
            let event = series(Frequency::Weekly, EndCondition::Never);
            let record = ExceptionRecord::cancelled(event.id, date(2024, 1, 8), Utc::now());
            let state = SeriesState {
                event,
                exceptions: vec![record],
                snapshots: vec![],
            };
            assert!(plan_delete(&state, date(2024, 1, 8), OccurrenceScope::This, Utc::now()).unwrap().is_empty());
        }

        #[test]
        fn test_delete_following_truncates() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let plan = plan_delete(&state, date(2024, 2, 5), OccurrenceScope::ThisAndFollowing, Utc::now()).unwrap();
            assert!(matches!(
                &plan.mutations[0],
                Mutation::UpdateEvent(e) if e.recurrence.end() == EndCondition::OnDate(date(2024, 1, 29))
            ));
            assert!(matches!(plan.mutations.last(), Some(Mutation::DeleteCompletions { .. })));
        }

        #[test]
        fn test_delete_following_from_start_removes_series() {
            let state = SeriesState::new(series(Frequency::Weekly, EndCondition::Never));
            let plan = plan_delete(&state, date(2024, 1, 1), OccurrenceScope::ThisAndFollowing, Utc::now()).unwrap();
            assert_eq!(plan.mutations, vec![Mutation::DeleteSeries(state.event.id)]);
        }

        #[test]
        fn test_delete_single_event_any_scope() {
            let mut event = series(Frequency::Weekly, EndCondition::Never);
            event.recurrence = RecurrenceRule::once(event.starts_at());
            let state = SeriesState::new(event);
            let plan = plan_delete(&state, date(2024, 1, 1), OccurrenceScope::This, Utc::now()).unwrap();
            assert_eq!(plan.mutations, vec![Mutation::DeleteSeries(state.event.id)]);
        }

        #[test]
        fn test_detached_snapshot_is_not_editable() {
            let event = series(Frequency::Weekly, EndCondition::Never);
            let snapshot = event.detached_at(date(2024, 1, 8), Utc::now());
            let result = plan_delete(&SeriesState::new(snapshot), date(2024, 1, 8), OccurrenceScope::This, Utc::now());
            assert!(matches!(result, Err(EditError::InvalidInput(_))));
        }
    }
}
