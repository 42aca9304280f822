//! Overlay of exception records on generated occurrence dates.

use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{CoreError, RangeError};
use crate::models::{Event, ExceptionKind, ExceptionRecord, Occurrence};
use crate::recurrence::{generate_bounded, MAX_INSTANCES_PER_EVENT};

/// Resolved override of one occurrence slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    Cancelled,
    Modified(Event),
}

/// Overrides of one series keyed by original occurrence date.
#[derive(Debug, Clone, Default)]
pub struct ExceptionSet {
    overrides: HashMap<NaiveDate, Override>,
}

impl ExceptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins exception rows with their snapshot events. A modified row whose
    /// snapshot is missing is a corrupt record.
    pub fn from_records(records: &[ExceptionRecord], snapshots: Vec<Event>) -> Result<Self, CoreError> {
        let mut snapshots: HashMap<Uuid, Event> = snapshots.into_iter().map(|e| (e.id, e)).collect();
        let mut overrides = HashMap::with_capacity(records.len());

        for record in records {
            let resolved = match (record.kind, record.modified_event_id) {
                (ExceptionKind::Cancelled, _) => Override::Cancelled,
                (ExceptionKind::Modified, Some(snapshot_id)) => {
                    let snapshot = snapshots.remove(&snapshot_id).ok_or_else(|| {
                        CoreError::CorruptRecord(format!(
                            "snapshot {} of event {} on {} is missing",
                            snapshot_id, record.event_id, record.occurrence_date
                        ))
                    })?;
                    Override::Modified(snapshot)
                }
                (ExceptionKind::Modified, None) => {
                    return Err(CoreError::CorruptRecord(format!(
                        "modified exception of event {} on {} has no snapshot",
                        record.event_id, record.occurrence_date
                    )))
                }
            };
            overrides.insert(record.occurrence_date, resolved);
        }

        Ok(Self { overrides })
    }

    pub fn insert(&mut self, date: NaiveDate, value: Override) {
        self.overrides.insert(date, value);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&Override> {
        self.overrides.get(date)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Visible occurrences of `event` in `[window_start, window_end)`.
///
/// # Behavior
/// - slots without an override carry the base fields shifted to the slot
/// - cancelled slots are dropped
/// - modified slots carry the snapshot, and are dropped when the snapshot
///   itself was moved outside the window
pub fn materialize(
    event: &Event,
    window_start: NaiveDate,
    window_end: NaiveDate,
    exceptions: &ExceptionSet,
) -> Result<Vec<Occurrence>, RangeError> {
    materialize_bounded(event, window_start, window_end, exceptions, MAX_INSTANCES_PER_EVENT)
}

pub fn materialize_bounded(
    event: &Event,
    window_start: NaiveDate,
    window_end: NaiveDate,
    exceptions: &ExceptionSet,
    limit: usize,
) -> Result<Vec<Occurrence>, RangeError> {
    let dates = generate_bounded(&event.recurrence, window_start, window_end, limit)?;
    let mut occurrences = Vec::with_capacity(dates.len());

    for date in dates {
        match exceptions.get(&date) {
            None => {
                let (starts_at, ends_at) = event.span_on(date);
                occurrences.push(Occurrence {
                    event_id: event.id,
                    occurrence_date: date,
                    starts_at,
                    ends_at,
                    event: event.clone(),
                    modified: false,
                    completed: false,
                });
            }
            Some(Override::Cancelled) => continue,
            Some(Override::Modified(snapshot)) => {
                let moved_to = snapshot.start_date();
                if moved_to < window_start || moved_to >= window_end {
                    continue;
                }
                occurrences.push(Occurrence {
                    event_id: event.id,
                    occurrence_date: date,
                    starts_at: snapshot.starts_at(),
                    ends_at: snapshot.ends_at,
                    event: snapshot.clone(),
                    modified: true,
                    completed: false,
                });
            }
        }
    }

    Ok(occurrences)
}
