use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RangeError;
use crate::models::Frequency;
use crate::recurrence::{RecurrenceRule, MAX_INSTANCES_PER_EVENT};

/// Safety bounds applied before any recurring event is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeLimits {
    pub daily_max_days: i64,
    pub weekly_max_days: i64,
    pub monthly_max_days: i64,
    pub yearly_max_days: i64,
    /// Circuit breaker on generated instances per event
    pub max_instances: usize,
}

impl Default for RangeLimits {
    fn default() -> Self {
        Self {
            daily_max_days: 365,
            weekly_max_days: 730,
            monthly_max_days: 1095,
            yearly_max_days: 3650,
            max_instances: MAX_INSTANCES_PER_EVENT,
        }
    }
}

impl RangeLimits {
    /// Widest window accepted for a frequency, `None` when unbounded.
    pub fn max_span_days(&self, frequency: Frequency) -> Option<i64> {
        match frequency {
            Frequency::None => None,
            Frequency::Daily => Some(self.daily_max_days),
            Frequency::Weekly => Some(self.weekly_max_days),
            Frequency::Monthly => Some(self.monthly_max_days),
            Frequency::Yearly => Some(self.yearly_max_days),
        }
    }

    /// Rejects windows that are inverted or too wide for the rule's frequency.
    pub fn validate(
        &self,
        rule: &RecurrenceRule,
        requested_start: NaiveDate,
        requested_end: NaiveDate,
    ) -> Result<(), RangeError> {
        if requested_end < requested_start {
            return Err(RangeError::InvalidWindow {
                start: requested_start,
                end: requested_end,
            });
        }

        let requested_days = (requested_end - requested_start).num_days();
        match self.max_span_days(rule.frequency()) {
            Some(max_days) if requested_days > max_days => Err(RangeError::TooLarge {
                frequency: rule.frequency(),
                requested_days,
                max_days,
            }),
            _ => Ok(()),
        }
    }
}

/// [`RangeLimits::validate`] with the default bounds.
pub fn validate(
    rule: &RecurrenceRule,
    requested_start: NaiveDate,
    requested_end: NaiveDate,
) -> Result<(), RangeError> {
    RangeLimits::default().validate(rule, requested_start, requested_end)
}
