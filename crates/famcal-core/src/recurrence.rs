//! Recurrence rules and the occurrence generator.
//!
//! Occurrence `n` of a rule is always computed from the series start
//! (`start + n * interval` periods), never by stepping from the previous
//! occurrence. Month and year steps clamp the day of month, so a series
//! anchored on the 31st lands on the last day of shorter months and returns
//! to the 31st afterwards.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{RangeError, RuleError};
use crate::models::{EndCondition, Frequency, RecurrenceSpec};

/// Absolute cap on instances generated for a single event per request.
pub const MAX_INSTANCES_PER_EVENT: usize = 1000;

/// Immutable description of how an event repeats. Always valid once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleParts", into = "RuleParts")]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    starts_at: NaiveDateTime,
    end: EndCondition,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RuleParts {
    frequency: Frequency,
    interval: i64,
    starts_at: NaiveDateTime,
    end: EndCondition,
}

impl TryFrom<RuleParts> for RecurrenceRule {
    type Error = RuleError;

    fn try_from(parts: RuleParts) -> Result<Self, Self::Error> {
        RecurrenceRule::new(parts.frequency, parts.interval, parts.starts_at, parts.end)
    }
}

impl From<RecurrenceRule> for RuleParts {
    fn from(rule: RecurrenceRule) -> Self {
        RuleParts {
            frequency: rule.frequency,
            interval: i64::from(rule.interval),
            starts_at: rule.starts_at,
            end: rule.end,
        }
    }
}

impl RecurrenceRule {
    /// Builds a rule anchored at `starts_at`.
    ///
    /// # Behavior
    /// - `Frequency::None` ignores `interval` and `end`: the rule produces
    ///   exactly one occurrence, the start itself
    /// - rejects intervals below 1, `AfterCount(0)` and end dates before the
    ///   start date
    pub fn new(
        frequency: Frequency,
        interval: i64,
        starts_at: NaiveDateTime,
        end: EndCondition,
    ) -> Result<Self, RuleError> {
        if frequency == Frequency::None {
            return Ok(Self::once(starts_at));
        }
        if interval < 1 {
            return Err(RuleError::NonPositiveInterval(interval));
        }
        let interval = u32::try_from(interval).map_err(|_| RuleError::IntervalTooLarge(interval))?;

        match end {
            EndCondition::AfterCount(0) => return Err(RuleError::ZeroCount),
            EndCondition::OnDate(until) if until < starts_at.date() => {
                return Err(RuleError::EndBeforeStart {
                    start: starts_at.date(),
                    end: until,
                })
            }
            _ => {}
        }

        Ok(Self {
            frequency,
            interval,
            starts_at,
            end,
        })
    }

    /// A rule that never repeats.
    pub fn once(starts_at: NaiveDateTime) -> Self {
        Self {
            frequency: Frequency::None,
            interval: 1,
            starts_at,
            end: EndCondition::Never,
        }
    }

    pub fn from_spec(spec: RecurrenceSpec, starts_at: NaiveDateTime) -> Result<Self, RuleError> {
        Self::new(spec.frequency, spec.interval, starts_at, spec.end)
    }

    /// Same rule re-anchored at a new start.
    pub fn with_start(&self, starts_at: NaiveDateTime) -> Result<Self, RuleError> {
        Self::new(self.frequency, i64::from(self.interval), starts_at, self.end)
    }

    /// Same rule with another end condition.
    pub fn with_end(&self, end: EndCondition) -> Result<Self, RuleError> {
        Self::new(self.frequency, i64::from(self.interval), self.starts_at, end)
    }

    #[inline]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[inline]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    #[inline]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.starts_at
    }

    #[inline]
    pub fn start_date(&self) -> NaiveDate {
        self.starts_at.date()
    }

    #[inline]
    pub fn end(&self) -> EndCondition {
        self.end
    }

    pub fn spec(&self) -> RecurrenceSpec {
        RecurrenceSpec::new(self.frequency, i64::from(self.interval), self.end)
    }

    /// Date of occurrence `n`, ignoring the end condition. `None` once the
    /// date leaves chrono's range or the rule has no such occurrence.
    fn nth(&self, n: u64) -> Option<NaiveDate> {
        let start = self.start_date();
        let steps = n.checked_mul(u64::from(self.interval))?;
        match self.frequency {
            Frequency::None => (n == 0).then_some(start),
            Frequency::Daily => start.checked_add_days(Days::new(steps)),
            Frequency::Weekly => start.checked_add_days(Days::new(steps.checked_mul(7)?)),
            Frequency::Monthly => start.checked_add_months(Months::new(u32::try_from(steps).ok()?)),
            Frequency::Yearly => {
                let months = u32::try_from(steps.checked_mul(12)?).ok()?;
                start.checked_add_months(Months::new(months))
            }
        }
    }

    #[inline]
    fn within_end(&self, n: u64, date: NaiveDate) -> bool {
        match self.end {
            EndCondition::Never => true,
            EndCondition::OnDate(until) => date <= until,
            EndCondition::AfterCount(count) => n < u64::from(count),
        }
    }

    /// Smallest index whose date is on or after `date` (end condition
    /// ignored). Skips history arithmetically, then walks the last step.
    fn first_index_on_or_after(&self, date: NaiveDate) -> u64 {
        let start = self.start_date();
        if date <= start {
            return 0;
        }

        let interval = i64::from(self.interval);
        let periods = match self.frequency {
            Frequency::None => return 1,
            Frequency::Daily => (date - start).num_days(),
            Frequency::Weekly => (date - start).num_days() / 7,
            Frequency::Monthly => {
                i64::from(date.year() - start.year()) * 12 + i64::from(date.month())
                    - i64::from(start.month())
            }
            Frequency::Yearly => i64::from(date.year() - start.year()),
        };

        let mut n = u64::try_from(periods / interval).unwrap_or(0).saturating_sub(1);
        while let Some(candidate) = self.nth(n) {
            if candidate >= date {
                break;
            }
            n += 1;
        }
        n
    }

    /// Zero-based position of `date` in the series, if the rule produces it.
    pub fn index_of(&self, date: NaiveDate) -> Option<u64> {
        let n = self.first_index_on_or_after(date);
        (self.nth(n) == Some(date) && self.within_end(n, date)).then_some(n)
    }

    /// Whether the rule (end condition included) produces `date`.
    #[inline]
    pub fn produces(&self, date: NaiveDate) -> bool {
        self.index_of(date).is_some()
    }

    /// Last produced occurrence strictly before `date`.
    pub fn previous_before(&self, date: NaiveDate) -> Option<NaiveDate> {
        let n = self.first_index_on_or_after(date).checked_sub(1)?;
        let n = match self.end {
            EndCondition::AfterCount(count) => n.min(u64::from(count).checked_sub(1)?),
            _ => n,
        };
        let candidate = self.nth(n)?;
        match self.end {
            EndCondition::OnDate(until) if candidate > until => self.previous_before(until.succ_opt()?),
            _ => Some(candidate),
        }
    }

    /// Head of a split: the same rule ending on the occurrence before `date`.
    /// `None` when nothing precedes `date`.
    pub fn truncated_before(&self, date: NaiveDate) -> Option<RecurrenceRule> {
        let previous = self.previous_before(date)?;
        Some(Self {
            end: EndCondition::OnDate(previous),
            ..*self
        })
    }

    /// End condition left for a continuation starting at `date`. A count
    /// shrinks by the occurrences already elapsed.
    pub fn remaining_end(&self, date: NaiveDate) -> Result<EndCondition, RuleError> {
        match self.end {
            EndCondition::AfterCount(count) => {
                let elapsed = self.first_index_on_or_after(date);
                let left = u64::from(count).saturating_sub(elapsed);
                match u32::try_from(left) {
                    Ok(0) | Err(_) => Err(RuleError::ZeroCount),
                    Ok(left) => Ok(EndCondition::AfterCount(left)),
                }
            }
            other => Ok(other),
        }
    }

    /// RFC 5545 `RRULE` value for display, `None` for single events.
    pub fn to_rrule(&self) -> Option<String> {
        let freq = match self.frequency {
            Frequency::None => return None,
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        };
        let mut rrule = format!("FREQ={};INTERVAL={}", freq, self.interval);
        match self.end {
            EndCondition::Never => {}
            EndCondition::OnDate(until) => rrule.push_str(&format!(";UNTIL={}", until.format("%Y%m%d"))),
            EndCondition::AfterCount(count) => rrule.push_str(&format!(";COUNT={}", count)),
        }
        Some(rrule)
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.frequency {
            Frequency::None => return write!(f, "once"),
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        };
        if self.interval == 1 {
            write!(f, "every {}", unit)?;
        } else {
            write!(f, "every {} {}s", self.interval, unit)?;
        }
        match self.end {
            EndCondition::Never => Ok(()),
            EndCondition::OnDate(until) => write!(f, " until {}", until),
            EndCondition::AfterCount(1) => write!(f, ", once"),
            EndCondition::AfterCount(count) => write!(f, ", {} times", count),
        }
    }
}

/// Base occurrence dates of `rule` in `[window_start, window_end)`, capped at
/// [`MAX_INSTANCES_PER_EVENT`].
pub fn generate(
    rule: &RecurrenceRule,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Result<Vec<NaiveDate>, RangeError> {
    generate_bounded(rule, window_start, window_end, MAX_INSTANCES_PER_EVENT)
}

/// Like [`generate`] with an explicit instance cap.
///
/// # Behavior
/// - dates before `window_start` are skipped without being produced, but
///   still count towards `AfterCount`
/// - output is chronological and duplicate-free
/// - fails with `TooManyInstances` instead of returning a truncated list
pub fn generate_bounded(
    rule: &RecurrenceRule,
    window_start: NaiveDate,
    window_end: NaiveDate,
    limit: usize,
) -> Result<Vec<NaiveDate>, RangeError> {
    if window_end < window_start {
        return Err(RangeError::InvalidWindow {
            start: window_start,
            end: window_end,
        });
    }

    let mut dates = Vec::new();
    let mut n = rule.first_index_on_or_after(window_start);
    while let Some(date) = rule.nth(n) {
        if date >= window_end || !rule.within_end(n, date) {
            break;
        }
        if dates.len() == limit {
            return Err(RangeError::TooManyInstances { limit });
        }
        dates.push(date);
        n += 1;
    }
    Ok(dates)
}
