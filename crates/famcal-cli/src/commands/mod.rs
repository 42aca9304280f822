use anyhow::Result;
use chrono::NaiveDateTime;
use famcal_core::models::{EndCondition, RecurrenceSpec};
use famcal_core::repository::Repository;
use uuid::Uuid;

use crate::cli::RecurrenceArgs;
use crate::parser::parse_date;
use crate::views::table::MemberNames;

pub mod delete;
pub mod done;
pub mod edit;
pub mod event;
pub mod family;
pub mod member;
pub mod occurrences;

/// Builds a recurrence from `--every`/`--interval`/`--until`/`--count`.
/// `None` when no frequency was given.
pub fn recurrence_from_args(args: &RecurrenceArgs, now: NaiveDateTime) -> Result<Option<RecurrenceSpec>> {
    let Some(frequency) = args.every else {
        return Ok(None);
    };
    let end = match (&args.until, args.count) {
        (Some(until), _) => EndCondition::OnDate(parse_date(until, now)?),
        (None, Some(count)) => EndCondition::AfterCount(count),
        (None, None) => EndCondition::Never,
    };
    Ok(Some(RecurrenceSpec::new(frequency, args.interval.unwrap_or(1), end)))
}

pub async fn member_names(repo: &impl Repository, family_id: Uuid) -> Result<MemberNames> {
    Ok(repo
        .find_members(family_id)
        .await?
        .into_iter()
        .map(|m| (m.id, m.display_name))
        .collect())
}
