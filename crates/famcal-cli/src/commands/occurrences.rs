use anyhow::{bail, Result};
use chrono::Duration;
use famcal_core::models::OccurrenceTarget;
use famcal_core::repository::Repository;

use crate::cli::OccurrencesCommand;
use crate::commands::member_names;
use crate::config::Config;
use crate::parser::parse_date;
use crate::util::{local_now, resolve_event, resolve_family};
use crate::views::table::display_occurrences;

pub async fn list_occurrences(
    repo: &impl Repository,
    config: &Config,
    family: Option<&str>,
    command: OccurrencesCommand,
) -> Result<()> {
    let family = resolve_family(repo, family).await?;
    let now = local_now(&config.default_timezone)?;

    let start = match &command.from {
        Some(from) => parse_date(from, now)?,
        None => now.date(),
    };
    let end = match (&command.to, command.days) {
        (Some(to), _) => parse_date(to, now)?,
        (None, days) => start + Duration::days(i64::from(days.unwrap_or(config.default_window_days))),
    };
    if end < start {
        bail!("The window ends ({}) before it starts ({})", end, start);
    }

    let target = match &command.event {
        Some(input) => OccurrenceTarget::Event(resolve_event(repo, family.id, input).await?.id),
        None => OccurrenceTarget::Family(family.id),
    };

    let occurrences = repo.get_occurrences(target, start, end).await?;
    let names = member_names(repo, family.id).await?;
    display_occurrences(&occurrences, &names);
    Ok(())
}
