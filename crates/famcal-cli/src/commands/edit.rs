use anyhow::{bail, Context, Result};
use famcal_core::models::{OccurrenceScope, UpdateEventData};
use famcal_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::EditCommand;
use crate::commands::recurrence_from_args;
use crate::config::Config;
use crate::parser::{parse_date, parse_datetime};
use crate::util::{local_now, resolve_event, resolve_family, resolve_member, resolve_members, short_id};

fn clearable(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

pub async fn edit_occurrence(
    repo: &impl Repository,
    config: &Config,
    family: Option<&str>,
    command: EditCommand,
) -> Result<()> {
    let family = resolve_family(repo, family).await?;
    let event = resolve_event(repo, family.id, &command.event).await?;
    let actor = resolve_member(repo, family.id, &command.by).await?;
    let now = local_now(&event.timezone)?;
    let date = parse_date(&command.date, now).context("Invalid occurrence date")?;

    let participants = match &command.participants {
        Some(inputs) => Some(resolve_members(repo, family.id, inputs).await?),
        None => None,
    };
    let patch = UpdateEventData {
        title: command.title,
        description: clearable(command.description, command.description_clear),
        location: clearable(command.location, command.location_clear),
        starts_at: command.start.as_deref().map(|s| parse_datetime(s, now)).transpose()?,
        ends_at: command.end.as_deref().map(|s| parse_datetime(s, now)).transpose()?,
        timezone: command.timezone,
        participants,
        recurrence: recurrence_from_args(&command.recurrence, now)?,
        ..Default::default()
    };
    if patch.is_empty() {
        bail!("Nothing to change; pass at least one field such as --title or --start");
    }

    let updated = repo
        .edit_occurrence(actor.id, event.id, date, command.scope, patch)
        .await?;

    let success_style = Style::new().green().bold();
    match command.scope {
        _ if !event.is_recurring() => {
            println!("{} Updated {}", "✓".style(success_style), updated.title.bright_white().bold());
        }
        OccurrenceScope::This => {
            println!(
                "{} Changed the {} occurrence of {}",
                "✓".style(success_style),
                date,
                updated.title.bright_white().bold()
            );
        }
        OccurrenceScope::ThisAndFollowing if updated.id != event.id => {
            println!(
                "{} Split {} at {}",
                "✓".style(success_style),
                event.title.bright_white().bold(),
                date
            );
            println!("  {} Following occurrences now belong to {}", "→".blue(), short_id(updated.id).yellow());
        }
        OccurrenceScope::ThisAndFollowing | OccurrenceScope::All => {
            println!("{} Updated every occurrence of {}", "✓".style(success_style), updated.title.bright_white().bold());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clearable() {
        assert_eq!(clearable(None, false), None);
        assert_eq!(clearable(None, true), Some(None));
        assert_eq!(clearable(Some("Gym".to_string()), false), Some(Some("Gym".to_string())));
    }
}
