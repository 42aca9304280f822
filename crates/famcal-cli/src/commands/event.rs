use anyhow::{Context, Result};
use chrono::Duration;
use famcal_core::models::NewEventData;
use famcal_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::{AddEventCommand, EventCommand, EventSubcommand};
use crate::commands::{member_names, recurrence_from_args};
use crate::config::Config;
use crate::parser::parse_datetime;
use crate::util::{local_now, resolve_event, resolve_family, resolve_member, resolve_members, short_id};
use crate::views::table::{display_event_details, display_events};

pub async fn event_command(
    repo: &impl Repository,
    config: &Config,
    family: Option<&str>,
    command: EventCommand,
) -> Result<()> {
    let family = resolve_family(repo, family).await?;
    match command.command {
        EventSubcommand::Add(add) => add_event(repo, config, family.id, add).await,
        EventSubcommand::Show(show) => {
            let event = resolve_event(repo, family.id, &show.id).await?;
            let exceptions = repo.load_exceptions(event.id).await?;
            let names = member_names(repo, family.id).await?;
            display_event_details(&event, &exceptions, &names);
            Ok(())
        }
        EventSubcommand::List => {
            let events = repo.find_events_for_family(family.id).await?;
            let names = member_names(repo, family.id).await?;
            display_events(&events, &names);
            Ok(())
        }
    }
}

async fn add_event(
    repo: &impl Repository,
    config: &Config,
    family_id: uuid::Uuid,
    command: AddEventCommand,
) -> Result<()> {
    let timezone = command.timezone.unwrap_or_else(|| config.default_timezone.clone());
    let now = local_now(&timezone)?;

    let starts_at = parse_datetime(&command.start, now).context("Invalid --start")?;
    let ends_at = match (&command.end, command.duration) {
        (Some(end), _) => Some(parse_datetime(end, now).context("Invalid --end")?),
        (None, Some(minutes)) => Some(starts_at + Duration::minutes(minutes)),
        (None, None) => None,
    };
    let recurrence = recurrence_from_args(&command.recurrence, now)?;

    let creator = resolve_member(repo, family_id, &command.by).await?;
    let mut participants = resolve_members(repo, family_id, &command.participants).await?;
    if participants.is_empty() {
        participants.push(creator.id);
    }

    let is_recurring = recurrence.is_some();
    let event = repo
        .add_event(NewEventData {
            family_id,
            created_by: creator.id,
            title: command.title,
            description: command.description,
            location: command.location,
            starts_at,
            ends_at,
            all_day: command.all_day,
            is_task: command.task,
            timezone: Some(timezone),
            participants,
            recurrence,
        })
        .await?;

    let success_style = Style::new().green().bold();
    let kind = if event.is_task { "chore" } else { "event" };
    if is_recurring {
        println!(
            "{} Created recurring {}: {}",
            "✓".style(success_style),
            kind,
            event.title.bright_white().bold()
        );
        println!("  {} Repeats {}", "→".blue(), event.recurrence);
    } else {
        println!("{} Created {}: {}", "✓".style(success_style), kind, event.title.bright_white().bold());
    }
    println!("  {} Event ID: {}", "→".blue(), short_id(event.id).yellow());
    println!("  {} Starts {}", "→".blue(), event.starts_at().format("%a %Y-%m-%d %H:%M"));
    Ok(())
}
