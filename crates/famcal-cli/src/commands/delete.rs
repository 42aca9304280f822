use anyhow::{Context, Result};
use dialoguer::Confirm;
use famcal_core::models::OccurrenceScope;
use famcal_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::DeleteCommand;
use crate::parser::parse_date;
use crate::util::{local_now, resolve_event, resolve_family, resolve_member};

pub async fn delete_occurrence(repo: &impl Repository, family: Option<&str>, command: DeleteCommand) -> Result<()> {
    let family = resolve_family(repo, family).await?;
    let event = resolve_event(repo, family.id, &command.event).await?;
    let actor = resolve_member(repo, family.id, &command.by).await?;
    let now = local_now(&event.timezone)?;
    let date = parse_date(&command.date, now).context("Invalid occurrence date")?;

    let what = match command.scope {
        _ if !event.is_recurring() => format!("'{}'", event.title),
        OccurrenceScope::This => format!("the {} occurrence of '{}'", date, event.title),
        OccurrenceScope::ThisAndFollowing => format!("'{}' from {} on", event.title, date),
        OccurrenceScope::All => format!("every occurrence of '{}'", event.title),
    };

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete {}?", what))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_occurrence(actor.id, event.id, date, command.scope).await?;

    let success_style = Style::new().green().bold();
    println!("{} Deleted {}", "✓".style(success_style), what);
    Ok(())
}
