use anyhow::{Context, Result};
use famcal_core::models::CompletionState;
use famcal_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::DoneCommand;
use crate::parser::parse_date;
use crate::util::{local_now, resolve_event, resolve_family, resolve_member};

pub async fn toggle_done(repo: &impl Repository, family: Option<&str>, command: DoneCommand) -> Result<()> {
    let family = resolve_family(repo, family).await?;
    let event = resolve_event(repo, family.id, &command.event).await?;
    let participant = resolve_member(repo, family.id, &command.by).await?;
    let now = local_now(&event.timezone)?;
    let date = parse_date(&command.date, now).context("Invalid occurrence date")?;

    match repo.toggle_completion(event.id, date, participant.id).await? {
        CompletionState::Complete { .. } => {
            let success_style = Style::new().green().bold();
            println!(
                "{} Completed {} for {}",
                "✓".style(success_style),
                event.title.bright_white().bold(),
                date
            );
        }
        CompletionState::Incomplete => {
            println!("{} Reopened {} for {}", "↺".yellow(), event.title.bright_white().bold(), date);
        }
    }
    Ok(())
}
