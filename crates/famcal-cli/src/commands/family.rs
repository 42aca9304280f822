use anyhow::Result;
use famcal_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::{FamilyCommand, FamilySubcommand};
use crate::views::table::display_families;

pub async fn family_command(repo: &impl Repository, command: FamilyCommand) -> Result<()> {
    match command.command {
        FamilySubcommand::Add(add) => {
            let family = repo.add_family(add.name).await?;
            let success_style = Style::new().green().bold();
            println!("{} Created family: {}", "✓".style(success_style), family.name.bright_white().bold());
            println!("  {} Family ID: {}", "→".blue(), family.id.to_string().yellow());
        }
        FamilySubcommand::List => {
            let families = repo.find_families().await?;
            display_families(&families);
        }
    }
    Ok(())
}
