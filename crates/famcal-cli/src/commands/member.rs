use anyhow::Result;
use famcal_core::repository::Repository;
use owo_colors::{OwoColorize, Style};

use crate::cli::{MemberCommand, MemberSubcommand};
use crate::util::resolve_family;
use crate::views::table::display_members;

pub async fn member_command(repo: &impl Repository, family: Option<&str>, command: MemberCommand) -> Result<()> {
    let family = resolve_family(repo, family).await?;
    match command.command {
        MemberSubcommand::Add(add) => {
            let member = repo.add_member(family.id, add.name, add.role).await?;
            let success_style = Style::new().green().bold();
            println!(
                "{} Added {} to {} as {}",
                "✓".style(success_style),
                member.display_name.bright_white().bold(),
                family.name,
                member.role
            );
        }
        MemberSubcommand::List => {
            let members = repo.find_members(family.id).await?;
            display_members(&members);
        }
    }
    Ok(())
}
