use clap::Parser;
use famcal_core::db;
use famcal_core::error::{CompletionError, CoreError, EditError, QueryError, RangeError};
use famcal_core::repository::SqliteRepository;
use owo_colors::{OwoColorize, Style};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use util::LookupError;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            handle_error(anyhow::Error::new(e).context("Invalid configuration"));
            std::process::exit(2);
        }
    };
    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            handle_error(e.into());
            std::process::exit(1);
        }
    };
    debug!(database = %config.database_path, timezone = %config.default_timezone, "configuration loaded");
    let repository = SqliteRepository::new(db_pool, config.limits);

    let family = cli.family.as_deref().or(config.default_family.as_deref());
    let result = match cli.command {
        cli::Commands::Family(command) => commands::family::family_command(&repository, command).await,
        cli::Commands::Member(command) => commands::member::member_command(&repository, family, command).await,
        cli::Commands::Event(command) => {
            commands::event::event_command(&repository, &config, family, command).await
        }
        cli::Commands::Occurrences(command) => {
            commands::occurrences::list_occurrences(&repository, &config, family, command).await
        }
        cli::Commands::Edit(command) => commands::edit::edit_occurrence(&repository, &config, family, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_occurrence(&repository, family, command).await,
        cli::Commands::Done(command) => commands::done::toggle_done(&repository, family, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("FAMCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();
    let label = "Error:".style(error_style);

    if let Some(edit_error) = err.chain().find_map(|e| e.downcast_ref::<EditError>()) {
        match edit_error {
            EditError::InvalidOccurrence { date, .. } => {
                eprintln!("{} The event has no occurrence on {}", label, date.yellow());
            }
            EditError::Conflict => {
                eprintln!(
                    "{} Someone else changed this occurrence at the same time; reload and try again",
                    label
                );
            }
            EditError::PermissionDenied { scope, .. } => {
                eprintln!(
                    "{} You may not change {} occurrences of this event",
                    label,
                    scope.yellow()
                );
            }
            _ => eprintln!("{} {}", label, edit_error),
        }
    } else if let Some(completion_error) = err.chain().find_map(|e| e.downcast_ref::<CompletionError>()) {
        match completion_error {
            CompletionError::NotTaskEvent(_) => {
                eprintln!("{} Only chores can be marked done", label);
            }
            CompletionError::InvalidOccurrence { date, .. } => {
                eprintln!("{} The chore has no occurrence on {}", label, date.yellow());
            }
            _ => eprintln!("{} {}", label, completion_error),
        }
    } else if let Some(query_error) = err.chain().find_map(|e| e.downcast_ref::<QueryError>()) {
        match query_error {
            QueryError::Range(RangeError::TooLarge { frequency, requested_days, max_days }) => {
                eprintln!(
                    "{} A {} event can be listed for at most {} days at a time ({} requested)",
                    label,
                    frequency,
                    max_days.yellow(),
                    requested_days
                );
            }
            _ => eprintln!("{} {}", label, query_error),
        }
    } else if let Some(lookup_error) = err.chain().find_map(|e| e.downcast_ref::<LookupError>()) {
        match lookup_error {
            LookupError::Ambiguous { kind, input, candidates } => {
                eprintln!("{} Ambiguous {} '{}'.", label, kind, input);
                eprintln!("Did you mean one of these?");
                for (id, name) in candidates {
                    eprintln!("  {} ({})", id.yellow(), name);
                }
            }
            _ => eprintln!("{} {}", label, lookup_error),
        }
    } else if let Some(CoreError::InvalidInput(s)) = err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        eprintln!("{} Invalid input: {}", label, s);
    } else {
        eprintln!("{} {:#}", label, err);
    }
}
