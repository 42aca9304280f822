use chrono::Utc;
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use famcal_core::models::{Event, ExceptionKind, ExceptionRecord, Family, FamilyRole, Member, Occurrence};
use famcal_core::timezone::abbreviation_at;
use owo_colors::OwoColorize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::util::short_id;

/// Display names keyed by member ID.
pub type MemberNames = HashMap<Uuid, String>;

fn names_of(ids: &[Uuid], names: &MemberNames) -> String {
    if ids.is_empty() {
        return "None".to_string();
    }
    ids.iter()
        .map(|id| names.get(id).cloned().unwrap_or_else(|| short_id(*id)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn display_families(families: &[Family]) {
    if families.is_empty() {
        println!("No families found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Created"]);
    for family in families {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(family.id)));
        row.add_cell(Cell::new(&family.name));
        row.add_cell(Cell::new(family.created_at.humanize()));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_members(members: &[Member]) {
    if members.is_empty() {
        println!("No members found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Role"]);
    for member in members {
        let role_cell = match member.role {
            FamilyRole::Admin => Cell::new(member.role).fg(Color::Magenta),
            FamilyRole::Parent => Cell::new(member.role).fg(Color::Blue),
            FamilyRole::Child => Cell::new(member.role).fg(Color::Green),
        };
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(member.id)));
        row.add_cell(Cell::new(&member.display_name));
        row.add_cell(role_cell);
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_events(events: &[Event], names: &MemberNames) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Starts", "Repeats", "Participants"]);
    for event in events {
        let mut title = String::new();
        if event.is_recurring() {
            title.push_str("↻ ");
        }
        title.push_str(&event.title);
        if event.is_task {
            title.push_str(" (Chore)");
        }

        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(event.id)));
        row.add_cell(Cell::new(title));
        row.add_cell(Cell::new(event.starts_at().format("%Y-%m-%d %H:%M")));
        row.add_cell(Cell::new(event.recurrence.to_string()));
        row.add_cell(Cell::new(names_of(&event.participants, names)));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_occurrences(occurrences: &[Occurrence], names: &MemberNames) {
    if occurrences.is_empty() {
        println!("No occurrences found.");
        return;
    }

    let today = Utc::now().date_naive();
    let mut table = Table::new();
    table.set_header(vec!["Event", "Date", "Time", "Title", "Who", "Where", "Status"]);

    for occurrence in occurrences {
        let event = &occurrence.event;
        let time = if event.all_day {
            "all day".to_string()
        } else {
            let zone = abbreviation_at(occurrence.starts_at, &event.timezone).unwrap_or_default();
            format!(
                "{}-{} {}",
                occurrence.starts_at.format("%H:%M"),
                occurrence.ends_at.format("%H:%M"),
                zone
            )
            .trim_end()
            .to_string()
        };

        let mut title_cell = Cell::new(&event.title);
        if occurrence.completed {
            title_cell = title_cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
        } else if occurrence.modified {
            title_cell = title_cell.fg(Color::Yellow);
        }

        let mut date_cell = Cell::new(occurrence.starts_at.format("%a %Y-%m-%d"));
        if occurrence.starts_at.date() == today {
            date_cell = date_cell.fg(Color::Cyan).add_attribute(Attribute::Bold);
        }

        let status = match (event.is_task, occurrence.completed, occurrence.modified) {
            (true, true, _) => Cell::new("Done").fg(Color::Green),
            (true, false, true) => Cell::new("To do (changed)").fg(Color::Yellow),
            (true, false, false) => Cell::new("To do"),
            (false, _, true) => Cell::new("Changed").fg(Color::Yellow),
            (false, _, false) => Cell::new(""),
        };

        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(occurrence.event_id)));
        row.add_cell(date_cell);
        row.add_cell(Cell::new(time));
        row.add_cell(title_cell);
        row.add_cell(Cell::new(names_of(&event.participants, names)));
        row.add_cell(Cell::new(event.location.as_deref().unwrap_or("")));
        row.add_cell(status);
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_event_details(event: &Event, exceptions: &[ExceptionRecord], names: &MemberNames) {
    println!("{} {}", event.title.bright_white().bold(), format!("({})", event.id).bright_black());
    if let Some(description) = &event.description {
        println!("  {}", description);
    }
    println!("  {:<12} {}", "Starts:".blue(), event.starts_at().format("%Y-%m-%d %H:%M"));
    println!("  {:<12} {}", "Ends:".blue(), event.ends_at.format("%Y-%m-%d %H:%M"));
    println!("  {:<12} {}", "Timezone:".blue(), event.timezone);
    println!("  {:<12} {}", "Repeats:".blue(), event.recurrence);
    if let Some(rrule) = event.recurrence.to_rrule() {
        println!("  {:<12} {}", "RRULE:".blue(), rrule.bright_black());
    }
    if let Some(location) = &event.location {
        println!("  {:<12} {}", "Location:".blue(), location);
    }
    println!(
        "  {:<12} {}",
        "Created by:".blue(),
        names.get(&event.created_by).cloned().unwrap_or_else(|| short_id(event.created_by))
    );
    println!("  {:<12} {}", "With:".blue(), names_of(&event.participants, names));
    if event.is_task {
        println!("  {:<12} {}", "Kind:".blue(), "chore".green());
    }

    if exceptions.is_empty() {
        return;
    }
    println!();
    println!("{}", "Exceptions".bold());
    for exception in exceptions {
        match exception.kind {
            ExceptionKind::Cancelled => {
                println!("  {} {}", exception.occurrence_date, "cancelled".red());
            }
            ExceptionKind::Modified => {
                let snapshot = exception.modified_event_id.map(short_id).unwrap_or_default();
                println!("  {} {} {}", exception.occurrence_date, "changed".yellow(), snapshot.bright_black());
            }
        }
    }
}
