use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use famcal_core::models::{Event, Family, Member};
use famcal_core::repository::{EventRepository, FamilyRepository, Repository};
use thiserror::Error;
use uuid::Uuid;

/// Failures resolving names and short IDs typed on the command line.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    NotFound(String),
    #[error("Ambiguous {kind} '{input}'")]
    Ambiguous {
        kind: &'static str,
        input: String,
        candidates: Vec<(String, String)>,
    },
    #[error("{0}")]
    MissingFamily(String),
}

/// Current wall-clock time in `timezone`.
pub fn local_now(timezone: &str) -> Result<NaiveDateTime> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid timezone: '{}'", timezone))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// Full ID, ID prefix, or the short form printed in tables.
fn matches_id(id: Uuid, input: &str) -> bool {
    let input = input.to_lowercase();
    id.to_string().starts_with(&input) || id.simple().to_string().ends_with(&input)
}

/// Picks the single candidate, or reports none/too many.
fn pick<T>(
    kind: &'static str,
    input: &str,
    mut found: Vec<T>,
    describe: impl Fn(&T) -> (String, String),
) -> Result<T, LookupError> {
    match found.len() {
        0 => Err(LookupError::NotFound(format!("No {} found matching '{}'", kind, input))),
        1 => Ok(found.remove(0)),
        _ => Err(LookupError::Ambiguous {
            kind,
            input: input.to_string(),
            candidates: found.iter().map(describe).collect(),
        }),
    }
}

/// Resolves `--family`, then `default_family`, then the only family there is.
pub async fn resolve_family(repo: &impl Repository, requested: Option<&str>) -> Result<Family> {
    let families = repo.find_families().await?;

    let Some(input) = requested else {
        let mut families = families;
        return match families.len() {
            1 => Ok(families.remove(0)),
            0 => Err(LookupError::MissingFamily("No families yet; create one with `famcal family add`".to_string()).into()),
            _ => Err(LookupError::MissingFamily(
                "Several families exist; choose one with --family or `default_family`".to_string(),
            )
            .into()),
        };
    };

    let by_name: Vec<Family> = families
        .iter()
        .filter(|f| f.name.eq_ignore_ascii_case(input))
        .cloned()
        .collect();
    let found = if by_name.is_empty() {
        families.into_iter().filter(|f| matches_id(f.id, input)).collect()
    } else {
        by_name
    };
    Ok(pick("family", input, found, |f| (f.id.to_string(), f.name.clone()))?)
}

pub async fn resolve_member(repo: &impl Repository, family_id: Uuid, input: &str) -> Result<Member> {
    if let Some(member) = repo.find_member_by_name(family_id, input).await? {
        return Ok(member);
    }
    let found = repo
        .find_members(family_id)
        .await?
        .into_iter()
        .filter(|m| m.display_name.eq_ignore_ascii_case(input) || matches_id(m.id, input))
        .collect();
    Ok(pick("member", input, found, |m| (m.id.to_string(), m.display_name.clone()))?)
}

pub async fn resolve_members(repo: &impl Repository, family_id: Uuid, inputs: &[String]) -> Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        ids.push(resolve_member(repo, family_id, input).await?.id);
    }
    Ok(ids)
}

/// Resolves an event by ID prefix among the family's top-level events.
pub async fn resolve_event(repo: &impl Repository, family_id: Uuid, input: &str) -> Result<Event> {
    if input.len() < 2 {
        return Err(LookupError::NotFound("Event ID prefix must be at least 2 characters long".to_string()).into());
    }
    if let Ok(id) = input.parse::<Uuid>() {
        if let Some(event) = repo.load_event(id).await? {
            if event.family_id == family_id {
                return Ok(event);
            }
        }
    }
    let found = repo
        .find_events_for_family(family_id)
        .await?
        .into_iter()
        .filter(|e| matches_id(e.id, input))
        .collect();
    Ok(pick("event", input, found, |e| (e.id.to_string(), e.title.clone()))?)
}

/// Trailing characters of an ID. Version 7 IDs share their leading
/// timestamp bits, so the tail is what tells them apart.
pub fn short_id(id: Uuid) -> String {
    let simple = id.simple().to_string();
    simple[simple.len() - 8..].to_string()
}
