//! Black-box tests of the `famcal` binary against temporary databases.

use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("family calendar"))
        .stdout(predicate::str::contains("occurrences"));

    harness.run_success(&["--version"]).stdout(predicate::str::contains("famcal"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_family_and_members() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["member", "list"])
        .stderr(predicate::str::contains("No families yet"));

    harness
        .run_success(&["family", "add", "Okafor"])
        .stdout(assertions::succeeded());
    harness
        .run_success(&["family", "list"])
        .stdout(predicate::str::contains("Okafor"));
    harness.run_success(&["member", "add", "Ada"]);
    harness.run_success(&["member", "add", "Chidi", "--role", "child"]);

    harness
        .run_success(&["member", "list"])
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("child"));

    harness
        .run_failure(&["member", "add", "Ngozi", "--role", "overlord"])
        .stderr(assertions::has_error());

    harness.run_success(&["family", "add", "Neighbours"]);
    harness
        .run_failure(&["member", "list"])
        .stderr(predicate::str::contains("--family"));
    harness
        .run_success(&["--family", "okafor", "member", "list"])
        .stdout(predicate::str::contains("Chidi"));
}

#[test]
fn test_recurring_event_expansion() {
    let harness = CliTestHarness::new().with_family();
    let id = harness.add_event(&[
        "Swim", "--start", "2024-01-01 17:00", "--by", "Ada", "--with", "Ada", "Chidi", "--every", "weekly",
    ]);

    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-01", "--to", "2024-01-15"]);
    assert!(stdout.contains("2024-01-01"));
    assert!(stdout.contains("2024-01-08"));
    assert!(!stdout.contains("2024-01-15"));

    harness
        .run_success(&["event", "show", &id])
        .stdout(predicate::str::contains("FREQ=WEEKLY"))
        .stdout(predicate::str::contains("Chidi"));

    harness
        .run_success(&["event", "list"])
        .stdout(predicate::str::contains("Swim"));
}

#[test]
fn test_monthly_event_clamps_to_month_end() {
    let harness = CliTestHarness::new().with_family();
    harness.add_event(&["Allowance", "--start", "2024-01-31 09:00", "--by", "Ada", "--every", "monthly"]);

    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-02-01", "--to", "2024-03-01"]);
    assert!(stdout.contains("2024-02-29"));
}

#[test]
fn test_window_too_large_is_rejected() {
    let harness = CliTestHarness::new().with_family();
    harness.add_event(&["Vitamins", "--start", "2024-01-01 08:00", "--by", "Ada", "--every", "daily"]);

    harness
        .run_failure(&["occurrences", "--from", "2024-01-01", "--days", "400"])
        .stderr(predicate::str::contains("365"));
}

#[test]
fn test_edit_single_occurrence() {
    let harness = CliTestHarness::new().with_family();
    let id = harness.add_event(&["Swim", "--start", "2024-01-01 17:00", "--by", "Ada", "--every", "weekly"]);

    harness
        .run_success(&["edit", &id, "2024-01-08", "--by", "Ada", "--title", "Swim meet"])
        .stdout(predicate::str::contains("Changed"));

    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-01", "--to", "2024-01-22"]);
    assert_eq!(stdout.matches("Swim meet").count(), 1);
    assert!(stdout.contains("Changed"));

    harness
        .run_success(&["event", "show", &id])
        .stdout(predicate::str::contains("changed"));

    harness
        .run_failure(&["edit", &id, "2024-01-09", "--by", "Ada", "--title", "Nope"])
        .stderr(predicate::str::contains("no occurrence on"));

    harness
        .run_failure(&["edit", &id, "2024-01-08", "--by", "Ada"])
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_edit_following_splits_series() {
    let harness = CliTestHarness::new().with_family();
    let id = harness.add_event(&["Piano", "--start", "2024-01-01 16:00", "--by", "Ada", "--every", "weekly"]);

    harness
        .run_success(&[
            "edit", &id, "2024-02-05", "--by", "Ada", "--scope", "following", "--title", "Piano with Ms. Ito",
        ])
        .stdout(predicate::str::contains("Split"));

    harness
        .run_success(&["event", "show", &id])
        .stdout(predicate::str::contains("UNTIL=20240129"));

    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-22", "--to", "2024-02-13"]);
    assert_eq!(stdout.matches("Piano with Ms. Ito").count(), 2);
}

#[test]
fn test_delete_occurrence_scopes() {
    let harness = CliTestHarness::new().with_family();
    let id = harness.add_event(&["Choir", "--start", "2024-01-01 19:00", "--by", "Ada", "--every", "weekly"]);

    harness
        .run_success(&["delete", &id, "2024-01-08", "--by", "Ada"])
        .stdout(predicate::str::contains("Deletion cancelled"));

    harness
        .run_success(&["delete", &id, "2024-01-08", "--by", "Ada", "--force"])
        .stdout(assertions::succeeded());
    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-01", "--to", "2024-01-22"]);
    assert!(!stdout.contains("2024-01-08"));
    assert!(stdout.contains("2024-01-15"));

    harness.run_success(&["delete", &id, "2024-01-15", "--by", "Ada", "--scope", "following", "--force"]);
    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-01", "--to", "2024-03-01"]);
    assert!(stdout.contains("2024-01-01"));
    assert!(!stdout.contains("2024-01-22"));

    harness.run_success(&["delete", &id, "2024-01-01", "--by", "Ada", "--scope", "all", "--force"]);
    harness
        .run_success(&["occurrences", "--from", "2024-01-01", "--to", "2024-03-01"])
        .stdout(predicate::str::contains("No occurrences found"));
}

#[test]
fn test_child_permissions() {
    let harness = CliTestHarness::new().with_family();
    let id = harness.add_event(&[
        "Practice", "--start", "2024-01-01 16:00", "--by", "Ada", "--with", "Chidi", "--every", "weekly",
    ]);

    harness.run_success(&["edit", &id, "2024-01-08", "--by", "Chidi", "--location", "Gym B"]);

    harness
        .run_failure(&["edit", &id, "2024-01-08", "--by", "Chidi", "--scope", "all", "--title", "Skip"])
        .stderr(predicate::str::contains("may not change"));
}

#[test]
fn test_shared_chore_completion() {
    let harness = CliTestHarness::new().with_family();
    let chore = harness.add_event(&[
        "Feed the cat", "--start", "2024-01-01 08:00", "--by", "Ada", "--with", "Ada", "Chidi", "--task", "--every",
        "daily",
    ]);

    harness
        .run_success(&["done", &chore, "2024-01-02", "--by", "Chidi"])
        .stdout(predicate::str::contains("Completed"));
    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-02", "--to", "2024-01-03"]);
    assert!(stdout.contains("Done"));

    harness
        .run_success(&["done", &chore, "2024-01-02", "--by", "Ada"])
        .stdout(predicate::str::contains("Reopened"));
    let stdout = harness.stdout_of(&["occurrences", "--from", "2024-01-02", "--to", "2024-01-03"]);
    assert!(stdout.contains("To do"));

    let event = harness.add_event(&["Soccer", "--start", "2024-01-01 15:00", "--by", "Ada", "--every", "weekly"]);
    harness
        .run_failure(&["done", &event, "2024-01-01", "--by", "Ada"])
        .stderr(predicate::str::contains("Only chores"));
}

#[test]
fn test_unknown_event_and_member() {
    let harness = CliTestHarness::new().with_family();
    harness.add_event(&["Swim", "--start", "2024-01-01 17:00", "--by", "Ada"]);

    harness
        .run_failure(&["event", "show", "zzzzzzzz"])
        .stderr(predicate::str::contains("No event found"));

    harness
        .run_failure(&["event", "add", "Orphan", "--start", "2024-01-01 10:00", "--by", "Nobody"])
        .stderr(predicate::str::contains("No member found"));
}
