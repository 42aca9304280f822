#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("famcal").expect("Failed to find famcal binary");

        cmd.current_dir(self.temp_dir.path())
            .env("FAMCAL_CONFIG", self.temp_dir.path().join("absent.toml"))
            .env("FAMCAL_DATABASE_PATH", &self.db_path)
            .env("FAMCAL_DEFAULT_TIMEZONE", "UTC")
            .env_remove("FAMCAL_DEFAULT_FAMILY")
            .env_remove("FAMCAL_LOG");

        cmd
    }

    /// Get the database path for this test instance
    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a successful command and returns its stdout without colour codes
    pub fn stdout_of(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        strip_ansi(&String::from_utf8_lossy(&output))
    }

    /// Creates the "Okafor" family with a parent "Ada" and a child "Chidi"
    pub fn with_family(self) -> Self {
        self.run_success(&["family", "add", "Okafor"]);
        self.run_success(&["member", "add", "Ada", "--role", "parent"]);
        self.run_success(&["member", "add", "Chidi", "--role", "child"]);
        self
    }

    /// Adds an event and returns the short ID printed for it
    pub fn add_event(&self, args: &[&str]) -> String {
        let mut full = vec!["event", "add"];
        full.extend_from_slice(args);
        let stdout = self.stdout_of(&full);
        event_id_from(&stdout).unwrap_or_else(|| panic!("no event ID in output:\n{}", stdout))
    }
}

/// Pulls the value printed after "Event ID:".
pub fn event_id_from(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find(|line| line.contains("Event ID:"))
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
}

/// Removes ANSI SGR sequences such as `\x1b[1;32m`.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output indicates a successful change
    pub fn succeeded() -> impl Predicate<str> {
        predicate::str::contains("✓")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }

    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Date")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Status"))
    }
}
