use clap::{Args, Parser, Subcommand};
use famcal_core::models::{FamilyRole, Frequency, OccurrenceScope};

/// Shared family calendar with recurring events and chores
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Family to operate on (name or ID prefix); falls back to `default_family`
    #[arg(short, long, global = true)]
    pub family: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage families
    Family(FamilyCommand),
    /// Manage family members
    Member(MemberCommand),
    /// Manage events and chores
    Event(EventCommand),
    /// List occurrences in a date window
    Occurrences(OccurrencesCommand),
    /// Edit one occurrence, the following ones, or the whole series
    Edit(EditCommand),
    /// Delete one occurrence, the following ones, or the whole series
    Delete(DeleteCommand),
    /// Toggle completion of a chore occurrence
    Done(DoneCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct FamilyCommand {
    #[command(subcommand)]
    pub command: FamilySubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FamilySubcommand {
    /// Add a new family
    Add(AddFamilyCommand),
    /// List families
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct AddFamilyCommand {
    /// The name of the family
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct MemberCommand {
    #[command(subcommand)]
    pub command: MemberSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MemberSubcommand {
    /// Add a member to the family
    Add(AddMemberCommand),
    /// List members of the family
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct AddMemberCommand {
    /// Display name, unique within the family
    pub name: String,
    /// admin, parent or child
    #[arg(short, long, default_value = "parent")]
    pub role: FamilyRole,
}

#[derive(Parser, Debug, Clone)]
pub struct EventCommand {
    #[command(subcommand)]
    pub command: EventSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EventSubcommand {
    /// Add a new event or chore
    Add(AddEventCommand),
    /// Show an event with its recurrence and exceptions
    Show(ShowEventCommand),
    /// List the family's events
    List,
}

/// Recurrence options shared by `event add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct RecurrenceArgs {
    /// Repeat frequency (daily, weekly, monthly, yearly)
    #[arg(long)]
    pub every: Option<Frequency>,
    /// Repeat every N units of the frequency
    #[arg(long, requires = "every")]
    pub interval: Option<i64>,
    /// Last date an occurrence may fall on
    #[arg(long, requires = "every", conflicts_with = "count")]
    pub until: Option<String>,
    /// Total number of occurrences
    #[arg(long, requires = "every")]
    pub count: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddEventCommand {
    /// The title of the event
    pub title: String,
    /// Start, e.g. "2024-03-01 17:30" or "next friday"
    #[arg(short, long)]
    pub start: String,
    /// End; defaults to one hour after the start
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,
    /// Length in minutes
    #[arg(long)]
    pub duration: Option<i64>,
    /// Member creating the event
    #[arg(long)]
    pub by: String,
    /// Participating members
    #[arg(short, long = "with", num_args = 1..)]
    pub participants: Vec<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    /// Mark as an all-day event
    #[arg(long)]
    pub all_day: bool,
    /// Make it a chore whose occurrences can be marked done
    #[arg(long)]
    pub task: bool,
    /// IANA timezone of the event (defaults to `default_timezone`)
    #[arg(long)]
    pub timezone: Option<String>,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowEventCommand {
    /// Event ID or ID prefix
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct OccurrencesCommand {
    /// Limit to one event (ID or ID prefix)
    #[arg(short, long)]
    pub event: Option<String>,
    /// First day of the window (inclusive); defaults to today
    #[arg(long)]
    pub from: Option<String>,
    /// Day after the window (exclusive)
    #[arg(long, conflicts_with = "days")]
    pub to: Option<String>,
    /// Window length in days; defaults to `default_window_days`
    #[arg(long)]
    pub days: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// Event ID or ID prefix
    pub event: String,
    /// Original date of the occurrence
    pub date: String,
    /// Member making the change
    #[arg(long)]
    pub by: String,
    /// this, following or all
    #[arg(short, long, default_value = "this")]
    pub scope: OccurrenceScope,

    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, conflicts_with = "location")]
    pub location_clear: bool,
    /// New start; moving the start keeps the duration
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long, num_args = 1..)]
    pub participants: Option<Vec<String>>,
    #[arg(long)]
    pub timezone: Option<String>,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// Event ID or ID prefix
    pub event: String,
    /// Original date of the occurrence
    pub date: String,
    /// Member making the change
    #[arg(long)]
    pub by: String,
    /// this, following or all
    #[arg(short, long, default_value = "this")]
    pub scope: OccurrenceScope,
    /// Delete without confirmation
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// Event ID or ID prefix
    pub event: String,
    /// Date of the occurrence
    pub date: String,
    /// Participant marking the chore
    #[arg(long)]
    pub by: String,
}
