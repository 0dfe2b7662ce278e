//! Clap derive structures for the `officely` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap and clap_complete may be used here: `build.rs` includes this
//! file to render the man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// officely -- office bookings, vacation requests and resources from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "officely",
    version,
    about = "Manage office bookings, vacation requests and resources",
    long_about = "A client for the office management REST backend.\n\n\
        Lists, shows, creates, edits and deletes employees, meeting rooms,\n\
        equipment, booking requests, vacation requests and attachments, and\n\
        approves or rejects pending requests.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "OFFICELY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, env = "OFFICELY_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides every stored token)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "OFFICELY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Disable color output (same as --color never)
    #[arg(long, global = true, conflicts_with = "color")]
    pub no_color: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "OFFICELY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "OFFICELY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        if self.no_color {
            return ColorMode::Never;
        }
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage employees
    #[command(alias = "emp")]
    Employees(EmployeesArgs),

    /// Manage meeting rooms
    #[command(alias = "room")]
    Rooms(RoomsArgs),

    /// Manage equipment
    #[command(alias = "eq")]
    Equipment(EquipmentArgs),

    /// Manage meeting-room booking requests
    #[command(alias = "bk")]
    Bookings(BookingsArgs),

    /// Manage vacation requests
    #[command(alias = "vac")]
    Vacations(VacationsArgs),

    /// Manage vacation request attachments
    #[command(alias = "att")]
    Attachments(AttachmentsArgs),

    /// Show the signed-in account
    Whoami,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Pagination and sorting for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page to show, starting at 1
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (defaults to the profile's page_size)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub size: Option<u32>,

    /// Sort as field[,asc|desc], e.g. "startTime,desc"
    #[arg(long, short = 's', default_value = "id,asc")]
    pub sort: String,

    /// Fetch every page instead of one
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Field values for create and update.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Set a field, e.g. --set name="Board room" (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Read field values from a JSON object file
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Actions every record type supports.
#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List records, one page at a time
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record id
        id: i64,
    },

    /// Create a record from --set values
    Create(FieldArgs),

    /// Change fields of an existing record
    Update {
        /// Record id
        id: i64,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: i64,
    },

    /// Count records
    Count,

    /// Describe the fields accepted by create and update
    Fields,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EmployeesArgs {
    #[command(subcommand)]
    pub command: EmployeesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmployeesCommand {
    #[command(flatten)]
    Common(ResourceCommand),

    /// Show your own employee record and vacation balance
    Me,
}

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Args)]
pub struct EquipmentArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Args)]
pub struct AttachmentsArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    #[command(flatten)]
    Common(ResourceCommand),

    /// List bookings you organise
    Mine(ListArgs),

    /// List bookings you are invited to
    Invitations(ListArgs),

    /// Approve a pending booking
    Approve {
        /// Booking id
        id: i64,
    },

    /// Reject a pending booking
    Reject {
        /// Booking id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VACATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VacationsArgs {
    #[command(subcommand)]
    pub command: VacationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VacationsCommand {
    #[command(flatten)]
    Common(ResourceCommand),

    /// List your own vacation requests
    Mine(ListArgs),

    /// Approve a pending vacation request
    Approve {
        /// Vacation request id
        id: i64,
    },

    /// Reject a pending vacation request
    Reject {
        /// Vacation request id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (tokens masked)
    Show,

    /// Set a configuration value
    Set {
        /// Config key, e.g. "defaults.page_size" or "profiles.work.server"
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
