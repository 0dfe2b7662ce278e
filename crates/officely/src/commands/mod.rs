//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod attachments;
pub mod bookings;
pub mod config_cmd;
pub mod employees;
pub mod equipment;
pub mod resource;
pub mod rooms;
pub mod util;
pub mod vacations;
pub mod whoami;

use officely_core::Office;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    office: &Office,
    global: &GlobalOpts,
    profile: &str,
) -> Result<(), CliError> {
    match cmd {
        Command::Employees(args) => employees::handle(office, args, global, profile).await,
        Command::Rooms(args) => rooms::handle(office, args, global).await,
        Command::Equipment(args) => equipment::handle(office, args, global).await,
        Command::Bookings(args) => bookings::handle(office, args, global).await,
        Command::Vacations(args) => vacations::handle(office, args, global).await,
        Command::Attachments(args) => attachments::handle(office, args, global).await,
        Command::Whoami => whoami::handle(office, global, profile),
        // Config and Completions are handled before a connection is made
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
