//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use officely_config::ConfigError;
use officely_core::{CoreError, EntityKind};

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 5;
    pub const CONNECTION: i32 = 6;
}

/// Subcommand that manages records of `kind`.
pub fn command_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Employee => "employees",
        EntityKind::MeetingRoom => "rooms",
        EntityKind::Equipment => "equipment",
        EntityKind::BookingRequest => "bookings",
        EntityKind::VacationRequest => "vacations",
        EntityKind::Attachment => "attachments",
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(officely::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(officely::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(officely::auth_failed),
        help(
            "Check your token.\n\
             Run: officely config set-token --profile {profile}\n\
             Or set OFFICELY_TOKEN."
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(officely::forbidden),
        help("Approving, rejecting and managing other people's records needs the HR or admin role.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(officely::not_found),
        help("Run: officely {list_command} list to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(officely::conflict),
        help(
            "The backend refused the change because it clashes with existing data \
             (an overlapping booking, or a record other records still reference)."
        )
    )]
    Conflict {
        message: String,
        error_key: Option<String>,
    },

    #[error("Cannot move a {from} request to {to}")]
    #[diagnostic(
        code(officely::invalid_transition),
        help("Only PENDING requests can be approved or rejected.")
    )]
    InvalidTransition { from: String, to: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(officely::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
        error_key: Option<String>,
    },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(
        code(officely::unexpected_response),
        help("Check that --server points at the office backend. Run with -vv for details.")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(officely::validation))]
    Validation { field: String, reason: String },

    #[error("The record is not valid: {details}")]
    #[diagnostic(code(officely::invalid_record), help("{hint}"))]
    InvalidRecord { details: String, hint: String },

    #[error("Unknown field '{field}'")]
    #[diagnostic(
        code(officely::unknown_field),
        help("Run: officely {command} fields to see accepted fields")
    )]
    UnknownField { field: String, command: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(officely::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: officely config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(officely::no_config),
        help(
            "Create a profile with: officely config init\n\
             Or pass --server / set OFFICELY_SERVER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(officely::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(officely::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(officely::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(officely::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(officely::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::Forbidden { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::InvalidTransition { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidRecord { .. }
            | Self::UnknownField { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Name the profile in authentication hints.
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.to_owned(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Unauthorized { message } => Self::AuthFailed {
                message,
                profile: "<name>".into(),
            },
            CoreError::Forbidden { message } => Self::Forbidden { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                resource_type: entity_type.label().into(),
                identifier,
                list_command: command_for(entity_type).into(),
            },
            CoreError::Conflict { message, error_key } => Self::Conflict { message, error_key },
            CoreError::UnexpectedResponse { message } => Self::UnexpectedResponse { message },
            CoreError::Validation(errors) => Self::InvalidRecord {
                details: errors.to_string(),
                hint: "Check the values and try again.".into(),
            },
            CoreError::InvalidTransition { from, to } => Self::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            CoreError::UnknownField { entity_type, field } => Self::UnknownField {
                field,
                command: command_for(entity_type).into(),
            },
            CoreError::Api {
                message,
                error_key,
                status,
            } => Self::ApiError {
                status,
                message,
                error_key,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use officely_core::RequestStatus;

    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let conflict = CliError::from(CoreError::Conflict {
            message: "booked".into(),
            error_key: Some("timeoverlap".into()),
        });
        assert_eq!(conflict.exit_code(), exit_code::CONFLICT);

        let missing = CliError::from(CoreError::not_found(EntityKind::MeetingRoom, 4));
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(missing.to_string(), "meeting room '4' not found");

        let auth = CliError::from(CoreError::Unauthorized {
            message: "expired".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn decided_requests_are_conflicts() {
        let err = CliError::from(CoreError::InvalidTransition {
            from: RequestStatus::Approved,
            to: RequestStatus::Rejected,
        });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
        assert_eq!(err.to_string(), "Cannot move a APPROVED request to REJECTED");
    }

    #[test]
    fn api_error_shows_status() {
        let err = CliError::ApiError {
            status: Some(500),
            message: "boom".into(),
            error_key: None,
        };
        assert_eq!(err.to_string(), "API error (500): boom");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
