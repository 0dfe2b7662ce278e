// ── Core error types ──
//
// User-facing errors from officely-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<officely_api::Error>`
// impl translates transport-layer errors into domain meanings.

use thiserror::Error;

use crate::form::ValidationErrors;
use crate::model::{EntityKind, RequestStatus};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Not authenticated: {message}")]
    Unauthorized { message: String },

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{} not found: {identifier}", .entity_type.label())]
    NotFound {
        entity_type: EntityKind,
        identifier: String,
    },

    /// The backend refused a change that clashes with existing data:
    /// an overlapping booking, or deleting a row other rows still reference.
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        error_key: Option<String>,
    },

    #[error("Unexpected response from backend: {message}")]
    UnexpectedResponse { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Cannot move a {from} request to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Unknown field '{field}' for {entity_type}")]
    UnknownField {
        entity_type: EntityKind,
        field: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        error_key: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn not_found(entity_type: EntityKind, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            identifier: identifier.to_string(),
        }
    }

    /// Attach the entity/id being addressed to an otherwise anonymous 404.
    pub(crate) fn with_subject(self, entity_type: EntityKind, identifier: impl ToString) -> Self {
        match self {
            Self::Api {
                status: Some(404), ..
            } => Self::not_found(entity_type, identifier),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<officely_api::Error> for CoreError {
    fn from(err: officely_api::Error) -> Self {
        let conflict = err.is_conflict();
        match err {
            officely_api::Error::Authentication { message } => Self::Unauthorized { message },
            officely_api::Error::Forbidden { message } => Self::Forbidden { message },
            officely_api::Error::InvalidToken(reason) => Self::Config {
                message: format!("stored token is unusable: {reason}"),
            },
            officely_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        error_key: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            officely_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid backend URL: {e}"),
            },
            officely_api::Error::Tls(message) => Self::Config { message },
            officely_api::Error::Api {
                message, error_key, ..
            } if conflict => Self::Conflict { message, error_key },
            officely_api::Error::Api {
                status,
                message,
                error_key,
                ..
            } => Self::Api {
                message,
                error_key,
                status: Some(status),
            },
            officely_api::Error::Deserialization { message, .. }
            | officely_api::Error::Envelope { message } => Self::UnexpectedResponse { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_becomes_conflict() {
        let err = CoreError::from(officely_api::Error::Api {
            status: 400,
            message: "The selected time is already booked.".into(),
            error_key: Some("timeoverlap".into()),
            entity: Some("bookingRequest".into()),
        });
        assert!(matches!(err, CoreError::Conflict { .. }));
    }

    #[test]
    fn anonymous_404_gets_subject() {
        let err = CoreError::from(officely_api::Error::Api {
            status: 404,
            message: "404 Not Found".into(),
            error_key: None,
            entity: None,
        })
        .with_subject(EntityKind::MeetingRoom, 9);
        assert_eq!(err.to_string(), "meeting room not found: 9");
    }

    #[test]
    fn envelope_mismatch_is_unexpected_response() {
        let err = CoreError::from(officely_api::Error::Envelope {
            message: "missing x-total-count header".into(),
        });
        assert!(matches!(err, CoreError::UnexpectedResponse { .. }));
    }
}
