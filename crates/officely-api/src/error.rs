use thiserror::Error;

/// Top-level error type for the `officely-api` crate.
///
/// Three families: the request never completed (transport), the backend
/// answered with a non-2xx status, or the body did not match the documented
/// shape. `officely-core` maps these into domain meanings.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend rejected the bearer token (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The caller lacks the role the endpoint requires (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The stored token cannot be turned into a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Structured non-2xx answer from the backend.
    ///
    /// `error_key` carries the backend's machine-readable reason
    /// (`timeoverlap`, `roomnotfound`, `employeenotfound`, ...).
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        error_key: Option<String>,
        entity: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A paginated read violated the list envelope (array body plus
    /// `X-Total-Count`).
    #[error("Unexpected response envelope: {message}")]
    Envelope { message: String },
}

impl Error {
    /// HTTP status of a backend answer, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` when the backend refused the request because it clashes
    /// with existing data (duplicate booking slot, row still referenced).
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Api { status: 409, .. } => true,
            Self::Api { error_key, .. } => matches!(
                error_key.as_deref(),
                Some("timeoverlap" | "idexists" | "referenced")
            ),
            _ => false,
        }
    }

    /// Returns `true` for failures where the request never got an answer.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Extract the backend's error key, if available.
    pub fn api_error_key(&self) -> Option<&str> {
        match self {
            Self::Api { error_key, .. } => error_key.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, key: Option<&str>) -> Error {
        Error::Api {
            status,
            message: "nope".into(),
            error_key: key.map(String::from),
            entity: None,
        }
    }

    #[test]
    fn conflict_detection() {
        assert!(api(409, None).is_conflict());
        assert!(api(400, Some("timeoverlap")).is_conflict());
        assert!(!api(400, Some("roomnotfound")).is_conflict());
        assert!(!api(500, None).is_conflict());
    }

    #[test]
    fn status_of_auth_errors() {
        let err = Error::Authentication {
            message: "expired".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_not_found());
        assert!(api(404, None).is_not_found());
    }
}
