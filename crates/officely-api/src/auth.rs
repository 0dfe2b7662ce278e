// Bearer token handling.
//
// Token issuance happens elsewhere (the backend's login flow); this module
// only turns a stored token into the `Authorization` header.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Credentials attached to every request.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// Requests proceed without an `Authorization` header.
    #[default]
    Anonymous,
    /// `Authorization: Bearer <token>`.
    Bearer(SecretString),
}

impl Credentials {
    /// Build credentials from an optional token; blank tokens count as absent.
    pub fn from_token(token: Option<SecretString>) -> Self {
        match token {
            Some(t) if !t.expose_secret().trim().is_empty() => Self::Bearer(t),
            _ => Self::Anonymous,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Default headers for a client carrying these credentials.
    pub(crate) fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        if let Self::Bearer(token) = self {
            let raw = format!("Bearer {}", token.expose_secret().trim());
            let mut value =
                HeaderValue::from_str(&raw).map_err(|e| Error::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}
