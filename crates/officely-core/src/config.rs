// ── Runtime client configuration ──
//
// Built by the config crate from profiles, or directly by library users.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use officely_api::{Credentials, TlsMode, TransportConfig};

use crate::list::ITEMS_PER_PAGE;

/// How to verify the backend's TLS certificate.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

/// Everything needed to talk to one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: Url,
    /// Bearer token; requests go out unauthenticated without one.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Rows per page for list views.
    pub page_size: u32,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: ITEMS_PER_PAGE,
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::from_token(self.token.clone())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::default()
            .with_tls(tls)
            .with_timeout(self.timeout)
    }
}
