//! Shared configuration for officely.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `officely_core::ClientConfig`. The CLI layers its global
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use officely_core::{ClientConfig, ITEMS_PER_PAGE, TlsVerification};

/// Keyring service name tokens are stored under.
pub const KEYRING_SERVICE: &str = "officely";

/// Environment variable holding a bearer token for any profile.
pub const TOKEN_ENV: &str = "OFFICELY_TOKEN";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "OFFICELY_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The profile named `name`, or the default profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    ITEMS_PER_PAGE
}

/// A named backend profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://office.example.com").
    pub server: String,

    /// Bearer token in plaintext. The keyring or an env var is preferred.
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Override rows per page.
    pub page_size: Option<u32>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$OFFICELY_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("dev", "officely", "officely").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("officely");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path`, then `OFFICELY_*` variables (`__` separates
/// nesting levels: `OFFICELY_DEFAULTS__PAGE_SIZE=50`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OFFICELY_").split("__").ignore(&["token", "config"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/token")
}

/// Resolve the bearer token for a profile.
///
/// Order: the profile's `token_env` variable, `OFFICELY_TOKEN`, the system
/// keyring, then plaintext `token`. `None` means the requests go out
/// unauthenticated.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |user| {
            keyring::Entry::new(KEYRING_SERVICE, user)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    let found = profile
        .token_env
        .as_deref()
        .and_then(&env)
        .or_else(|| env(TOKEN_ENV))
        .or_else(|| keyring(&keyring_user(profile_name)))
        .or_else(|| profile.token.clone());
    found
        .filter(|t| !t.trim().is_empty())
        .map(SecretString::from)
}

/// Store a token for `profile_name` in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(token)?;
    Ok(())
}

// ── Translation to ClientConfig ─────────────────────────────────────

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let mut config = ClientConfig::new(url);
    config.token = resolve_token(profile, profile_name);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.page_size = page_size;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn sample() -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                server: "https://office.example.com".into(),
                token_env: Some("OFFICE_TOKEN_FOR_TESTS".into()),
                page_size: Some(50),
                ..Profile::default()
            },
        );
        config.profiles.insert(
            "staging".into(),
            Profile {
                server: "https://staging.office.example.com/backend".into(),
                token: Some("plain".into()),
                insecure: Some(true),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        save_config_to(&path, &sample()).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, sample().profiles);
        assert_eq!(loaded.defaults, Defaults::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        assert!(loaded.profiles.is_empty());
    }

    #[test]
    fn profile_lookup() {
        let config = sample();
        assert_eq!(config.profile(None).unwrap().0, "default");
        assert_eq!(config.profile(Some("staging")).unwrap().0, "staging");
        assert!(matches!(
            config.profile(Some("prod")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn token_resolution_order() {
        let profile = Profile {
            token_env: Some("MY_TOKEN".into()),
            token: Some("plaintext".into()),
            ..Profile::default()
        };
        let env_with = |vars: &'static [(&'static str, &'static str)]| {
            move |name: &str| {
                vars.iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| (*v).to_owned())
            }
        };
        let no_keyring = |_: &str| None;
        let keyring = |user: &str| (user == "default/token").then(|| "from-keyring".to_owned());

        let token = resolve_token_with(
            &profile,
            "default",
            env_with(&[("MY_TOKEN", "profile-env"), (TOKEN_ENV, "global-env")]),
            keyring,
        );
        assert_eq!(token.unwrap().expose_secret(), "profile-env");

        let token = resolve_token_with(
            &profile,
            "default",
            env_with(&[(TOKEN_ENV, "global-env")]),
            keyring,
        );
        assert_eq!(token.unwrap().expose_secret(), "global-env");

        let token = resolve_token_with(&profile, "default", env_with(&[]), keyring);
        assert_eq!(token.unwrap().expose_secret(), "from-keyring");

        let token = resolve_token_with(&profile, "default", env_with(&[]), no_keyring);
        assert_eq!(token.unwrap().expose_secret(), "plaintext");

        let anonymous = resolve_token_with(&Profile::default(), "x", env_with(&[]), no_keyring);
        assert!(anonymous.is_none());
    }

    #[test]
    fn profile_translation() {
        let config = sample();
        let (name, profile) = config.profile(Some("staging")).unwrap();
        let client = profile_to_client_config(profile, name, &config.defaults).unwrap();
        assert_eq!(client.url.as_str(), "https://staging.office.example.com/backend");
        assert!(matches!(client.tls, TlsVerification::DangerAcceptInvalid));
        assert_eq!(client.page_size, ITEMS_PER_PAGE);
        assert_eq!(client.timeout, Duration::from_secs(30));

        let bad = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&bad, "bad", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }
}
