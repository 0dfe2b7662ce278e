//! Resolution of the effective backend settings: config file profile,
//! then global flags on top.
//!
//! Core only ever sees the resulting `ClientConfig`.

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use officely_config::{Config, Defaults, Profile};
use officely_core::{ClientConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Profile name from `--profile`, the config's default, or `"default"`.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fill output and color flags the user did not pass from `[defaults]`.
pub fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&defaults.output, true).ok();
    }
    if global.color.is_none() && !global.no_color {
        global.color = ColorMode::from_str(&defaults.color, true).ok();
    }
}

/// Build the `ClientConfig` for the active profile with flag overrides.
///
/// Without a matching profile, `--server` alone is enough; the token then
/// comes from `--token`, `OFFICELY_TOKEN` or the keyring.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut client = if let Some(profile) = cfg.profiles.get(&profile_name) {
        officely_config::profile_to_client_config(profile, &profile_name, &cfg.defaults)?
    } else {
        let Some(server) = global.server.as_deref() else {
            return Err(missing_profile(global, cfg, &profile_name));
        };
        let adhoc = Profile {
            server: server.to_owned(),
            ..Profile::default()
        };
        officely_config::profile_to_client_config(&adhoc, &profile_name, &cfg.defaults)?
    };

    if let Some(server) = global.server.as_deref() {
        client.url = server.parse().map_err(|_| CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {server}"),
        })?;
    }
    if let Some(token) = global.token.as_deref() {
        client.token = Some(SecretString::from(token.to_owned()));
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(
        profile = %profile_name,
        url = %client.url,
        authenticated = client.token.is_some(),
        "resolved backend settings"
    );
    Ok(client)
}

fn missing_profile(global: &GlobalOpts, cfg: &Config, name: &str) -> CliError {
    if global.profile.is_some() || !cfg.profiles.is_empty() {
        CliError::ProfileNotFound {
            name: name.to_owned(),
            available: available_profiles(cfg),
        }
    } else {
        CliError::NoConfig {
            path: officely_config::config_path().display().to_string(),
        }
    }
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
