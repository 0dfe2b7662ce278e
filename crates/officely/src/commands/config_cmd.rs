//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use officely_config::{Config, Defaults, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, available_profiles};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    cfg
}

/// TOML-like listing of `cfg` for table output.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "page_size = {}", cfg.defaults.page_size);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(size) = p.page_size {
            let _ = writeln!(out, "page_size = {size}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

fn set_default(defaults: &mut Defaults, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "output" => defaults.output = value,
        "color" => defaults.color = value,
        "insecure" => defaults.insecure = parse_value(key, &value, "'true' or 'false'")?,
        "timeout" => defaults.timeout = parse_value(key, &value, "a number of seconds")?,
        "page_size" | "page-size" => {
            defaults.page_size = parse_value(key, &value, "a positive number")?;
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown defaults key '{other}'. Valid keys: output, color, insecure, \
                     timeout, page_size"
                ),
            });
        }
    }
    Ok(())
}

fn set_profile(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => profile.server = value,
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "page_size" | "page-size" => {
            profile.page_size = Some(parse_value(key, &value, "a positive number")?);
        }
        "timeout" => profile.timeout = Some(parse_value(key, &value, "a number of seconds")?),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_value(key, &value, "'true' or 'false'")?),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown profile key '{other}'. Valid keys: server, token, token_env, \
                     page_size, timeout, ca_cert, insecure"
                ),
            });
        }
    }
    Ok(())
}

/// Apply `key = value`. Keys are `defaults.<key>`, `profiles.<name>.<key>`
/// or a bare profile key for the active profile. Returns what was changed.
fn apply_setting(
    cfg: &mut Config,
    active: &str,
    key: &str,
    value: String,
) -> Result<String, CliError> {
    if let Some(rest) = key.strip_prefix("defaults.") {
        set_default(&mut cfg.defaults, rest, value)?;
        return Ok(format!("{rest} in [defaults]"));
    }
    let (profile_name, field) = match key.strip_prefix("profiles.") {
        Some(rest) => rest.split_once('.').ok_or_else(|| CliError::Validation {
            field: key.into(),
            reason: "expected profiles.<name>.<key>".into(),
        })?,
        None => (active, key),
    };
    let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();
    set_profile(profile, field, value)?;
    Ok(format!("{field} on profile '{profile_name}'"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redacted(&officely_config::load_config()?);
            let out =
                output::render_single(&global.format(), &cfg, format_config, |_| "config".into())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = officely_config::load_config()?;
            let active = active_profile_name(global, &cfg);
            let changed = apply_setting(&mut cfg, &active, &key, value)?;
            officely_config::save_config(&cfg)?;
            output::notice(&format!("✓ Set {changed}"), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = officely_config::load_config()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                output::notice("No profiles configured. Run: officely config init", global.quiet);
            } else {
                let listing = cfg
                    .profiles
                    .iter()
                    .map(|(name, p)| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}\t{}", p.server)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                output::print_output(&listing, global.quiet);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = officely_config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            officely_config::save_config(&cfg)?;
            output::notice(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = officely_config::load_config()?;
            let name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            let token = rpassword::prompt_password("Token: ").map_err(prompt_err)?;
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            officely_config::store_token(&name, token.trim())?;
            output::notice(
                &format!("✓ Token for '{name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

/// Interactive wizard writing a first profile.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = officely_config::config_path();
    eprintln!("officely configuration wizard");
    eprintln!("   Config path: {}\n", path.display());

    let mut cfg = officely_config::load_config()?;

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Backend URL")
        .default("http://localhost:8080".into())
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|e| format!("invalid URL: {e}"))
        })
        .interact_text()
        .map_err(prompt_err)?;

    let token = rpassword::prompt_password("Bearer token (empty for none): ").map_err(prompt_err)?;
    let token = token.trim().to_owned();

    let mut profile = Profile {
        server,
        ..Profile::default()
    };

    if !token.is_empty() {
        let choices = &[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let selection = Select::new()
            .with_prompt("Where to store the token?")
            .items(choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;
        if selection == 0 {
            officely_config::store_token(&name, &token)?;
            eprintln!("   ✓ Token stored in system keyring");
        } else {
            profile.token = Some(token);
        }
    }

    cfg.profiles.insert(name.clone(), profile);
    cfg.default_profile = Some(name.clone());
    let written = officely_config::save_config(&cfg)?;

    output::notice(
        &format!(
            "\n✓ Configuration written to {}\n  Active profile: {name}\n\n  Test it: officely whoami",
            written.display()
        ),
        global.quiet,
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn settings_address_defaults_and_profiles() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "default", "defaults.page_size", "50".into()).unwrap();
        assert_eq!(cfg.defaults.page_size, 50);

        apply_setting(&mut cfg, "default", "server", "http://a".into()).unwrap();
        assert_eq!(cfg.profiles["default"].server, "http://a");

        apply_setting(&mut cfg, "default", "profiles.work.timeout", "5".into()).unwrap();
        assert_eq!(cfg.profiles["work"].timeout, Some(5));
    }

    #[test]
    fn bad_settings_are_rejected() {
        let mut cfg = Config::default();
        assert!(apply_setting(&mut cfg, "default", "colour", "x".into()).is_err());
        assert!(apply_setting(&mut cfg, "default", "timeout", "soon".into()).is_err());
        assert!(apply_setting(&mut cfg, "default", "profiles.work", "x".into()).is_err());
    }

    #[test]
    fn show_masks_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                server: "http://a".into(),
                token: Some("secret".into()),
                ..Profile::default()
            },
        );
        let text = format_config(&redacted(&cfg));
        assert!(text.contains("token = \"****\""));
        assert!(!text.contains("secret"));
    }
}
