//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use officely_core::Sort;

use crate::cli::{FieldArgs, GlobalOpts};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').to_owned(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read a JSON object of field values for `--from-file`.
///
/// Strings are taken as-is, numbers and booleans as their JSON text, arrays
/// of ids joined with commas.
pub fn read_fields_file(path: &Path) -> Result<Vec<(String, String)>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let serde_json::Value::Object(map) = value else {
        return Err(CliError::Validation {
            field: "from-file".into(),
            reason: "expected a JSON object of field values".into(),
        });
    };
    map.into_iter()
        .map(|(field, value)| -> Result<_, CliError> {
            let text = field_text(&field, &value)?;
            Ok((field, text))
        })
        .collect()
}

fn field_text(field: &str, value: &serde_json::Value) -> Result<String, CliError> {
    use serde_json::Value;
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| field_text(field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(|ids| ids.join(",")),
        Value::Object(_) => Err(CliError::Validation {
            field: field.to_owned(),
            reason: "nested objects are not accepted; give the record id".into(),
        }),
    }
}

/// Values from `--from-file` first, then each `--set` in order.
pub fn collect_fields(args: &FieldArgs) -> Result<Vec<(String, String)>, CliError> {
    let mut values = match &args.from_file {
        Some(path) => read_fields_file(path)?,
        None => Vec::new(),
    };
    values.extend(args.set.iter().cloned());
    Ok(values)
}

pub fn parse_sort(text: &str) -> Result<Sort, CliError> {
    text.parse().map_err(|reason| CliError::Validation {
        field: "sort".into(),
        reason,
    })
}

/// The machine's current UTC offset, used to read and show local times.
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

pub fn local_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn yes_no(flag: bool) -> String {
    String::from(if flag { "yes" } else { "no" })
}

/// First letter upper-cased: `meeting room` -> `Meeting room`.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Stderr spinner for slow multi-request work; hidden when quiet or piped.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn fields_file_flattens_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "Blue", "capacity": 8, "requiresApproval": true, "equipment": [1, 2]}}"#
        )
        .unwrap();
        let values = read_fields_file(file.path()).unwrap();
        assert_eq!(
            values,
            vec![
                ("capacity".to_owned(), "8".to_owned()),
                ("equipment".to_owned(), "1,2".to_owned()),
                ("name".to_owned(), "Blue".to_owned()),
                ("requiresApproval".to_owned(), "true".to_owned()),
            ]
        );
    }

    #[test]
    fn fields_file_rejects_nested_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"meetingRoom": {{"id": 3}}}}"#).unwrap();
        assert!(read_fields_file(file.path()).is_err());
    }

    #[test]
    fn sort_parsing() {
        let sort = parse_sort("startTime,desc").unwrap();
        assert_eq!(sort.to_string(), "startTime,desc");
        assert!(parse_sort(",asc").is_err());
    }

    #[test]
    fn capitalizes_labels() {
        assert_eq!(capitalize("meeting room"), "Meeting room");
        assert_eq!(capitalize(""), "");
    }
}
