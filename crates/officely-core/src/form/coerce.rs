// ── Wire ↔ display conversion ──
//
// Form fields are plain text. Instants show as local minutes
// (`2025-03-04T09:30`), dates as `2025-03-04`, references as record ids.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::FormValues;
use super::validate::{FieldError, ValidationErrors};
use crate::error::CoreError;
use crate::model::{Entity, EntityId};

/// Display format of instants: local time at minute precision.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_DATETIME_FORMATS: &[&str] = &[
    DATETIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

// ── Instants ─────────────────────────────────────────────────────────

pub fn instant_to_display(instant: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    instant
        .map(|i| i.with_timezone(&offset).format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parse an RFC 3339 instant, or a local wall-clock time in `offset`.
pub fn parse_display_instant(text: &str, offset: FixedOffset) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    let naive = parse_naive(text)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("'{text}' is not a valid local time"))
}

pub(crate) fn check_instant(text: &str) -> Result<(), String> {
    if DateTime::parse_from_rfc3339(text).is_ok() {
        return Ok(());
    }
    parse_naive(text).map(|_| ())
}

fn parse_naive(text: &str) -> Result<NaiveDateTime, String> {
    ACCEPTED_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| "must be a date and time (YYYY-MM-DDTHH:MM)".to_owned())
}

/// Display text back to an instant.
///
/// When the text still equals the display form of `base`, `base` itself is
/// returned so seconds the display dropped survive an unchanged edit.
pub fn display_to_instant(
    text: &str,
    base: Option<DateTime<Utc>>,
    offset: FixedOffset,
) -> Result<Option<DateTime<Utc>>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Some(base) = base {
        if instant_to_display(Some(base), offset) == text {
            return Ok(Some(base));
        }
    }
    parse_display_instant(text, offset).map(Some)
}

// ── Dates ────────────────────────────────────────────────────────────

pub fn date_to_display(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn parse_display_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| "must be a date (YYYY-MM-DD)".to_owned())
}

// ── Scalars ──────────────────────────────────────────────────────────

pub fn parse_flag(text: &str) -> Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "no" | "n" | "0" | "off" => Ok(false),
        _ => Err("must be true or false".into()),
    }
}

/// `"3, 5 8"` → `[3, 5, 8]`
pub fn split_ids(text: &str) -> Result<Vec<EntityId>, String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<EntityId>()
                .map_err(|_| format!("'{part}' is not a record id"))
        })
        .collect()
}

// ── References ───────────────────────────────────────────────────────

pub fn reference_to_display<T: Entity>(reference: Option<&T>) -> String {
    reference
        .and_then(Entity::id)
        .map(|id| id.to_string())
        .unwrap_or_default()
}

pub fn references_to_display<T: Entity>(references: &[T]) -> String {
    references
        .iter()
        .filter_map(Entity::id)
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Map a selected id back to a full record.
///
/// An unchanged selection keeps the reference the record already carried;
/// anything else must be one of `options`.
pub fn resolve_reference<T: Entity>(
    text: &str,
    base: Option<&T>,
    options: &[T],
) -> Result<Option<T>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let id: EntityId = text
        .parse()
        .map_err(|_| format!("'{text}' is not a record id"))?;
    lookup(id, base.into_iter(), options).map(Some)
}

pub fn resolve_references<T: Entity>(
    text: &str,
    base: &[T],
    options: &[T],
) -> Result<Vec<T>, String> {
    split_ids(text)?
        .into_iter()
        .map(|id| lookup(id, base.iter(), options))
        .collect()
}

fn lookup<'a, T: Entity>(
    id: EntityId,
    mut base: impl Iterator<Item = &'a T>,
    options: &[T],
) -> Result<T, String> {
    base.find(|r| r.id() == Some(id))
        .or_else(|| options.iter().find(|r| r.id() == Some(id)))
        .cloned()
        .ok_or_else(|| format!("no {} with id {id}", T::KIND.label()))
}

// ── Reader ───────────────────────────────────────────────────────────

/// Pulls typed values out of a form, collecting every failure instead of
/// stopping at the first.
pub(crate) struct Reader<'a> {
    values: &'a FormValues,
    offset: FixedOffset,
    errors: ValidationErrors,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(values: &'a FormValues, offset: FixedOffset) -> Self {
        Self {
            values,
            offset,
            errors: ValidationErrors::default(),
        }
    }

    fn raw(&self, field: &str) -> &'a str {
        self.values.get(field).map_or("", |v| v.trim())
    }

    fn record<V>(&mut self, field: &str, result: Result<V, String>) -> Option<V> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldError::new(field, message));
                None
            }
        }
    }

    pub(crate) fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub(crate) fn text(&self, field: &str) -> Option<String> {
        let raw = self.raw(field);
        (!raw.is_empty()).then(|| raw.to_owned())
    }

    pub(crate) fn string(&self, field: &str) -> String {
        self.raw(field).to_owned()
    }

    pub(crate) fn number<N: FromStr>(&mut self, field: &str) -> Option<N> {
        let raw = self.raw(field);
        if raw.is_empty() {
            return None;
        }
        let parsed = raw
            .parse::<N>()
            .map_err(|_| "must be a whole number".to_owned());
        self.record(field, parsed)
    }

    pub(crate) fn flag(&mut self, field: &str) -> bool {
        let raw = self.raw(field);
        if raw.is_empty() {
            return false;
        }
        self.record(field, parse_flag(raw)).unwrap_or_default()
    }

    pub(crate) fn choice<E: FromStr>(&mut self, field: &str) -> Option<E> {
        let raw = self.raw(field);
        if raw.is_empty() {
            return None;
        }
        let parsed = raw
            .parse::<E>()
            .map_err(|_| format!("'{raw}' is not a valid choice"));
        self.record(field, parsed)
    }

    pub(crate) fn instant(
        &mut self,
        field: &str,
        base: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        let parsed = display_to_instant(self.raw(field), base, self.offset);
        self.record(field, parsed).flatten()
    }

    pub(crate) fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let raw = self.raw(field);
        if raw.is_empty() {
            return None;
        }
        self.record(field, parse_display_date(raw))
    }

    pub(crate) fn reference<T: Entity>(
        &mut self,
        field: &str,
        base: Option<&T>,
        options: &[T],
    ) -> Option<T> {
        let resolved = resolve_reference(self.raw(field), base, options);
        self.record(field, resolved).flatten()
    }

    pub(crate) fn references<T: Entity>(
        &mut self,
        field: &str,
        base: &[T],
        options: &[T],
    ) -> Vec<T> {
        let resolved = resolve_references(self.raw(field), base, options);
        self.record(field, resolved).unwrap_or_default()
    }

    pub(crate) fn finish<T>(self, record: T) -> Result<T, CoreError> {
        self.errors
            .into_result()
            .map(|()| record)
            .map_err(CoreError::Validation)
    }
}
