// ── Field validation ──

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::coerce;
use super::{FieldKind, FieldSpec, FormValues};
use crate::model::EntityId;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Longest e-mail address the backend stores.
pub const EMAIL_MAX_LEN: usize = 254;

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every problem found in a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check every field's text against its declared kind.
///
/// Reference ids are only checked for shape here; whether they exist in the
/// related lists is decided when the values are turned into a record.
pub fn validate(fields: &[FieldSpec], values: &FormValues) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for spec in fields {
        let text = values.get(spec.name).map_or("", |v| v.trim());
        if text.is_empty() {
            if spec.required {
                errors.push(FieldError::new(spec.name, "is required"));
            }
            continue;
        }
        if let Err(message) = check(spec.kind, text) {
            errors.push(FieldError::new(spec.name, message));
        }
    }
    errors.into_result()
}

fn check(kind: FieldKind, text: &str) -> Result<(), String> {
    match kind {
        FieldKind::Text { max_len } => check_len(text, max_len),
        FieldKind::Email => {
            check_len(text, Some(EMAIL_MAX_LEN))?;
            match EMAIL.as_ref() {
                Some(re) if !re.is_match(text) => Err("is not a valid e-mail address".into()),
                _ => Ok(()),
            }
        }
        FieldKind::Integer { min } => {
            let value: i64 = text.parse().map_err(|_| "must be a whole number".to_owned())?;
            match min {
                Some(min) if value < min => Err(format!("must be at least {min}")),
                _ => Ok(()),
            }
        }
        FieldKind::Flag => coerce::parse_flag(text).map(|_| ()),
        FieldKind::DateTime => coerce::check_instant(text),
        FieldKind::Date => coerce::parse_display_date(text).map(|_| ()),
        FieldKind::Choice(options) => {
            if options.iter().any(|o| o.eq_ignore_ascii_case(text)) {
                Ok(())
            } else {
                Err(format!("must be one of {}", options.join(", ")))
            }
        }
        FieldKind::Reference(_) => text
            .parse::<EntityId>()
            .map(|_| ())
            .map_err(|_| "must be a record id".into()),
        FieldKind::References(_) => coerce::split_ids(text).map(|_| ()),
    }
}

fn check_len(text: &str, max_len: Option<usize>) -> Result<(), String> {
    match max_len {
        Some(max) if text.chars().count() > max => {
            Err(format!("must be at most {max} characters"))
        }
        _ => Ok(()),
    }
}
