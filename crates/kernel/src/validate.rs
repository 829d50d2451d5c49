//! Field value validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! required, optional-empty short circuit, type shape, then mask pattern.

use std::collections::HashMap;
use std::sync::LazyLock;

use formsmith_sdk::types::{FieldDefinition, FieldType};
use regex::Regex;
use tracing::warn;

use crate::error::FieldError;

/// Permissive `local@domain.tld` shape with no embedded whitespace.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex literal"));

/// Digits, `+`, parentheses, `-`, `.` and spaces, at least three of them.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static TEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+()\-.\s]{3,}$").expect("valid regex literal"));

/// Outcome of checking a value against a stored mask pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCheck {
    Matched,
    Mismatched,
    /// The stored pattern does not compile. Treated as a pass.
    Unusable,
}

/// Validate one submitted value against its field definition.
///
/// `None` is treated as an empty string. The stored pattern is compiled on
/// every call; use [`FieldIndex::validate`] when checking many values.
pub fn validate_value(field: &FieldDefinition, raw: Option<&str>) -> Result<(), FieldError> {
    let pattern = stored_pattern(field).map(CompiledPattern::compile);
    validate_with(field, pattern.as_ref(), raw)
}

fn validate_with(
    field: &FieldDefinition,
    pattern: Option<&CompiledPattern>,
    raw: Option<&str>,
) -> Result<(), FieldError> {
    let value = raw.unwrap_or("");
    let trimmed = value.trim();

    if trimmed.is_empty() {
        if field.required {
            return Err(FieldError::Missing {
                field: field.id.clone(),
                label: display_label(field),
            });
        }
        // Optional and empty: never checked further.
        return Ok(());
    }

    check_type(field, value, trimmed)?;

    if let Some(pattern) = pattern {
        match pattern.check(value) {
            PatternCheck::Matched => {}
            PatternCheck::Mismatched => {
                return Err(FieldError::FormatMismatch {
                    field: field.id.clone(),
                    label: display_label(field),
                });
            }
            PatternCheck::Unusable => {
                warn!(
                    field = %field.id,
                    pattern = pattern.source(),
                    "skipping unusable stored pattern"
                );
            }
        }
    }

    Ok(())
}

fn stored_pattern(field: &FieldDefinition) -> Option<&str> {
    field.pattern.as_deref().filter(|p| !p.is_empty())
}

/// A stored mask pattern compiled for full-string matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Option<Regex>,
}

impl CompiledPattern {
    /// Compile `pattern` anchored at both ends. Patterns that fail to
    /// compile are kept and report [`PatternCheck::Unusable`].
    pub fn compile(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            regex: Regex::new(&format!("^(?:{pattern})$")).ok(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn check(&self, value: &str) -> PatternCheck {
        match &self.regex {
            Some(re) if re.is_match(value) => PatternCheck::Matched,
            Some(_) => PatternCheck::Mismatched,
            None => PatternCheck::Unusable,
        }
    }
}

/// Full-string match of `value` against a stored pattern.
pub fn check_pattern(pattern: &str, value: &str) -> PatternCheck {
    CompiledPattern::compile(pattern).check(value)
}

fn check_type(field: &FieldDefinition, value: &str, trimmed: &str) -> Result<(), FieldError> {
    let field_id = || field.id.clone();
    match field.field_type {
        FieldType::Number if trimmed.parse::<f64>().is_err() => Err(FieldError::NotANumber {
            field: field_id(),
            label: display_label(field),
        }),
        FieldType::Email if !EMAIL_RE.is_match(trimmed) => Err(FieldError::InvalidEmail {
            field: field_id(),
            label: display_label(field),
        }),
        FieldType::Tel if !TEL_RE.is_match(trimmed) => Err(FieldError::InvalidPhone {
            field: field_id(),
            label: display_label(field),
        }),
        FieldType::Select
            if !field.options.is_empty() && !field.options.iter().any(|o| o == value) =>
        {
            Err(FieldError::NotAnOption {
                field: field_id(),
                label: display_label(field),
            })
        }
        _ => Ok(()),
    }
}

/// Label used in messages, falling back to the id for hand-edited schemas.
fn display_label(field: &FieldDefinition) -> String {
    if field.label.is_empty() {
        field.id.clone()
    } else {
        field.label.clone()
    }
}

/// Immutable id-to-definition lookup, built once per operation.
///
/// Stored patterns are compiled when the index is built.
#[derive(Debug)]
pub struct FieldIndex<'a> {
    by_id: HashMap<&'a str, IndexedField<'a>>,
}

#[derive(Debug)]
struct IndexedField<'a> {
    field: &'a FieldDefinition,
    pattern: Option<CompiledPattern>,
}

impl<'a> FieldIndex<'a> {
    pub fn new(fields: &'a [FieldDefinition]) -> Self {
        let by_id = fields
            .iter()
            .map(|field| {
                let pattern = stored_pattern(field).map(CompiledPattern::compile);
                (field.id.as_str(), IndexedField { field, pattern })
            })
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a FieldDefinition> {
        self.by_id.get(id).map(|entry| entry.field)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Validate a value for `field` using the pattern compiled for its id.
    ///
    /// Fields missing from the index fall back to [`validate_value`].
    pub fn validate(&self, field: &FieldDefinition, raw: Option<&str>) -> Result<(), FieldError> {
        match self.by_id.get(field.id.as_str()) {
            Some(entry) => validate_with(field, entry.pattern.as_ref(), raw),
            None => validate_value(field, raw),
        }
    }
}
