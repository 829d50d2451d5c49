//! Formsmith test utilities.
//!
//! Fixture builders for raw operator field payloads, canonical forms and
//! timestamped submissions.

use chrono::{DateTime, Duration, TimeZone, Utc};
use formsmith_sdk::types::{FieldDefinition, Form, Submission, Theme};
use serde_json::{Map, Value as JsonValue, json};

/// Start a raw field entry as an operator would send it.
pub fn raw_field(field_type: &str, label: &str) -> RawField {
    let mut entry = Map::new();
    entry.insert("type".into(), json!(field_type));
    entry.insert("label".into(), json!(label));
    RawField { entry }
}

/// A raw field entry builder.
#[derive(Debug, Clone)]
pub struct RawField {
    entry: Map<String, JsonValue>,
}

impl RawField {
    /// Mark as required.
    pub fn required(self) -> Self {
        self.with("required", json!(true))
    }

    /// Set a placeholder.
    pub fn placeholder(self, text: &str) -> Self {
        self.with("placeholder", json!(text))
    }

    /// Set a wildcard format.
    pub fn format(self, format: &str) -> Self {
        self.with("format", json!(format))
    }

    /// Set select options as a list.
    pub fn options(self, options: &[&str]) -> Self {
        self.with("options", json!(options))
    }

    /// Set select options as free text.
    pub fn options_text(self, text: &str) -> Self {
        self.with("options_text", json!(text))
    }

    /// Set a select default.
    pub fn default_value(self, value: &str) -> Self {
        self.with("default", json!(value))
    }

    /// Set an arbitrary key.
    pub fn with(mut self, key: &str, value: JsonValue) -> Self {
        self.entry.insert(key.into(), value);
        self
    }

    /// The entry as JSON.
    pub fn build(self) -> JsonValue {
        JsonValue::Object(self.entry)
    }
}

/// Collect raw entries into a field-list payload.
pub fn raw_fields(fields: impl IntoIterator<Item = RawField>) -> JsonValue {
    JsonValue::Array(fields.into_iter().map(RawField::build).collect())
}

/// A fixed instant, so ordering in tests is deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Create a test form with default values.
pub fn test_form(slug: &str, fields: Vec<FieldDefinition>) -> Form {
    let now = base_time();
    Form {
        slug: slug.to_string(),
        title: slug.to_string(),
        description: None,
        theme: Theme::default(),
        fields,
        suspended: false,
        created_at: now,
        updated_at: now,
    }
}

/// Create a submission `minutes` after [`base_time`].
pub fn test_submission(slug: &str, minutes: i64, values: &[(&str, &str)]) -> Submission {
    values.iter().fold(
        Submission::new(slug, base_time() + Duration::minutes(minutes)),
        |sub, (id, value)| sub.with_value(id, value),
    )
}
