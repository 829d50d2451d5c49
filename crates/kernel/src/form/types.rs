//! Form create/update payloads.

use chrono::{DateTime, Utc};
use formsmith_sdk::types::Form;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One property of a partial update.
///
/// On the wire: key absent is `Unset`, `null` is `Clear`, anything else is
/// `Set`. Fields using this type need `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value alone.
    #[default]
    Unset,
    /// Reset to the empty/default value.
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Clear, Patch::Set)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Payload for creating a form.
///
/// `theme` and `fields` stay raw JSON; they go through the sanitizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewForm {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub theme: Value,

    #[serde(default)]
    pub fields: Value,
}

impl NewForm {
    pub fn new(title: &str, fields: Value) -> Self {
        Self {
            title: title.to_string(),
            fields,
            ..Self::default()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn theme(mut self, theme: Value) -> Self {
        self.theme = theme;
        self
    }
}

/// Partial update of a form; every property is independent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUpdate {
    #[serde(default)]
    pub title: Patch<String>,

    #[serde(default)]
    pub description: Patch<String>,

    #[serde(default)]
    pub theme: Patch<Value>,

    /// Replacing fields discards prior field identities.
    #[serde(default)]
    pub fields: Patch<Value>,

    #[serde(default)]
    pub suspended: Patch<bool>,
}

/// A freshly created form and where it is published.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedForm {
    pub form: Form,
    pub view_url: String,
}

/// Dashboard row for one form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub slug: String,
    pub title: String,
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
    pub created_at_str: String,
    pub submissions_count: usize,
}
