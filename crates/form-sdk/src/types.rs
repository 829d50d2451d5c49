//! Core types for Formsmith forms.
//!
//! Everything here is the canonical (post-sanitization) shape. Raw operator
//! input never deserializes straight into these types; it goes through the
//! kernel's schema sanitizer first.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of field types a form can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Tel,
    Date,
    Textarea,
    Select,
}

impl FieldType {
    /// Every supported type, in builder palette order.
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Date,
        FieldType::Textarea,
        FieldType::Select,
    ];

    /// Machine name as stored in the schema (e.g. "textarea").
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
        }
    }

    /// Title-cased machine name, used as the label of unlabeled fields.
    pub fn title(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Email => "Email",
            FieldType::Tel => "Tel",
            FieldType::Date => "Date",
            FieldType::Textarea => "Textarea",
            FieldType::Select => "Select",
        }
    }

    /// Whether a wildcard format mask may be attached to this type.
    pub fn accepts_format(self) -> bool {
        !matches!(
            self,
            FieldType::Select | FieldType::Date | FieldType::Textarea
        )
    }

    /// Select widgets never show a placeholder.
    pub fn accepts_placeholder(self) -> bool {
        self != FieldType::Select
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// Returned when a type name is outside the supported enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

/// A single canonical field definition within a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Stable slug, unique within the form, matches `[a-z0-9_]+`.
    pub id: String,

    pub label: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Wildcard mask as typed by the operator (e.g. "XXX-AA").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Regex compiled from `format`; present iff `format` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Select choices, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Select value applied when the submitter leaves the field blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FieldDefinition {
    pub fn new(id: &str, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: field_type.title().into(),
            field_type,
            required: false,
            placeholder: None,
            format: None,
            pattern: None,
            options: Vec::new(),
            default: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Attach a mask together with its already-compiled pattern.
    pub fn mask(mut self, format: &str, pattern: &str) -> Self {
        self.format = Some(format.into());
        self.pattern = Some(pattern.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Form color theme. Colors are `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub key: String,
    pub name: String,
    pub brand: String,
    pub ok: String,
    pub ink: String,
    pub muted: String,
    pub ring: String,
    pub soft: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            key: "sea".to_string(),
            name: "Sea Blue".to_string(),
            brand: "#0ea5e9".to_string(),
            ok: "#16a34a".to_string(),
            ink: "#0b1320".to_string(),
            muted: "#64748b".to_string(),
            ring: "#e5e7eb".to_string(),
            soft: "#f6f8fb".to_string(),
        }
    }
}

/// A published form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Public identifier, used in URLs and as the submissions' owner key.
    pub slug: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub theme: Theme,

    /// Field definitions in declaration order.
    pub fields: Vec<FieldDefinition>,

    /// Suspended forms are not accepting submissions.
    #[serde(default)]
    pub suspended: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Look up a field definition by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Whether the form declares a field with this id.
    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }
}

/// One set of values collected through a form.
///
/// Values are always strings regardless of the declared field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier (UUIDv7, time-sortable).
    pub id: Uuid,

    /// Slug of the owning form.
    pub slug: String,

    pub created_at: DateTime<Utc>,

    /// Field id to stored value.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Submission {
    pub fn new(slug: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            slug: slug.into(),
            created_at,
            fields: BTreeMap::new(),
        }
    }

    /// Stored value for a field, or `""` when absent.
    pub fn value(&self, field_id: &str) -> &str {
        self.fields.get(field_id).map(String::as_str).unwrap_or("")
    }

    pub fn with_value(mut self, field_id: &str, value: &str) -> Self {
        self.fields.insert(field_id.into(), value.into());
        self
    }
}
