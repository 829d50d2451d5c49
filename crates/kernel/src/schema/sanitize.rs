//! Field schema sanitizer.
//!
//! Turns an operator-authored field list into the canonical schema. The
//! sanitizer is lenient per entry: malformed entries and unknown types are
//! dropped. Only three conditions reject the whole batch: too many entries,
//! a select field without options, and nothing surviving at all.

use std::collections::HashSet;

use formsmith_sdk::limits::{MAX_FIELDS, MAX_FORMAT_LEN, MAX_LABEL_LEN, MAX_PLACEHOLDER_LEN};
use formsmith_sdk::types::{FieldDefinition, FieldType};
use serde_json::{Map, Value};
use tracing::debug;

use super::mask::compile_format;
use super::options::coerce_options;
use super::truncate_chars;
use crate::error::SchemaError;

/// Sanitize a raw field list into canonical field definitions.
///
/// A payload that is not a JSON array is treated as an empty list.
pub fn sanitize_fields(raw: &Value) -> Result<Vec<FieldDefinition>, SchemaError> {
    let entries: &[Value] = match raw {
        Value::Array(items) => items,
        _ => &[],
    };

    if entries.len() > MAX_FIELDS {
        return Err(SchemaError::TooManyFields { max: MAX_FIELDS });
    }

    let mut fields = Vec::with_capacity(entries.len());
    let mut taken_ids = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            debug!(index, "dropping field entry that is not an object");
            continue;
        };
        let Some(field_type) = parse_type(obj) else {
            debug!(index, "dropping field entry with unknown type");
            continue;
        };

        let mut field = sanitize_entry(obj, field_type)?;
        field.id = claim_id(&mut taken_ids, &field.id);
        fields.push(field);
    }

    if fields.is_empty() {
        return Err(SchemaError::NoFields);
    }
    Ok(fields)
}

/// Derive a field id from its raw label, falling back to the type name.
///
/// Lowercases, collapses whitespace runs to `_`, and strips everything
/// outside `[a-z0-9_]`.
pub fn derive_field_id(raw_label: Option<&str>, field_type: FieldType) -> String {
    let source = raw_label
        .filter(|l| !l.is_empty())
        .unwrap_or(field_type.as_str())
        .trim()
        .to_lowercase();

    let mut id = String::with_capacity(source.len());
    let mut in_whitespace = false;
    for c in source.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            id.push(c);
        }
    }

    if id.is_empty() {
        field_type.as_str().to_string()
    } else {
        id
    }
}

fn parse_type(obj: &Map<String, Value>) -> Option<FieldType> {
    obj.get("type")?.as_str()?.trim().parse().ok()
}

fn sanitize_entry(
    obj: &Map<String, Value>,
    field_type: FieldType,
) -> Result<FieldDefinition, SchemaError> {
    let raw_label = obj.get("label").and_then(Value::as_str);

    let capped = truncate_chars(raw_label.unwrap_or("").trim(), MAX_LABEL_LEN);
    let capped = capped.trim_end();

    // The id comes from the stored label so a stored schema re-derives it.
    let id = derive_field_id(Some(capped), field_type);
    let mut field = FieldDefinition::new(&id, field_type);
    if !capped.is_empty() {
        field.label = capped.to_string();
    }
    field.required = obj.get("required").is_some_and(truthy);

    if field_type.accepts_placeholder() {
        field.placeholder = trimmed_text(obj, "placeholder", MAX_PLACEHOLDER_LEN);
    }

    if field_type.accepts_format() {
        if let Some(format) = trimmed_text(obj, "format", MAX_FORMAT_LEN) {
            field.pattern = Some(compile_format(&format));
            field.format = Some(format);
        }
    }

    if field_type == FieldType::Select {
        let raw_options = obj
            .get("options")
            .or_else(|| obj.get("options_text"))
            .unwrap_or(&Value::Null);
        let options = coerce_options(raw_options);
        if options.is_empty() {
            return Err(SchemaError::MissingOptions { label: field.label });
        }

        field.default = obj
            .get("default")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty() && options.iter().any(|o| o == d))
            .map(str::to_string);
        field.options = options;
    }

    Ok(field)
}

/// Reserve an id for this pass, suffixing `_2`, `_3`, ... on collision.
fn claim_id(taken: &mut HashSet<String>, base: &str) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn trimmed_text(obj: &Map<String, Value>, key: &str, max: usize) -> Option<String> {
    let text = obj.get(key)?.as_str()?.trim();
    let text = truncate_chars(text, max);
    (!text.is_empty()).then_some(text)
}

/// Loose truthiness for flags coming from untyped clients.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derives_ids_from_labels() {
        assert_eq!(derive_field_id(Some("Full Name"), FieldType::Text), "full_name");
        assert_eq!(
            derive_field_id(Some("  Phone   number (mobile) "), FieldType::Tel),
            "phone_number_mobile"
        );
        assert_eq!(derive_field_id(Some("E-mail!"), FieldType::Email), "email");
        assert_eq!(derive_field_id(Some("¿¿??"), FieldType::Date), "date");
        assert_eq!(derive_field_id(None, FieldType::Number), "number");
        assert_eq!(derive_field_id(Some(""), FieldType::Select), "select");
    }

    #[test]
    fn drops_malformed_entries_and_unknown_types() {
        let fields = sanitize_fields(&json!([
            "not an object",
            {"type": "checkbox", "label": "Agree"},
            {"label": "No type"},
            {"type": 3},
            {"type": " email ", "label": "Email"},
        ]))
        .unwrap();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "email");
        assert_eq!(fields[0].field_type, FieldType::Email);
    }

    #[test]
    fn rejects_too_many_fields() {
        let raw: Vec<Value> = (0..=MAX_FIELDS)
            .map(|i| json!({"type": "text", "label": format!("f{i}")}))
            .collect();
        let err = sanitize_fields(&Value::Array(raw)).unwrap_err();
        assert_eq!(err, SchemaError::TooManyFields { max: MAX_FIELDS });
    }

    #[test]
    fn accepts_exactly_max_fields() {
        let raw: Vec<Value> = (0..MAX_FIELDS)
            .map(|i| json!({"type": "text", "label": format!("f{i}")}))
            .collect();
        assert_eq!(sanitize_fields(&Value::Array(raw)).unwrap().len(), MAX_FIELDS);
    }

    #[test]
    fn rejects_empty_result() {
        assert_eq!(sanitize_fields(&json!([])).unwrap_err(), SchemaError::NoFields);
        assert_eq!(
            sanitize_fields(&json!([{"type": "radio"}])).unwrap_err(),
            SchemaError::NoFields
        );
        assert_eq!(
            sanitize_fields(&json!({"type": "text"})).unwrap_err(),
            SchemaError::NoFields
        );
    }

    #[test]
    fn blank_label_becomes_title_cased_type() {
        let fields = sanitize_fields(&json!([{"type": "textarea", "label": "   "}])).unwrap();
        assert_eq!(fields[0].label, "Textarea");
        assert_eq!(fields[0].id, "textarea");
    }

    #[test]
    fn long_label_id_survives_resanitize() {
        let long = format!("{} tail", "a".repeat(MAX_LABEL_LEN));
        let first = sanitize_fields(&json!([{"type": "text", "label": long}])).unwrap();
        assert_eq!(first[0].label.chars().count(), MAX_LABEL_LEN);
        assert_eq!(first[0].id, "a".repeat(MAX_LABEL_LEN));

        let second = sanitize_fields(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(second[0].id, first[0].id);
        assert_eq!(second[0].label, first[0].label);
    }

    #[test]
    fn label_cut_at_a_space_is_trimmed() {
        let long = format!("{} tail", "b".repeat(MAX_LABEL_LEN - 1));
        let fields = sanitize_fields(&json!([{"type": "text", "label": long}])).unwrap();
        assert_eq!(fields[0].label, "b".repeat(MAX_LABEL_LEN - 1));
        assert_eq!(fields[0].id, "b".repeat(MAX_LABEL_LEN - 1));
    }

    #[test]
    fn required_follows_truthiness() {
        let fields = sanitize_fields(&json!([
            {"type": "text", "label": "a", "required": true},
            {"type": "text", "label": "b", "required": "yes"},
            {"type": "text", "label": "c", "required": 0},
            {"type": "text", "label": "d"},
        ]))
        .unwrap();
        let flags: Vec<bool> = fields.iter().map(|f| f.required).collect();
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn placeholder_dropped_for_select() {
        let fields = sanitize_fields(&json!([
            {"type": "text", "label": "Name", "placeholder": "  Jane Doe "},
            {"type": "select", "label": "Size", "placeholder": "Pick", "options": ["S"]},
        ]))
        .unwrap();
        assert_eq!(fields[0].placeholder.as_deref(), Some("Jane Doe"));
        assert!(fields[1].placeholder.is_none());
    }

    #[test]
    fn format_compiled_only_for_text_like_types() {
        let fields = sanitize_fields(&json!([
            {"type": "tel", "label": "Phone", "format": " XXX-XXXX "},
            {"type": "date", "label": "When", "format": "XX/XX"},
            {"type": "textarea", "label": "Notes", "format": "A*"},
        ]))
        .unwrap();
        assert_eq!(fields[0].format.as_deref(), Some("XXX-XXXX"));
        assert_eq!(
            fields[0].pattern.as_deref(),
            Some(compile_format("XXX-XXXX").as_str())
        );
        assert!(fields[1].format.is_none() && fields[1].pattern.is_none());
        assert!(fields[2].format.is_none() && fields[2].pattern.is_none());
    }

    #[test]
    fn select_without_options_is_fatal() {
        let err = sanitize_fields(&json!([
            {"type": "text", "label": "Name"},
            {"type": "select", "label": "Color", "options": " , ,"},
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingOptions {
                label: "Color".into()
            }
        );
    }

    #[test]
    fn select_reads_options_text_when_options_absent() {
        let fields = sanitize_fields(&json!([
            {"type": "select", "label": "Size", "options_text": "S\nM\nL"},
        ]))
        .unwrap();
        assert_eq!(fields[0].options, vec!["S", "M", "L"]);
    }

    #[test]
    fn select_default_kept_only_when_member() {
        let fields = sanitize_fields(&json!([
            {"type": "select", "label": "A", "options": ["Red", "Blue"], "default": " Red "},
            {"type": "select", "label": "B", "options": ["Red", "Blue"], "default": "Green"},
            {"type": "select", "label": "C", "options": ["Red", "Blue"], "default": "red"},
        ]))
        .unwrap();
        assert_eq!(fields[0].default.as_deref(), Some("Red"));
        assert!(fields[1].default.is_none());
        assert!(fields[2].default.is_none());
    }

    #[test]
    fn duplicate_ids_get_suffixes() {
        let fields = sanitize_fields(&json!([
            {"type": "text", "label": "Name"},
            {"type": "text", "label": "name"},
            {"type": "text", "label": "NAME!"},
        ]))
        .unwrap();
        let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "name_2", "name_3"]);
    }

    #[test]
    fn non_select_fields_never_carry_options() {
        let fields = sanitize_fields(&json!([
            {"type": "text", "label": "Name", "options": ["a"], "default": "a"},
        ]))
        .unwrap();
        assert!(fields[0].options.is_empty());
        assert!(fields[0].default.is_none());
    }

    #[test]
    fn resanitizing_output_is_stable() {
        let first = sanitize_fields(&json!([
            {"type": "text", "label": "Order code", "format": "AA-XXXX", "required": true},
            {"type": "select", "label": "Size", "options": "S, M, s", "default": "M"},
            {"type": "email"},
        ]))
        .unwrap();
        let second = sanitize_fields(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
