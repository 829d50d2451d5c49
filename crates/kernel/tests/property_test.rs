#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests for the sanitizer, mask compiler and validator.

use formsmith_kernel::error::{FieldError, SchemaError};
use formsmith_kernel::schema::{coerce_options, compile_format, sanitize_fields};
use formsmith_kernel::validate::{PatternCheck, check_pattern, validate_value};
use formsmith_sdk::limits::{MAX_FIELDS, MAX_LABEL_LEN};
use formsmith_sdk::types::{FieldDefinition, FieldType};
use formsmith_test_utils::{raw_field, raw_fields};
use proptest::prelude::*;
use serde_json::json;

fn field_type() -> impl Strategy<Value = FieldType> {
    prop::sample::select(FieldType::ALL.to_vec())
}

fn maskable_type() -> impl Strategy<Value = FieldType> {
    prop::sample::select(vec![
        FieldType::Text,
        FieldType::Number,
        FieldType::Email,
        FieldType::Tel,
    ])
}

fn label() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[A-Za-z][A-Za-z0-9 ]{0,30}").expect("Valid regex for labels")
}

/// Labels that run past the stored label cap, sometimes cut at a space.
fn long_label() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[A-Za-z][A-Za-z0-9 ]{80,100}").expect("Valid regex for long labels")
}

/// A raw entry with a short or an over-long label.
fn any_label() -> impl Strategy<Value = String> {
    prop_oneof![3 => label(), 1 => long_label()]
}

/// A raw entry that always survives sanitizing.
fn raw_entry() -> impl Strategy<Value = (FieldType, String, bool)> {
    (field_type(), any_label(), any::<bool>())
}

fn build_raw(entries: &[(FieldType, String, bool)]) -> serde_json::Value {
    raw_fields(entries.iter().map(|(ty, label, required)| {
        let mut raw = raw_field(ty.as_str(), label).format("XXX-AA");
        if *ty == FieldType::Select {
            raw = raw.options(&["One", "Two"]);
        }
        if *required { raw.required() } else { raw }
    }))
}

proptest! {
    /// Property: oversized field lists are rejected as a whole
    #[test]
    fn prop_too_many_fields_rejected(extra in 1usize..20) {
        let raw = raw_fields((0..MAX_FIELDS + extra).map(|i| raw_field("text", &format!("F{i}"))));
        prop_assert_eq!(sanitize_fields(&raw), Err(SchemaError::TooManyFields { max: MAX_FIELDS }));
    }

    /// Property: sanitizing canonical output again keeps ids and patterns
    #[test]
    fn prop_resanitize_is_stable(entries in prop::collection::vec(raw_entry(), 1..12)) {
        let first = sanitize_fields(&build_raw(&entries)).unwrap();
        let second = sanitize_fields(&serde_json::to_value(&first).unwrap()).unwrap();

        let ids = |fields: &[FieldDefinition]| fields.iter().map(|f| f.id.clone()).collect::<Vec<_>>();
        let patterns = |fields: &[FieldDefinition]| fields.iter().map(|f| f.pattern.clone()).collect::<Vec<_>>();
        prop_assert_eq!(ids(&first), ids(&second));
        prop_assert_eq!(patterns(&first), patterns(&second));
    }

    /// Property: ids derived from over-long labels are stable across passes
    #[test]
    fn prop_long_label_id_stable(name in long_label()) {
        let first = sanitize_fields(&raw_fields([raw_field("text", &name)])).unwrap();
        prop_assert!(first[0].label.chars().count() <= MAX_LABEL_LEN);

        let second = sanitize_fields(&serde_json::to_value(&first).unwrap()).unwrap();
        prop_assert_eq!(&first[0].id, &second[0].id);
        prop_assert_eq!(&first[0].label, &second[0].label);
    }

    /// Property: ids within one schema are unique
    #[test]
    fn prop_ids_unique(entries in prop::collection::vec(raw_entry(), 1..20)) {
        let fields = sanitize_fields(&build_raw(&entries)).unwrap();
        let mut ids: Vec<_> = fields.iter().map(|f| f.id.as_str()).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }

    /// Property: optional fields accept blank input whatever the type or mask
    #[test]
    fn prop_optional_blank_passes(ty in field_type(), blank in "[ \t]{0,4}") {
        let field = FieldDefinition::new("f", ty)
            .options(["One"])
            .mask("XXX", &compile_format("XXX"));
        prop_assert!(validate_value(&field, Some(&blank)).is_ok());
        prop_assert!(validate_value(&field, None).is_ok());
    }

    /// Property: required fields reject blank input naming the label
    #[test]
    fn prop_required_blank_fails(ty in field_type(), name in label()) {
        let name = name.trim().to_string();
        prop_assume!(!name.is_empty());
        let field = FieldDefinition::new("f", ty).label(&name).required();
        let err = validate_value(&field, Some("")).unwrap_err();
        let is_missing = matches!(err, FieldError::Missing { .. });
        prop_assert!(is_missing);
        prop_assert_eq!(err.to_string(), format!("Missing required field: {name}"));
    }

    /// Property: a digit/letter mask accepts exactly matching input
    #[test]
    fn prop_mask_accepts_matching(ty in maskable_type(), digits in "[0-9]{3}", letters in "[A-Za-z]{2}") {
        let pattern = compile_format("XXX-AA");
        let value = format!("{digits}-{letters}");
        prop_assert_eq!(check_pattern(&pattern, &value), PatternCheck::Matched);

        let field = FieldDefinition::new("f", ty).mask("XXX-AA", &pattern);
        if ty == FieldType::Text {
            prop_assert!(validate_value(&field, Some(&value)).is_ok());
        }
    }

    /// Property: literal characters in a format must appear verbatim
    #[test]
    fn prop_mask_literals_escaped(literal in "[.+?()\\[\\]{}|^$#-]{1,3}") {
        let format = format!("X{literal}X");
        let pattern = compile_format(&format);
        prop_assert_eq!(check_pattern(&pattern, &format!("1{literal}2")), PatternCheck::Matched);
        prop_assert_ne!(check_pattern(&pattern, "12"), PatternCheck::Matched);
    }
}

#[test]
fn test_mask_examples() {
    let pattern = compile_format("XXX-AA");
    assert_eq!(check_pattern(&pattern, "123-ab"), PatternCheck::Matched);
    assert_eq!(check_pattern(&pattern, "1234-ab"), PatternCheck::Mismatched);
    assert_eq!(check_pattern(&pattern, "123-a1"), PatternCheck::Mismatched);
}

#[test]
fn test_option_coercion_example() {
    assert_eq!(coerce_options(&json!("A, B,, a")), vec!["A", "B"]);
}

#[test]
fn test_email_examples() {
    let field = FieldDefinition::new("email", FieldType::Email).label("Email");
    assert!(validate_value(&field, Some("a@b.co")).is_ok());
    assert!(validate_value(&field, Some("a@b")).is_err());
    assert!(validate_value(&field, Some("a b@c.com")).is_err());
}

#[test]
fn test_unusable_stored_pattern_is_skipped() {
    let field = FieldDefinition::new("code", FieldType::Text).mask("X", "([unclosed");
    assert!(validate_value(&field, Some("anything")).is_ok());
}
