//! Tests for document-local references, recursive schemas and depth tracking.

use serde_json::json;
use verdict::{Schema, ValidationOptions};

fn comment_schema() -> Schema {
    Schema::from_value(&json!({
        "$defs": {
            "comment": {
                "type": "object",
                "properties": {
                    "text": {"type": "string", "minLength": 1},
                    "replies": {"type": "array", "items": {"$ref": "#/$defs/comment"}}
                },
                "required": ["text"]
            }
        },
        "$ref": "#/$defs/comment"
    }))
    .unwrap()
}

#[test]
fn test_self_referencing_schema() {
    let schema = comment_schema();

    let result = schema.validate(&json!({
        "text": "Top comment",
        "replies": [
            {"text": "Reply 1"},
            {
                "text": "Reply 2",
                "replies": [{"text": "Nested reply"}]
            }
        ]
    }));
    assert!(result.is_success());
}

#[test]
fn test_recursive_failures_are_addressed() {
    let schema = comment_schema();

    let errors = schema
        .validate(&json!({
            "text": "Top",
            "replies": [
                {"text": "ok"},
                {"text": "", "replies": [{"body": "wrong field"}]}
            ]
        }))
        .into_result()
        .unwrap_err();

    assert_eq!(errors.len(), 2);

    let empty = errors.with_code("min_length");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].path.to_string(), "replies[1].text");
    assert_eq!(
        empty[0].keyword_location.to_string(),
        "#/$defs/comment/properties/text/minLength"
    );

    let missing = errors.with_code("required");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].path.to_string(), "replies[1].replies[0].text");
}

#[test]
fn test_depth_limit_is_configurable() {
    let schema = Schema::from_value(&json!({
        "type": "object",
        "properties": {"child": {"$ref": "#"}}
    }))
    .unwrap();

    let mut instance = json!({});
    for _ in 0..10 {
        instance = json!({"child": instance});
    }

    assert!(schema.validate(&instance).is_success());

    let shallow = ValidationOptions::default().with_max_depth(4);
    let errors = schema
        .validate_with(&instance, &shallow)
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "max_depth_exceeded");
    assert_eq!(errors.first().path.to_string(), "child.child.child.child.child");
}

#[test]
fn test_cycles_without_progress_fail_fast() {
    let schema = Schema::from_value(&json!({
        "$defs": {
            "a": {"$ref": "#/$defs/b"},
            "b": {"allOf": [{"$ref": "#/$defs/a"}]}
        },
        "$ref": "#/$defs/a"
    }))
    .unwrap();

    let errors = schema.validate(&json!(1)).into_result().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "circular_reference");
}

#[test]
fn test_reference_inside_conditional() {
    let schema = Schema::from_value(&json!({
        "$defs": {
            "zip": {"type": "string", "pattern": "^[0-9]{5}$"},
            "postcode": {"type": "string", "minLength": 3}
        },
        "properties": {
            "country": {"enum": ["US", "CA"]},
            "code": true
        },
        "if": {"properties": {"country": {"const": "US"}}},
        "then": {"properties": {"code": {"$ref": "#/$defs/zip"}}},
        "else": {"properties": {"code": {"$ref": "#/$defs/postcode"}}}
    }))
    .unwrap();

    assert!(schema.is_valid(&json!({"country": "US", "code": "20500"})));
    assert!(schema.is_valid(&json!({"country": "CA", "code": "K1A 0B1"})));

    let errors = schema
        .validate(&json!({"country": "US", "code": "K1A"}))
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().keyword_location.to_string(), "#/$defs/zip/pattern");
    assert_eq!(errors.first().path.to_string(), "code");
}

#[test]
fn test_reference_into_conditional_probe() {
    let schema = Schema::from_value(&json!({
        "if": {"properties": {"kind": {"const": "a"}}},
        "properties": {"alias": {"$ref": "#/if/properties/kind"}}
    }))
    .unwrap();

    assert!(schema.is_valid(&json!({"alias": "a"})));
    assert!(!schema.is_valid(&json!({"alias": "b"})));
}

#[test]
fn test_unresolved_reference_reports_instead_of_panicking() {
    let schema = Schema::from_value(&json!({
        "properties": {"a": {"$ref": "#/$defs/nothing"}}
    }))
    .unwrap();

    assert!(schema.is_valid(&json!({})));
    let errors = schema.validate(&json!({"a": 1})).into_result().unwrap_err();
    assert_eq!(errors.first().code, "unresolved_reference");
    assert_eq!(errors.first().keyword_location.to_string(), "#/properties/a/$ref");
}

#[test]
fn test_reference_to_keyword_without_schema_is_unresolved() {
    let schema = Schema::from_value(&json!({
        "required": ["a"],
        "$ref": "#/required"
    }))
    .unwrap();

    let errors = schema.validate(&json!({"a": 1})).into_result().unwrap_err();
    assert_eq!(errors.first().code, "unresolved_reference");
}
