//! Integration tests for path addressing over decoded schemas.

use serde_json::json;
use verdict::keywords::{If, Then};
use verdict::{resolve, Addressable, Schema, SchemaPointer, ToJsonSchema};

fn pointer(text: &str) -> SchemaPointer {
    SchemaPointer::parse(text).unwrap()
}

fn sample() -> Schema {
    Schema::from_value(&json!({
        "title": "Sample",
        "if": {"properties": {"foo": {"type": "string"}}},
        "then": {"required": ["foo"], "properties": {"foo": {"minLength": 2}}},
        "else": true,
        "allOf": [{"minProperties": 1}, {"maxProperties": 5}],
        "$defs": {"name": {"pattern": "^[a-z]+$"}}
    }))
    .unwrap()
}

#[test]
fn test_walk_into_if_probe() {
    let schema = sample();
    let foo = resolve(&schema, &pointer("#/if/properties/foo")).unwrap();
    assert_eq!(foo.to_json_schema(), json!({"type": "string"}));
    assert!(foo.as_schema().is_some());
}

#[test]
fn test_walk_into_then_branch() {
    let schema = sample();
    let min_length = schema
        .resolve(&pointer("#/then/properties/foo/minLength"))
        .unwrap();
    assert!(min_length.as_keyword().is_some());
    assert_eq!(min_length.to_json_schema(), json!(2));
}

#[test]
fn test_root_children_skip_unknown_members() {
    let schema = sample();
    let names: Vec<_> = schema.children().into_keys().collect();
    assert_eq!(names, vec!["if", "then", "else", "allOf", "$defs"]);
    assert!(schema.property_at("title").is_none());
}

#[test]
fn test_conditional_children_are_delegated() {
    let schema = sample();

    let if_children: Vec<_> = schema.property_at("if").unwrap().children().into_keys().collect();
    assert_eq!(if_children, vec!["properties"]);

    let then_children: Vec<_> = schema
        .property_at("then")
        .unwrap()
        .children()
        .into_keys()
        .collect();
    assert_eq!(then_children, vec!["required", "properties"]);

    // `else: true` has nothing below it.
    assert!(schema.property_at("else").unwrap().children().is_empty());
}

#[test]
fn test_list_and_map_children() {
    let schema = sample();

    let all_of: Vec<_> = schema.property_at("allOf").unwrap().children().into_keys().collect();
    assert_eq!(all_of, vec!["0", "1"]);
    assert!(schema.resolve(&pointer("#/allOf/1/maxProperties")).is_some());
    assert!(schema.resolve(&pointer("#/allOf/2")).is_none());
    assert!(schema.resolve(&pointer("#/allOf/x")).is_none());

    let name = schema.resolve(&pointer("#/$defs/name")).unwrap();
    assert_eq!(name.to_json_schema(), json!({"pattern": "^[a-z]+$"}));
}

#[test]
fn test_missing_paths() {
    let schema = sample();
    assert!(schema.resolve(&pointer("#/nope")).is_none());
    assert!(schema.resolve(&pointer("#/if/properties/bar")).is_none());
    assert!(schema.resolve(&pointer("#/then/required/0")).is_none());
    assert!(schema.resolve(&pointer("#/else/anything")).is_none());
}

#[test]
fn test_boolean_schema_has_no_children() {
    let schema = Schema::from(false);
    assert!(schema.children().is_empty());
    assert!(schema.property_at("if").is_none());
    assert!(resolve(&schema, &SchemaPointer::root()).is_some());
}

#[test]
fn test_typed_access_through_addressing() {
    let schema = sample();

    let node = schema.property_at("if").unwrap();
    let probe = node
        .as_keyword()
        .and_then(|keyword| keyword.as_any().downcast_ref::<If>())
        .unwrap();
    assert!(probe.probe().as_object().is_some());

    let then = schema.as_object().unwrap().keyword_as::<Then>("then");
    assert!(then.is_some());
}

#[test]
fn test_addressable_views() {
    let schema = sample();
    let root = Addressable::Schema(&schema);

    assert!(root.as_keyword().is_none());
    let then = root.property_at("then").unwrap();
    assert!(then.as_schema().is_some());

    let required = then.property_at("required").unwrap();
    assert!(required.as_schema().is_none());
    assert_eq!(required.to_json_schema(), json!(["foo"]));
}

#[test]
fn test_failure_locations_resolve() {
    let schema = sample();
    let errors = schema.validate(&json!({"foo": "x"})).into_result().unwrap_err();

    for error in errors.iter() {
        let node = schema.resolve(&error.keyword_location);
        assert!(node.is_some(), "{} does not resolve", error.keyword_location);
    }
    assert_eq!(
        errors.first().keyword_location.to_string(),
        "#/then/properties/foo/minLength"
    );
}
