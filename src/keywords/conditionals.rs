//! The conditional applicators: `if`, `then` and `else`.
//!
//! `if` is a router. It evaluates its probe schema, throws the probe's
//! failures away, and hands the instance to the sibling `then` (probe passed)
//! or `else` (probe failed) of the same schema object. `if` never fails on its
//! own; only the selected branch can.
//!
//! `then` and `else` are passive. Validated directly they always succeed, so
//! they have no effect unless an `if` sits next to them.
//!
//! # Example
//!
//! ```rust
//! use verdict::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "if": {"properties": {"country": {"const": "US"}}},
//!     "then": {"properties": {"postal_code": {"pattern": "^[0-9]{5}$"}}},
//!     "else": {"properties": {"postal_code": {"minLength": 1}}}
//! }))
//! .unwrap();
//!
//! assert!(schema.is_valid(&json!({"country": "US", "postal_code": "20500"})));
//! assert!(!schema.is_valid(&json!({"country": "US", "postal_code": "K1A"})));
//! assert!(schema.is_valid(&json!({"country": "CA", "postal_code": "K1A"})));
//! ```

use std::any::Any;

use serde_json::Value;
use stillwater::Validation;

use crate::address::{Addressable, Children};
use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::{DecodeContext, Keyword, Schema};
use crate::validation::Scope;

/// The `if` keyword: a probe schema that selects `then` or `else`.
pub struct If(Schema);

/// The `then` keyword: applied only when a sibling `if` probe passes.
pub struct Then(Schema);

/// The `else` keyword: applied only when a sibling `if` probe fails.
pub struct Else(Schema);

impl If {
    /// Wraps a probe schema.
    pub fn new(probe: Schema) -> Self {
        Self(probe)
    }

    /// The probe schema.
    pub fn probe(&self) -> &Schema {
        &self.0
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema(raw)?)))
    }
}

impl Then {
    /// Wraps a branch schema.
    pub fn new(schema: Schema) -> Self {
        Self(schema)
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema(raw)?)))
    }
}

impl Else {
    /// Wraps a branch schema.
    pub fn new(schema: Schema) -> Self {
        Self(schema)
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema(raw)?)))
    }
}

impl Keyword for If {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let probe_passed = scope
            .apply(&self.0, value, scope.instance_path(), &scope.keyword_location())
            .is_success();

        let (branch_name, branch) = if probe_passed {
            ("then", scope.sibling::<Then>("then").map(|then| &then.0))
        } else {
            ("else", scope.sibling::<Else>("else").map(|otherwise| &otherwise.0))
        };

        tracing::trace!(
            location = %scope.keyword_location(),
            instance = %scope.instance_path(),
            probe_passed,
            branch = ?branch.map(|_| branch_name),
            "conditional branch selected"
        );

        match branch {
            Some(schema) => scope.apply(
                schema,
                value,
                scope.instance_path(),
                &scope.sibling_location(branch_name),
            ),
            None => Validation::Success(()),
        }
    }

    fn children(&self) -> Children<'_> {
        self.0.children()
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.0.property_at(name)
    }

    fn subschema(&self) -> Option<&Schema> {
        Some(&self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Keyword for Then {
    fn validate(&self, _value: &Value, _scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        Validation::Success(())
    }

    fn children(&self) -> Children<'_> {
        self.0.children()
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.0.property_at(name)
    }

    fn subschema(&self) -> Option<&Schema> {
        Some(&self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Keyword for Else {
    fn validate(&self, _value: &Value, _scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        Validation::Success(())
    }

    fn children(&self) -> Children<'_> {
        self.0.children()
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.0.property_at(name)
    }

    fn subschema(&self) -> Option<&Schema> {
        Some(&self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for If {
    fn to_json_schema(&self) -> Value {
        self.0.to_json_schema()
    }
}

impl ToJsonSchema for Then {
    fn to_json_schema(&self) -> Value {
        self.0.to_json_schema()
    }
}

impl ToJsonSchema for Else {
    fn to_json_schema(&self) -> Value {
        self.0.to_json_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    fn decode(document: Value) -> Schema {
        Schema::from_value(&document).unwrap()
    }

    #[test]
    fn test_then_alone_is_inert() {
        let schema = decode(json!({"then": false}));
        assert!(schema.is_valid(&json!(1)));
        assert!(schema.is_valid(&json!("anything")));
    }

    #[test]
    fn test_else_alone_is_inert() {
        let schema = decode(json!({"else": false}));
        assert!(schema.is_valid(&json!(null)));
    }

    #[test]
    fn test_if_alone_never_fails() {
        let schema = decode(json!({"if": false}));
        assert!(schema.is_valid(&json!(1)));

        let schema = decode(json!({"if": {"type": "string"}}));
        assert!(schema.is_valid(&json!(1)));
        assert!(schema.is_valid(&json!("a")));
    }

    #[test]
    fn test_probe_pass_selects_then() {
        let schema = decode(json!({"if": true, "then": false, "else": true}));
        let errors = unwrap_failure(schema.validate(&json!(1)));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().code, "false_schema");
        assert_eq!(errors.first().keyword_location.to_string(), "#/then");
    }

    #[test]
    fn test_probe_fail_selects_else() {
        let schema = decode(json!({"if": false, "then": true, "else": false}));
        let errors = unwrap_failure(schema.validate(&json!(1)));
        assert_eq!(errors.first().keyword_location.to_string(), "#/else");
    }

    #[test]
    fn test_probe_pass_without_then() {
        let schema = decode(json!({"if": true, "else": false}));
        assert!(schema.is_valid(&json!(1)));
    }

    #[test]
    fn test_probe_fail_without_else() {
        let schema = decode(json!({"if": false, "then": false}));
        assert!(schema.is_valid(&json!(1)));
    }

    #[test]
    fn test_probe_failures_are_not_reported() {
        let schema = decode(json!({
            "if": {"type": "string", "minLength": 10},
            "else": {"type": ["string", "number"]}
        }));
        let result = schema.validate(&json!("short"));
        assert!(result.is_success());

        let errors = unwrap_failure(schema.validate(&json!(null)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().keyword_location.to_string(), "#/else/type");
    }

    #[test]
    fn test_branch_failure_locations() {
        let schema = decode(json!({
            "if": {"type": "string"},
            "then": {"minLength": 3},
            "else": {"type": "number"}
        }));

        let errors = unwrap_failure(schema.validate(&json!("hi")));
        let error = errors.first();
        assert_eq!(error.keyword.as_deref(), Some("minLength"));
        assert_eq!(error.keyword_location.to_string(), "#/then/minLength");
        assert!(error.path.is_root());
    }

    #[test]
    fn test_nested_conditional_locations() {
        let schema = decode(json!({
            "properties": {
                "age": {
                    "if": {"minimum": 18},
                    "then": {"maximum": 130}
                }
            }
        }));

        let errors = unwrap_failure(schema.validate(&json!({"age": 200})));
        let error = errors.first();
        assert_eq!(error.path.to_string(), "age");
        assert_eq!(
            error.keyword_location.to_string(),
            "#/properties/age/then/maximum"
        );
    }

    #[test]
    fn test_decode_rejects_non_schema() {
        for keyword in ["if", "then", "else"] {
            let error = Schema::from_value(&json!({ keyword: 5 })).unwrap_err();
            assert!(matches!(error, DecodeError::InvalidSchema { got: "number", .. }));
            assert_eq!(error.location().unwrap().to_string(), format!("#/{}", keyword));
        }
    }

    #[test]
    fn test_children_delegate_to_wrapped_schema() {
        let schema = decode(json!({
            "if": {"properties": {"foo": true}},
            "then": {"required": ["foo"]},
            "else": true
        }));
        let object = schema.as_object().unwrap();

        let if_names: Vec<_> = object.keyword("if").unwrap().children().into_keys().collect();
        assert_eq!(if_names, vec!["properties"]);

        let then_names: Vec<_> = object.keyword("then").unwrap().children().into_keys().collect();
        assert_eq!(then_names, vec!["required"]);

        assert!(object.keyword("else").unwrap().children().is_empty());
    }

    #[test]
    fn test_direct_construction() {
        let probe = If::new(Schema::from(true));
        assert!(matches!(probe.probe(), Schema::Bool(true)));
        assert_eq!(Then::new(Schema::from(false)).to_json_schema(), json!(false));
        assert_eq!(Else::new(Schema::from(true)).to_json_schema(), json!(true));
    }
}
