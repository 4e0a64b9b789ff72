//! Boolean-logic applicators: `allOf`, `anyOf`, `oneOf` and `not`.
//!
//! Each subschema is applied to the same instance value:
//! - `allOf`: every subschema must match; failures from all of them accumulate
//! - `anyOf`: at least one must match; stops at the first match
//! - `oneOf`: exactly one must match
//! - `not`: the subschema must not match
//!
//! # Example
//!
//! ```rust
//! use verdict::Schema;
//! use serde_json::json;
//!
//! // An identifier is either a non-empty string or a positive integer.
//! let id = Schema::from_value(&json!({
//!     "anyOf": [
//!         {"type": "string", "minLength": 1},
//!         {"type": "integer", "exclusiveMinimum": 0}
//!     ]
//! }))
//! .unwrap();
//!
//! assert!(id.is_valid(&json!("abc")));
//! assert!(id.is_valid(&json!(7)));
//! assert!(!id.is_valid(&json!(0)));
//! ```

use std::any::Any;

use serde_json::Value;
use stillwater::Validation;

use crate::address::{Addressable, Children};
use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::{DecodeContext, Keyword, Schema};
use crate::validation::{self, Scope};

/// Which combination rule a [`SchemaList`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every schema must match.
    AllOf,
    /// At least one schema must match.
    AnyOf,
    /// Exactly one schema must match.
    OneOf,
}

/// `allOf`, `anyOf` or `oneOf`: a non-empty list of schemas, addressed by
/// position.
pub struct SchemaList {
    combinator: Combinator,
    schemas: Vec<Schema>,
}

impl SchemaList {
    /// The combination rule.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// The subschemas in document order.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub(crate) fn decode(
        combinator: Combinator,
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self {
            combinator,
            schemas: ctx.schema_list(raw)?,
        }))
    }

    fn validate_all_of(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let mut errors = Vec::new();
        for (i, schema) in self.schemas.iter().enumerate() {
            validation::collect_into(&mut errors, scope.apply_below(schema, value, i.to_string()));
        }
        validation::from_errors(errors)
    }

    fn validate_any_of(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        for (i, schema) in self.schemas.iter().enumerate() {
            if scope.apply_below(schema, value, i.to_string()).is_success() {
                return Validation::Success(());
            }
        }

        validation::fail(
            scope
                .error(format!(
                    "value did not match any of {} schemas",
                    self.schemas.len()
                ))
                .with_code("any_of_none_matched"),
        )
    }

    fn validate_one_of(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let matched: Vec<usize> = self
            .schemas
            .iter()
            .enumerate()
            .filter(|(i, schema)| scope.apply_below(schema, value, i.to_string()).is_success())
            .map(|(i, _)| i)
            .collect();

        match matched.len() {
            1 => Validation::Success(()),
            0 => validation::fail(
                scope
                    .error(format!(
                        "value did not match any of {} schemas",
                        self.schemas.len()
                    ))
                    .with_code("one_of_none_matched"),
            ),
            n => validation::fail(
                scope
                    .error(format!(
                        "value matched {} schemas (indices {:?}), expected exactly one",
                        n, matched
                    ))
                    .with_code("one_of_multiple_matched"),
            ),
        }
    }
}

impl Keyword for SchemaList {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        match self.combinator {
            Combinator::AllOf => self.validate_all_of(value, scope),
            Combinator::AnyOf => self.validate_any_of(value, scope),
            Combinator::OneOf => self.validate_one_of(value, scope),
        }
    }

    fn children(&self) -> Children<'_> {
        self.schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| (i.to_string(), Addressable::Schema(schema)))
            .collect()
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        let index: usize = name.parse().ok()?;
        self.schemas.get(index).map(Addressable::Schema)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for SchemaList {
    fn to_json_schema(&self) -> Value {
        Value::Array(self.schemas.iter().map(Schema::to_json_schema).collect())
    }
}

/// The `not` keyword.
pub struct Not(Schema);

impl Not {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema(raw)?)))
    }
}

impl Keyword for Not {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let matched = scope
            .apply(&self.0, value, scope.instance_path(), &scope.keyword_location())
            .is_success();
        if matched {
            validation::fail(
                scope
                    .error("value must not match the schema")
                    .with_code("not")
                    .with_got(value.to_string()),
            )
        } else {
            Validation::Success(())
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

impl ToJsonSchema for Not {
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

    #[test]
    fn test_all_of_accumulates() {
        let schema = Schema::from_value(&json!({
            "allOf": [{"type": "string"}, {"minLength": 2}, {"maxLength": 0}]
        }))
        .unwrap();

        assert!(!schema.is_valid(&json!("")));
        let errors = unwrap_failure(schema.validate(&json!("abc")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().keyword_location.to_string(), "#/allOf/2/maxLength");

        let errors = unwrap_failure(schema.validate(&json!(5)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().code, "invalid_type");
    }

    #[test]
    fn test_any_of() {
        let schema = Schema::from_value(&json!({
            "anyOf": [{"type": "string"}, {"type": "integer"}]
        }))
        .unwrap();

        assert!(schema.is_valid(&json!("a")));
        assert!(schema.is_valid(&json!(1)));
        let errors = unwrap_failure(schema.validate(&json!(null)));
        assert_eq!(errors.first().code, "any_of_none_matched");
        assert!(errors.first().message.contains("any of 2 schemas"));
    }

    #[test]
    fn test_one_of() {
        let schema = Schema::from_value(&json!({
            "oneOf": [{"type": "integer"}, {"minimum": 2}]
        }))
        .unwrap();

        assert!(schema.is_valid(&json!(1)));
        assert!(schema.is_valid(&json!(2.5)));

        let errors = unwrap_failure(schema.validate(&json!(3)));
        assert_eq!(errors.first().code, "one_of_multiple_matched");
        assert!(errors.first().message.contains("[0, 1]"));

        let errors = unwrap_failure(schema.validate(&json!(1.5)));
        assert_eq!(errors.first().code, "one_of_none_matched");
    }

    #[test]
    fn test_not() {
        let schema = Schema::from_value(&json!({"not": {"type": "null"}})).unwrap();
        assert!(schema.is_valid(&json!(0)));
        let errors = unwrap_failure(schema.validate(&json!(null)));
        assert_eq!(errors.first().code, "not");
        assert_eq!(errors.first().keyword_location.to_string(), "#/not");
    }

    #[test]
    fn test_list_decode_errors() {
        assert!(Schema::from_value(&json!({"allOf": []})).is_err());
        assert!(Schema::from_value(&json!({"anyOf": {}})).is_err());
        let error = Schema::from_value(&json!({"oneOf": [true, 3]})).unwrap_err();
        assert_eq!(error.location().unwrap().to_string(), "#/oneOf/1");
    }

    #[test]
    fn test_list_addressing() {
        let schema = Schema::from_value(&json!({"allOf": [true, {"minimum": 1}]})).unwrap();
        let all_of = schema.property_at("allOf").unwrap();

        let names: Vec<_> = all_of.children().into_keys().collect();
        assert_eq!(names, vec!["0", "1"]);
        assert!(all_of.property_at("1").is_some());
        assert!(all_of.property_at("2").is_none());
        assert!(all_of.property_at("x").is_none());
    }
}
