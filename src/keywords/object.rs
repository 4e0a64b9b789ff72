//! Object keywords: `properties`, `patternProperties`, `additionalProperties`,
//! `required`, `minProperties`, `maxProperties`.
//!
//! Failures inside member subschemas are reported at the member's instance
//! path (e.g. `user.email`). `additionalProperties` decides which members are
//! "additional" by consulting its sibling `properties` and `patternProperties`
//! keywords in the same schema object.
//!
//! # Example
//!
//! ```rust
//! use verdict::{InstancePath, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "age": {"type": "integer", "minimum": 0}
//!     },
//!     "required": ["name"],
//!     "additionalProperties": false
//! }))
//! .unwrap();
//!
//! assert!(schema.is_valid(&json!({"name": "Alice", "age": 30})));
//!
//! let errors = schema.validate(&json!({"age": -1, "nickname": "A"})).into_result().unwrap_err();
//! assert_eq!(errors.len(), 3);
//! assert_eq!(errors.at_path(&InstancePath::root().push_field("name")).len(), 1);
//! ```

use std::any::Any;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Number, Value};
use stillwater::Validation;

use crate::address::{Addressable, Children};
use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::keywords::string::compile;
use crate::schema::{DecodeContext, Keyword, Schema};
use crate::validation::{self, Scope};
use crate::value::type_name;

/// The `properties` keyword.
pub struct Properties(IndexMap<String, Schema>);

impl Properties {
    /// Returns true if `name` has a declared schema.
    pub fn declares(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema_map(raw)?)))
    }
}

impl Keyword for Properties {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(members) = value.as_object() else {
            return Validation::Success(());
        };

        let mut errors = Vec::new();
        for (name, schema) in &self.0 {
            if let Some(member) = members.get(name) {
                let result = scope.apply(
                    schema,
                    member,
                    &scope.instance_path().push_field(name.as_str()),
                    &scope.keyword_location().push(name.as_str()),
                );
                validation::collect_into(&mut errors, result);
            }
        }
        validation::from_errors(errors)
    }

    fn children(&self) -> Children<'_> {
        schema_children(&self.0)
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.0.get(name).map(Addressable::Schema)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Properties {
    fn to_json_schema(&self) -> Value {
        schema_map_to_value(self.0.iter())
    }
}

/// The `patternProperties` keyword: member-name regexes mapped to schemas.
pub struct PatternProperties(IndexMap<String, (Regex, Schema)>);

impl PatternProperties {
    /// Returns true if any pattern matches `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.0.values().any(|(regex, _)| regex.is_match(name))
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        let schemas = ctx.schema_map(raw)?;
        let mut patterns = IndexMap::with_capacity(schemas.len());
        for (pattern, schema) in schemas {
            let regex = compile(&pattern, &ctx.child(pattern.as_str()))?;
            patterns.insert(pattern, (regex, schema));
        }
        Ok(Box::new(Self(patterns)))
    }
}

impl Keyword for PatternProperties {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(members) = value.as_object() else {
            return Validation::Success(());
        };

        let mut errors = Vec::new();
        for (name, member) in members {
            for (pattern, (regex, schema)) in &self.0 {
                if regex.is_match(name) {
                    let result = scope.apply(
                        schema,
                        member,
                        &scope.instance_path().push_field(name.as_str()),
                        &scope.keyword_location().push(pattern.as_str()),
                    );
                    validation::collect_into(&mut errors, result);
                }
            }
        }
        validation::from_errors(errors)
    }

    fn children(&self) -> Children<'_> {
        self.0
            .iter()
            .map(|(pattern, (_, schema))| (pattern.clone(), Addressable::Schema(schema)))
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for PatternProperties {
    fn to_json_schema(&self) -> Value {
        schema_map_to_value(self.0.iter().map(|(pattern, (_, schema))| (pattern, schema)))
    }
}

/// The `additionalProperties` keyword.
pub struct AdditionalProperties(Schema);

impl AdditionalProperties {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema(raw)?)))
    }
}

impl Keyword for AdditionalProperties {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(members) = value.as_object() else {
            return Validation::Success(());
        };
        let declared = scope.sibling::<Properties>("properties");
        let patterned = scope.sibling::<PatternProperties>("patternProperties");

        let mut errors = Vec::new();
        for (name, member) in members {
            let covered = declared.is_some_and(|p| p.declares(name))
                || patterned.is_some_and(|p| p.matches(name));
            if covered {
                continue;
            }
            let result = scope.apply(
                &self.0,
                member,
                &scope.instance_path().push_field(name.as_str()),
                &scope.keyword_location(),
            );
            validation::collect_into(&mut errors, result);
        }
        validation::from_errors(errors)
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

impl ToJsonSchema for AdditionalProperties {
    fn to_json_schema(&self) -> Value {
        self.0.to_json_schema()
    }
}

/// The `required` keyword.
pub struct Required(Vec<String>);

impl Required {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        let names = raw
            .as_array()
            .ok_or_else(|| ctx.invalid(format!("expected an array of strings, got {}", type_name(raw))))?;
        let names = names
            .iter()
            .map(|name| ctx.string(name).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(Self(names)))
    }
}

impl Keyword for Required {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(members) = value.as_object() else {
            return Validation::Success(());
        };

        let errors = self
            .0
            .iter()
            .filter(|name| !members.contains_key(name.as_str()))
            .map(|name| {
                let mut error = scope
                    .error(format!("required field '{}' is missing", name))
                    .with_code("required")
                    .with_expected("value");
                error.path = scope.instance_path().push_field(name.as_str());
                error
            })
            .collect();
        validation::from_errors(errors)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Required {
    fn to_json_schema(&self) -> Value {
        Value::Array(self.0.iter().map(|name| Value::from(name.as_str())).collect())
    }
}

/// Which side of the member-count range a [`PropertyCount`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLimit {
    Min,
    Max,
}

/// `minProperties` or `maxProperties`.
pub struct PropertyCount {
    limit: CountLimit,
    bound: u64,
    written: Number,
}

impl PropertyCount {
    pub(crate) fn decode(
        limit: CountLimit,
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self {
            limit,
            bound: ctx.non_negative_integer(raw)?,
            written: ctx.number(raw)?,
        }))
    }
}

impl Keyword for PropertyCount {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(members) = value.as_object() else {
            return Validation::Success(());
        };
        let count = members.len() as u64;

        let (violated, code, relation) = match self.limit {
            CountLimit::Min => (count < self.bound, "min_properties", "at least"),
            CountLimit::Max => (count > self.bound, "max_properties", "at most"),
        };
        if !violated {
            return Validation::Success(());
        }
        validation::fail(
            scope
                .error(format!(
                    "object must have {} {} properties, got {}",
                    relation, self.bound, count
                ))
                .with_code(code)
                .with_expected(format!("{} {} properties", relation, self.bound))
                .with_got(format!("{} properties", count)),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for PropertyCount {
    fn to_json_schema(&self) -> Value {
        Value::Number(self.written.clone())
    }
}

fn schema_children(schemas: &IndexMap<String, Schema>) -> Children<'_> {
    schemas
        .iter()
        .map(|(name, schema)| (name.clone(), Addressable::Schema(schema)))
        .collect()
}

fn schema_map_to_value<'a>(schemas: impl Iterator<Item = (&'a String, &'a Schema)>) -> Value {
    let members: Map<String, Value> = schemas
        .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
        .collect();
    Value::Object(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::InstancePath;
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_properties_validate_present_members() {
        let schema = Schema::from_value(&json!({
            "properties": {"name": {"type": "string"}, "age": {"minimum": 0}}
        }))
        .unwrap();

        assert!(schema.is_valid(&json!({})));
        assert!(schema.is_valid(&json!({"name": "a", "age": 1})));
        assert!(schema.is_valid(&json!("not an object")));

        let errors = unwrap_failure(schema.validate(&json!({"name": 1, "age": -1})));
        assert_eq!(errors.len(), 2);
        let name = InstancePath::root().push_field("name");
        assert_eq!(
            errors.at_path(&name)[0].keyword_location.to_string(),
            "#/properties/name/type"
        );
    }

    #[test]
    fn test_required() {
        let schema = Schema::from_value(&json!({"required": ["a", "b"]})).unwrap();
        assert!(schema.is_valid(&json!({"a": 1, "b": null})));

        let errors = unwrap_failure(schema.validate(&json!({"a": 1})));
        assert_eq!(errors.len(), 1);
        let error = errors.first();
        assert_eq!(error.code, "required");
        assert_eq!(error.path.to_string(), "b");
        assert_eq!(error.keyword_location.to_string(), "#/required");
    }

    #[test]
    fn test_additional_properties_false() {
        let schema = Schema::from_value(&json!({
            "properties": {"a": true},
            "patternProperties": {"^x-": true},
            "additionalProperties": false
        }))
        .unwrap();

        assert!(schema.is_valid(&json!({"a": 1, "x-tag": 2})));
        let errors = unwrap_failure(schema.validate(&json!({"a": 1, "b": 2, "c": 3})));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first().path.to_string(), "b");
        assert_eq!(errors.first().keyword_location.to_string(), "#/additionalProperties");
    }

    #[test]
    fn test_additional_properties_schema() {
        let schema = Schema::from_value(&json!({"additionalProperties": {"type": "integer"}})).unwrap();
        assert!(schema.is_valid(&json!({"a": 1})));
        let errors = unwrap_failure(schema.validate(&json!({"a": "1"})));
        assert_eq!(
            errors.first().keyword_location.to_string(),
            "#/additionalProperties/type"
        );
    }

    #[test]
    fn test_pattern_properties() {
        let schema = Schema::from_value(&json!({
            "patternProperties": {"^n_": {"type": "number"}, "_s$": {"type": "string"}}
        }))
        .unwrap();

        assert!(schema.is_valid(&json!({"n_a": 1, "b_s": "x", "other": null})));
        let errors = unwrap_failure(schema.validate(&json!({"n_s": 1})));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.first().keyword_location.to_string(),
            "#/patternProperties/_s$/type"
        );
    }

    #[test]
    fn test_property_counts() {
        let schema = Schema::from_value(&json!({"minProperties": 1, "maxProperties": 2})).unwrap();
        assert!(schema.is_valid(&json!({"a": 1})));
        assert_eq!(
            unwrap_failure(schema.validate(&json!({}))).first().code,
            "min_properties"
        );
        assert_eq!(
            unwrap_failure(schema.validate(&json!({"a": 1, "b": 2, "c": 3}))).first().code,
            "max_properties"
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(Schema::from_value(&json!({"properties": []})).is_err());
        assert!(Schema::from_value(&json!({"required": "a"})).is_err());
        assert!(Schema::from_value(&json!({"required": [1]})).is_err());
        let error = Schema::from_value(&json!({"patternProperties": {"(": true}})).unwrap_err();
        assert_eq!(error.location().unwrap().to_string(), "#/patternProperties/(");
    }

    #[test]
    fn test_properties_addressing() {
        let schema = Schema::from_value(&json!({"properties": {"a/b": {"minimum": 1}}})).unwrap();
        let pointer = crate::path::SchemaPointer::parse("#/properties/a~1b/minimum").unwrap();
        assert!(schema.resolve(&pointer).is_some());
    }
}
