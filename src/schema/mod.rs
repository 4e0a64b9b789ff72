//! Decoded schemas.
//!
//! A [`Schema`] is either a boolean literal or a [`SchemaObject`]: the set of
//! keywords declared on one node of a schema document. Validating against an
//! object ANDs its keywords together, accumulating every failure.
//!
//! # Example
//!
//! ```rust
//! use verdict::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "if": {"type": "string"},
//!     "then": {"minLength": 3},
//!     "else": {"type": "number"}
//! }))
//! .unwrap();
//!
//! assert!(schema.validate(&json!("abc")).is_success());
//! assert!(schema.validate(&json!("hi")).is_failure());
//! assert!(schema.validate(&json!(42)).is_success());
//! assert!(schema.validate(&json!(null)).is_failure());
//! ```

mod traits;
mod vocabulary;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::address::{self, Addressable, Children};
use crate::error::{DecodeError, SchemaError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::path::{InstancePath, SchemaPointer};
use crate::validation::{self, Scope, ValidationContext, ValidationOptions};

pub use traits::Keyword;
pub use vocabulary::{DecodeContext, KeywordDecoder, Vocabulary};

/// A decoded schema.
pub enum Schema {
    /// `true` accepts every instance, `false` rejects every instance.
    Bool(bool),
    /// A set of keywords.
    Object(SchemaObject),
}

/// One member of a schema object.
pub(crate) enum Entry {
    Keyword(Box<dyn Keyword>),
    /// A member no decoder is registered for; kept for re-serialization.
    Unknown(Value),
}

/// The keywords declared on one schema document node, in document order.
pub struct SchemaObject {
    entries: IndexMap<String, Entry>,
}

impl Schema {
    /// Decodes a schema document with the built-in vocabulary.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the document is not an object or boolean,
    /// or if any keyword value is malformed.
    pub fn from_value(raw: &Value) -> Result<Self, DecodeError> {
        Vocabulary::standard().decode(raw)
    }

    /// Validates an instance with default options.
    pub fn validate(&self, value: &Value) -> Validation<(), SchemaErrors> {
        self.validate_with(value, &ValidationOptions::default())
    }

    /// Validates an instance with the given options.
    pub fn validate_with(
        &self,
        value: &Value,
        options: &ValidationOptions,
    ) -> Validation<(), SchemaErrors> {
        let context = ValidationContext::new(self, options);
        self.validate_in(value, &InstancePath::root(), &SchemaPointer::root(), &context)
    }

    /// Returns true if the instance conforms.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_success()
    }

    /// Validates `value` found at `path` against this schema located at
    /// `location`, within an ongoing validation.
    pub(crate) fn validate_in(
        &self,
        value: &Value,
        path: &InstancePath,
        location: &SchemaPointer,
        context: &ValidationContext<'_>,
    ) -> Validation<(), SchemaErrors> {
        match self {
            Schema::Bool(true) => Validation::Success(()),
            Schema::Bool(false) => validation::fail(
                SchemaError::new(path.clone(), "no value is valid against a false schema")
                    .with_schema_location(location.clone())
                    .with_code("false_schema"),
            ),
            Schema::Object(object) => object.validate_in(value, path, location, context),
        }
    }

    /// Returns the keyword container, or None for a boolean schema.
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Schema::Object(object) => Some(object),
            Schema::Bool(_) => None,
        }
    }

    /// Returns the keyword named `name` as an addressable child.
    pub fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.as_object()?.keyword(name).map(Addressable::Keyword)
    }

    /// Returns every keyword of this schema as an addressable child.
    pub fn children(&self) -> Children<'_> {
        match self {
            Schema::Bool(_) => Children::new(),
            Schema::Object(object) => object
                .keywords()
                .map(|(name, keyword)| (name.to_string(), Addressable::Keyword(keyword)))
                .collect(),
        }
    }

    /// Resolves a pointer relative to this schema.
    pub fn resolve(&self, pointer: &SchemaPointer) -> Option<Addressable<'_>> {
        address::resolve(self, pointer)
    }
}

impl From<bool> for Schema {
    fn from(value: bool) -> Self {
        Schema::Bool(value)
    }
}

impl TryFrom<&Value> for Schema {
    type Error = DecodeError;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        Schema::from_value(raw)
    }
}

impl FromStr for Schema {
    type Err = DecodeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let raw: Value = serde_json::from_str(text)?;
        Schema::from_value(&raw)
    }
}

impl ToJsonSchema for Schema {
    fn to_json_schema(&self) -> Value {
        match self {
            Schema::Bool(b) => Value::Bool(*b),
            Schema::Object(object) => object.to_json_schema(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.to_json_schema()).finish()
    }
}

impl SchemaObject {
    pub(crate) fn from_entries(entries: IndexMap<String, Entry>) -> Self {
        Self { entries }
    }

    /// Returns the keyword named `name`.
    pub fn keyword(&self, name: &str) -> Option<&dyn Keyword> {
        match self.entries.get(name)? {
            Entry::Keyword(keyword) => Some(keyword.as_ref()),
            Entry::Unknown(_) => None,
        }
    }

    /// Returns the keyword named `name` if it has concrete type `K`.
    pub fn keyword_as<K: Keyword>(&self, name: &str) -> Option<&K> {
        self.keyword(name)?.as_any().downcast_ref::<K>()
    }

    /// Returns the raw value of a member that is not a recognized keyword.
    pub fn unknown(&self, name: &str) -> Option<&Value> {
        match self.entries.get(name)? {
            Entry::Unknown(value) => Some(value),
            Entry::Keyword(_) => None,
        }
    }

    /// Iterates the recognized keywords in document order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &dyn Keyword)> {
        self.entries.iter().filter_map(|(name, entry)| match entry {
            Entry::Keyword(keyword) => Some((name.as_str(), keyword.as_ref())),
            Entry::Unknown(_) => None,
        })
    }

    /// Returns true if a member (keyword or not) named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of members, recognized or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the object has no members (`{}`).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate_in(
        &self,
        value: &Value,
        path: &InstancePath,
        location: &SchemaPointer,
        context: &ValidationContext<'_>,
    ) -> Validation<(), SchemaErrors> {
        let mut errors = Vec::new();
        for (name, keyword) in self.keywords() {
            let scope = Scope::new(self, location, name, path, context);
            validation::collect_into(&mut errors, keyword.validate(value, &scope));
        }
        validation::from_errors(errors)
    }
}

impl ToJsonSchema for SchemaObject {
    fn to_json_schema(&self) -> Value {
        let members: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let value = match entry {
                    Entry::Keyword(keyword) => keyword.to_json_schema(),
                    Entry::Unknown(value) => value.clone(),
                };
                (name.clone(), value)
            })
            .collect();
        Value::Object(members)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Schema>();
    assert_sync::<Schema>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{Else, If, Then};
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_boolean_schemas() {
        let yes = Schema::from(true);
        let no = Schema::from(false);

        assert!(yes.validate(&json!({"anything": [1, 2]})).is_success());
        let errors = unwrap_failure(no.validate(&json!(null)));
        assert_eq!(errors.first().code, "false_schema");
        assert!(errors.first().keyword.is_none());
    }

    #[test]
    fn test_empty_object_accepts_everything() {
        let schema = Schema::from_value(&json!({})).unwrap();
        assert!(schema.is_valid(&json!(1)));
        assert!(schema.is_valid(&json!("x")));
        assert!(schema.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_keywords_are_anded_and_accumulated() {
        let schema = Schema::from_value(&json!({
            "type": "string",
            "minLength": 5,
            "pattern": "^[a-z]+$"
        }))
        .unwrap();

        let errors = unwrap_failure(schema.validate(&json!("AB")));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_keyword("minLength").len(), 1);
        assert_eq!(errors.for_keyword("pattern").len(), 1);
    }

    #[test]
    fn test_unknown_members_are_preserved_but_inert() {
        let schema = Schema::from_value(&json!({
            "title": "Name",
            "x-vendor": {"minLength": 100}
        }))
        .unwrap();
        let object = schema.as_object().unwrap();

        assert!(object.contains("title"));
        assert!(object.keyword("title").is_none());
        assert_eq!(object.unknown("x-vendor"), Some(&json!({"minLength": 100})));
        assert!(schema.is_valid(&json!("a")));
    }

    #[test]
    fn test_keyword_as_downcasts() {
        let schema = Schema::from_value(&json!({"if": true, "then": false})).unwrap();
        let object = schema.as_object().unwrap();

        assert!(object.keyword_as::<If>("if").is_some());
        assert!(object.keyword_as::<Then>("then").is_some());
        assert!(object.keyword_as::<Else>("then").is_none());
        assert!(object.keyword_as::<If>("else").is_none());
    }

    #[test]
    fn test_children_in_document_order() {
        let schema = Schema::from_value(&json!({
            "then": true,
            "title": "ignored",
            "if": true,
            "else": false
        }))
        .unwrap();

        let names: Vec<_> = schema.children().into_keys().collect();
        assert_eq!(names, vec!["then", "if", "else"]);
        assert!(schema.property_at("title").is_none());
    }

    #[test]
    fn test_from_str() {
        let schema: Schema = r#"{"if": {"type": "string"}}"#.parse().unwrap();
        assert!(schema.property_at("if").is_some());

        assert!(matches!(
            "{not json".parse::<Schema>(),
            Err(DecodeError::Parse(_))
        ));
    }

    #[test]
    fn test_debug_shows_document() {
        let schema = Schema::from_value(&json!({"minimum": 1})).unwrap();
        let debug = format!("{:?}", schema);
        assert!(debug.starts_with("Schema("));
        assert!(debug.contains("minimum"));
    }
}
