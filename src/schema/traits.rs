//! The keyword validator protocol.
//!
//! Every keyword a schema object can hold implements [`Keyword`]. The engine
//! only ever talks to keywords through this trait, so new keywords plug in by
//! registering a decoder with a [`Vocabulary`](crate::Vocabulary).

use std::any::Any;

use serde_json::Value;
use stillwater::Validation;

use crate::address::{Addressable, Children};
use crate::error::SchemaErrors;
use crate::interop::ToJsonSchema;
use crate::schema::Schema;
use crate::validation::Scope;

/// A named, independently pluggable validation rule.
///
/// Implementations must be deterministic and free of side effects: a decoded
/// schema tree is shared read-only between threads, so `validate` takes
/// `&self` and may run concurrently on the same keyword.
///
/// # Example
///
/// ```rust
/// use std::any::Any;
/// use serde_json::{json, Value};
/// use stillwater::Validation;
/// use verdict::{DecodeContext, DecodeError, Keyword, Schema, SchemaErrors, Scope, ToJsonSchema, Vocabulary};
///
/// /// Rejects strings that contain uppercase characters.
/// struct Lowercase(bool);
///
/// impl Keyword for Lowercase {
///     fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
///         match value.as_str() {
///             Some(s) if self.0 && s.chars().any(char::is_uppercase) => Validation::Failure(
///                 SchemaErrors::single(scope.error("must be lowercase").with_code("lowercase")),
///             ),
///             _ => Validation::Success(()),
///         }
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// impl ToJsonSchema for Lowercase {
///     fn to_json_schema(&self) -> Value {
///         Value::Bool(self.0)
///     }
/// }
///
/// fn decode(raw: &Value, ctx: &DecodeContext<'_>) -> Result<Box<dyn Keyword>, DecodeError> {
///     let flag = raw.as_bool().ok_or_else(|| ctx.invalid("expected a boolean"))?;
///     Ok(Box::new(Lowercase(flag)))
/// }
///
/// let vocabulary = Vocabulary::default().with_keyword("lowercase", decode);
/// let schema = vocabulary.decode(&json!({"lowercase": true})).unwrap();
///
/// assert!(schema.validate(&json!("abc")).is_success());
/// assert!(schema.validate(&json!("aBc")).is_failure());
/// ```
pub trait Keyword: ToJsonSchema + Send + Sync + 'static {
    /// Validates `value`, reporting every failure found.
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors>;

    /// Returns the addressable children of this keyword.
    ///
    /// Leaf keywords have none.
    fn children(&self) -> Children<'_> {
        Children::new()
    }

    /// Returns the child at `name`.
    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.children().shift_remove(name)
    }

    /// The schema this keyword wraps, for keywords that wrap exactly one.
    fn subschema(&self) -> Option<&Schema> {
        None
    }

    /// Upcast used to recover the concrete keyword type from a sibling lookup.
    fn as_any(&self) -> &dyn Any;
}
