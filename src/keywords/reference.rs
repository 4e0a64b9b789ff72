//! Document-local references: `$ref`, and the `$defs`/`definitions` containers
//! they usually point into.
//!
//! A reference is resolved at validation time by path addressing against the
//! root schema of the running validation. Every hop increments the context's
//! depth; past the configured maximum the reference reports
//! `max_depth_exceeded` instead of recursing. A reference that re-enters a
//! target it is already following for the same instance value reports
//! `circular_reference`, so self-referential schemas always terminate.

use std::any::Any;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::address::{Addressable, Children};
use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::path::SchemaPointer;
use crate::schema::{DecodeContext, Keyword, Schema};
use crate::validation::{self, ReferenceFrame, Scope};

/// The `$ref` keyword.
pub struct Ref {
    reference: String,
    target: SchemaPointer,
}

impl Ref {
    /// The reference as written in the document.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The pointer the reference resolves through.
    pub fn target(&self) -> &SchemaPointer {
        &self.target
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        let reference = ctx.string(raw)?;
        let target =
            SchemaPointer::parse(reference).map_err(|_| DecodeError::UnsupportedReference {
                location: ctx.location().clone(),
                reference: reference.to_string(),
            })?;
        Ok(Box::new(Self {
            reference: reference.to_string(),
            target,
        }))
    }
}

impl Keyword for Ref {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let context = scope.context();

        if context.depth() >= context.max_depth() {
            tracing::warn!(
                reference = %self.reference,
                location = %scope.keyword_location(),
                max_depth = context.max_depth(),
                "reference depth limit reached"
            );
            return validation::fail(
                scope
                    .error(format!(
                        "maximum reference depth {} exceeded at path '{}'",
                        context.max_depth(),
                        scope.instance_path()
                    ))
                    .with_code("max_depth_exceeded"),
            );
        }

        let Some(target) = context
            .root()
            .resolve(&self.target)
            .and_then(|node| node.as_schema())
        else {
            return validation::fail(
                scope
                    .error(format!("reference '{}' does not resolve to a schema", self.reference))
                    .with_code("unresolved_reference")
                    .with_got(self.reference.clone()),
            );
        };

        if context.is_following(&self.target, scope.instance_path()) {
            return validation::fail(
                scope
                    .error(format!(
                        "reference '{}' cycles back to itself without consuming any of the instance",
                        self.reference
                    ))
                    .with_code("circular_reference"),
            );
        }

        tracing::trace!(reference = %self.reference, depth = context.depth() + 1, "following reference");
        let frame = ReferenceFrame::new(&self.target, scope.instance_path(), context.following());
        target.validate_in(
            value,
            scope.instance_path(),
            &self.target,
            &context.follow(&frame),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Ref {
    fn to_json_schema(&self) -> Value {
        Value::String(self.reference.clone())
    }
}

/// The `$defs` (or legacy `definitions`) keyword: named schemas that apply to
/// nothing by themselves and exist to be referenced.
pub struct Definitions(IndexMap<String, Schema>);

impl Definitions {
    /// Returns the definition named `name`.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.0.get(name)
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema_map(raw)?)))
    }
}

impl Keyword for Definitions {
    fn validate(&self, _value: &Value, _scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        Validation::Success(())
    }

    fn children(&self) -> Children<'_> {
        self.0
            .iter()
            .map(|(name, schema)| (name.clone(), Addressable::Schema(schema)))
            .collect()
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        self.0.get(name).map(Addressable::Schema)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Definitions {
    fn to_json_schema(&self) -> Value {
        let members: Map<String, Value> = self
            .0
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
            .collect();
        Value::Object(members)
    }
}
