//! Array keywords: `items`, `minItems`, `maxItems`, `uniqueItems`, `contains`.
//!
//! `items` takes either one schema, applied to every element, or an array of
//! schemas applied position by position (elements past the tuple are not
//! checked). Element failures are reported at the element's instance path
//! (e.g. `tags[2]`).

use std::any::Any;

use serde_json::{Number, Value};
use stillwater::Validation;

use crate::address::{Addressable, Children};
use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::{DecodeContext, Keyword, Schema};
use crate::validation::{self, Scope};
use crate::value::json_equal;

/// The `items` keyword.
pub enum Items {
    /// One schema for every element.
    Single(Schema),
    /// One schema per position.
    Tuple(Vec<Schema>),
}

impl Items {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        let items = match raw {
            Value::Array(_) => Items::Tuple(ctx.schema_list(raw)?),
            other => Items::Single(ctx.schema(other)?),
        };
        Ok(Box::new(items))
    }
}

impl Keyword for Items {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(elements) = value.as_array() else {
            return Validation::Success(());
        };

        let mut errors = Vec::new();
        match self {
            Items::Single(schema) => {
                let location = scope.keyword_location();
                for (i, element) in elements.iter().enumerate() {
                    let result = scope.apply(
                        schema,
                        element,
                        &scope.instance_path().push_index(i),
                        &location,
                    );
                    validation::collect_into(&mut errors, result);
                }
            }
            Items::Tuple(schemas) => {
                for (i, (schema, element)) in schemas.iter().zip(elements).enumerate() {
                    let result = scope.apply(
                        schema,
                        element,
                        &scope.instance_path().push_index(i),
                        &scope.keyword_location().push(i.to_string()),
                    );
                    validation::collect_into(&mut errors, result);
                }
            }
        }
        validation::from_errors(errors)
    }

    fn children(&self) -> Children<'_> {
        match self {
            Items::Single(schema) => schema.children(),
            Items::Tuple(schemas) => schemas
                .iter()
                .enumerate()
                .map(|(i, schema)| (i.to_string(), Addressable::Schema(schema)))
                .collect(),
        }
    }

    fn property_at(&self, name: &str) -> Option<Addressable<'_>> {
        match self {
            Items::Single(schema) => schema.property_at(name),
            Items::Tuple(schemas) => {
                let index: usize = name.parse().ok()?;
                schemas.get(index).map(Addressable::Schema)
            }
        }
    }

    fn subschema(&self) -> Option<&Schema> {
        match self {
            Items::Single(schema) => Some(schema),
            Items::Tuple(_) => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Items {
    fn to_json_schema(&self) -> Value {
        match self {
            Items::Single(schema) => schema.to_json_schema(),
            Items::Tuple(schemas) => {
                Value::Array(schemas.iter().map(Schema::to_json_schema).collect())
            }
        }
    }
}

/// Which side of the length range an [`ItemCount`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLimit {
    Min,
    Max,
}

/// `minItems` or `maxItems`.
pub struct ItemCount {
    limit: ItemLimit,
    bound: u64,
    written: Number,
}

impl ItemCount {
    pub(crate) fn decode(
        limit: ItemLimit,
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

impl Keyword for ItemCount {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(elements) = value.as_array() else {
            return Validation::Success(());
        };
        let len = elements.len() as u64;

        match self.limit {
            ItemLimit::Min if len < self.bound => validation::fail(
                scope
                    .error(format!(
                        "array must have at least {} items, got {}",
                        self.bound, len
                    ))
                    .with_code("min_items")
                    .with_expected(format!("at least {} items", self.bound))
                    .with_got(format!("{} items", len)),
            ),
            ItemLimit::Max if len > self.bound => validation::fail(
                scope
                    .error(format!(
                        "array must have at most {} items, got {}",
                        self.bound, len
                    ))
                    .with_code("max_items")
                    .with_expected(format!("at most {} items", self.bound))
                    .with_got(format!("{} items", len)),
            ),
            _ => Validation::Success(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for ItemCount {
    fn to_json_schema(&self) -> Value {
        Value::Number(self.written.clone())
    }
}

/// The `uniqueItems` keyword. `false` is accepted and checks nothing.
pub struct UniqueItems(bool);

impl UniqueItems {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.boolean(raw)?)))
    }
}

impl Keyword for UniqueItems {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        if !self.0 {
            return Validation::Success(());
        }
        let Some(elements) = value.as_array() else {
            return Validation::Success(());
        };

        let errors = find_duplicates(elements)
            .into_iter()
            .map(|indices| {
                scope
                    .error(format!("duplicate value at indices {:?}", indices))
                    .with_code("unique")
                    .with_got(format!("duplicates at indices {:?}", indices))
            })
            .collect();
        validation::from_errors(errors)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for UniqueItems {
    fn to_json_schema(&self) -> Value {
        Value::Bool(self.0)
    }
}

/// Groups the indices of mathematically equal elements, keeping only groups
/// with more than one member, ordered by first occurrence.
fn find_duplicates(elements: &[Value]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        match groups
            .iter_mut()
            .find(|group| json_equal(&elements[group[0]], element))
        {
            Some(group) => group.push(i),
            None => groups.push(vec![i]),
        }
    }
    groups.retain(|group| group.len() > 1);
    groups
}

/// The `contains` keyword: at least one element must match.
pub struct Contains(Schema);

impl Contains {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(ctx.schema(raw)?)))
    }
}

impl Keyword for Contains {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(elements) = value.as_array() else {
            return Validation::Success(());
        };

        let location = scope.keyword_location();
        let found = elements.iter().enumerate().any(|(i, element)| {
            scope
                .apply(
                    &self.0,
                    element,
                    &scope.instance_path().push_index(i),
                    &location,
                )
                .is_success()
        });
        if found {
            Validation::Success(())
        } else {
            validation::fail(
                scope
                    .error("array does not contain a matching item")
                    .with_code("contains")
                    .with_got(format!("{} non-matching items", elements.len())),
            )
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

impl ToJsonSchema for Contains {
    fn to_json_schema(&self) -> Value {
        self.0.to_json_schema()
    }
}
