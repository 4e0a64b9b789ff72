//! Built-in keywords, one module per family.
//!
//! Every keyword here is an ordinary [`Keyword`](crate::Keyword)
//! implementation registered by name in the standard
//! [`Vocabulary`](crate::Vocabulary); none of them gets special treatment
//! from the schema container.

mod applicators;
mod array;
mod conditionals;
mod numeric;
mod object;
mod reference;
pub(crate) mod string;
mod types;

pub use applicators::{Combinator, Not, SchemaList};
pub use array::{Contains, ItemCount, ItemLimit, Items, UniqueItems};
pub use conditionals::{Else, If, Then};
pub use numeric::{BoundKind, MultipleOf, NumericBound};
pub use object::{
    AdditionalProperties, CountLimit, PatternProperties, Properties, PropertyCount, Required,
};
pub use reference::{Definitions, Ref};
pub use string::{LengthBound, LengthLimit, Pattern};
pub use types::{Const, Enum, InstanceType, Type};

use crate::schema::Vocabulary;

/// Registers every built-in keyword.
pub(crate) fn register_standard(vocabulary: &mut Vocabulary) {
    vocabulary
        // core
        .register("$ref", Ref::decode)
        .register("$defs", Definitions::decode)
        .register("definitions", Definitions::decode)
        // type and value
        .register("type", Type::decode)
        .register("enum", Enum::decode)
        .register("const", Const::decode)
        // applicators
        .register("allOf", |raw, ctx| SchemaList::decode(Combinator::AllOf, raw, ctx))
        .register("anyOf", |raw, ctx| SchemaList::decode(Combinator::AnyOf, raw, ctx))
        .register("oneOf", |raw, ctx| SchemaList::decode(Combinator::OneOf, raw, ctx))
        .register("not", Not::decode)
        .register("if", If::decode)
        .register("then", Then::decode)
        .register("else", Else::decode)
        // strings
        .register("minLength", |raw, ctx| LengthBound::decode(LengthLimit::Min, raw, ctx))
        .register("maxLength", |raw, ctx| LengthBound::decode(LengthLimit::Max, raw, ctx))
        .register("pattern", Pattern::decode)
        // numbers
        .register("minimum", |raw, ctx| NumericBound::decode(BoundKind::Minimum, raw, ctx))
        .register("maximum", |raw, ctx| NumericBound::decode(BoundKind::Maximum, raw, ctx))
        .register("exclusiveMinimum", |raw, ctx| {
            NumericBound::decode(BoundKind::ExclusiveMinimum, raw, ctx)
        })
        .register("exclusiveMaximum", |raw, ctx| {
            NumericBound::decode(BoundKind::ExclusiveMaximum, raw, ctx)
        })
        .register("multipleOf", MultipleOf::decode)
        // objects
        .register("properties", Properties::decode)
        .register("patternProperties", PatternProperties::decode)
        .register("additionalProperties", AdditionalProperties::decode)
        .register("required", Required::decode)
        .register("minProperties", |raw, ctx| {
            PropertyCount::decode(CountLimit::Min, raw, ctx)
        })
        .register("maxProperties", |raw, ctx| {
            PropertyCount::decode(CountLimit::Max, raw, ctx)
        })
        // arrays
        .register("items", Items::decode)
        .register("minItems", |raw, ctx| ItemCount::decode(ItemLimit::Min, raw, ctx))
        .register("maxItems", |raw, ctx| ItemCount::decode(ItemLimit::Max, raw, ctx))
        .register("uniqueItems", UniqueItems::decode)
        .register("contains", Contains::decode);
}
