//! Path addressing over decoded schema trees.
//!
//! Every node of a decoded schema can be asked for a named child, or for all
//! of its named children. A [`SchemaPointer`] is resolved purely by repeating
//! that question, so a pointer such as `#/if/properties/foo` needs no
//! knowledge of what `if` or `properties` mean.
//!
//! Keywords that wrap a single schema (`if`, `then`, `else`, `not`, ...) do not
//! add a level of their own: their children are their schema's children.
//! Keywords that hold several schemas expose them by member name
//! (`properties`, `$defs`) or by decimal position (`allOf`, tuple `items`).

use indexmap::IndexMap;
use serde_json::Value;

use crate::interop::ToJsonSchema;
use crate::path::SchemaPointer;
use crate::schema::{Keyword, Schema};

/// The named children of an addressable node, in document order.
pub type Children<'a> = IndexMap<String, Addressable<'a>>;

/// A node reachable by path addressing: a whole schema or one keyword.
#[derive(Clone, Copy)]
pub enum Addressable<'a> {
    /// A schema (object or boolean).
    Schema(&'a Schema),
    /// A keyword held by some schema object.
    Keyword(&'a dyn Keyword),
}

impl<'a> Addressable<'a> {
    /// Returns the child at `name`, or None when there is no such child.
    pub fn property_at(&self, name: &str) -> Option<Addressable<'a>> {
        match *self {
            Addressable::Schema(schema) => schema.property_at(name),
            Addressable::Keyword(keyword) => keyword.property_at(name),
        }
    }

    /// Returns every immediate named child.
    pub fn children(&self) -> Children<'a> {
        match *self {
            Addressable::Schema(schema) => schema.children(),
            Addressable::Keyword(keyword) => keyword.children(),
        }
    }

    /// Views this node as a schema. A keyword qualifies when it wraps exactly
    /// one schema.
    pub fn as_schema(&self) -> Option<&'a Schema> {
        match *self {
            Addressable::Schema(schema) => Some(schema),
            Addressable::Keyword(keyword) => keyword.subschema(),
        }
    }

    /// Views this node as a keyword.
    pub fn as_keyword(&self) -> Option<&'a dyn Keyword> {
        match *self {
            Addressable::Schema(_) => None,
            Addressable::Keyword(keyword) => Some(keyword),
        }
    }

    /// Re-serializes the addressed node.
    pub fn to_json_schema(&self) -> Value {
        match *self {
            Addressable::Schema(schema) => schema.to_json_schema(),
            Addressable::Keyword(keyword) => keyword.to_json_schema(),
        }
    }
}

/// Walks `pointer` from `root`, one [`Addressable::property_at`] per token.
pub fn resolve<'a>(root: &'a Schema, pointer: &SchemaPointer) -> Option<Addressable<'a>> {
    pointer
        .tokens()
        .try_fold(Addressable::Schema(root), |node, token| {
            node.property_at(token)
        })
}
