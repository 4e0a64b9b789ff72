//! Conversion back to JSON Schema documents.

use serde_json::Value;

/// Converts a decoded schema node back into its document form.
///
/// For a [`Schema`](crate::Schema) this is the whole (sub)document. For a
/// keyword it is the value that sits under the keyword's name.
///
/// # Example
///
/// ```rust
/// use verdict::{Schema, ToJsonSchema};
/// use serde_json::json;
///
/// let document = json!({"then": {"minLength": 3}, "title": "orphan"});
/// let schema = Schema::from_value(&document).unwrap();
///
/// assert_eq!(schema.to_json_schema(), document);
/// ```
pub trait ToJsonSchema {
    /// Returns the document form of this node.
    fn to_json_schema(&self) -> Value;
}
