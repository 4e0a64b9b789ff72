//! Re-serialization of decoded schemas.
//!
//! Decoding keeps enough of the source document that a schema tree can be
//! written back out with the same keywords, member order and number forms.

pub mod json_schema;

pub use json_schema::ToJsonSchema;
