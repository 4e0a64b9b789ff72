//! Error types.
//!
//! Two disjoint classes live here: [`SchemaError`]/[`SchemaErrors`] describe an
//! instance that does not conform (a validation *result*), while
//! [`DecodeError`] describes a schema document that could not be built.

mod decode_error;
mod schema_error;

pub use decode_error::DecodeError;
pub use schema_error::{SchemaError, SchemaErrors};
