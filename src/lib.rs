//! # Verdict
//!
//! A JSON Schema validation engine that reports ALL failures, each addressed
//! both to the offending instance value and to the schema keyword that
//! rejected it.
//!
//! ## Overview
//!
//! A schema document decodes once into an immutable [`Schema`] tree. Each node
//! is a container of independently pluggable [`Keyword`]s; validating an
//! instance asks every keyword of a node to check the same value and combines
//! the outcomes with logical AND. Failures accumulate through stillwater's
//! `Validation` type instead of stopping at the first one.
//!
//! ## Core Types
//!
//! - [`Schema`]: a decoded schema (`true`, `false`, or a [`SchemaObject`])
//! - [`Keyword`]: the contract every keyword implements; register your own in
//!   a [`Vocabulary`]
//! - [`InstancePath`]: where a failing value sits (e.g. `users[0].email`)
//! - [`SchemaPointer`]: where a failing keyword sits (e.g. `#/then/minLength`)
//! - [`SchemaError`] / [`SchemaErrors`]: validation failures
//! - [`DecodeError`]: a malformed schema document
//! - [`SchemaRegistry`]: named schemas shared across threads
//!
//! ## Example
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
//! assert!(schema.validate(&json!(42)).is_success());
//!
//! let errors = schema.validate(&json!("hi")).into_result().unwrap_err();
//! assert_eq!(errors.first().keyword_location.to_string(), "#/then/minLength");
//! ```

pub mod address;
pub mod error;
pub mod interop;
pub mod keywords;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;

mod value;

pub use address::{resolve, Addressable, Children};
pub use error::{DecodeError, SchemaError, SchemaErrors};
pub use interop::ToJsonSchema;
pub use path::{InstancePath, PathSegment, SchemaPointer};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{DecodeContext, Keyword, KeywordDecoder, Schema, SchemaObject, Vocabulary};
pub use validation::{Scope, ValidationContext, ValidationOptions, DEFAULT_MAX_DEPTH};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult = stillwater::Validation<(), SchemaErrors>;
