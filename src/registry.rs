//! Named, shared storage for decoded schemas.
//!
//! This module provides the [`SchemaRegistry`] type: decode a schema once,
//! register it under a name, and validate against it from any number of
//! threads. Registry names are lookup keys only; `$ref` inside a registered
//! schema still resolves against that schema's own document.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::Schema;
use crate::validation::{ValidationOptions, DEFAULT_MAX_DEPTH};
use stillwater::Validation;

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<HashMap<String, Arc<Schema>>>>;

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// A thread-safe registry of named schemas.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Lookups and validations take a short read lock to clone the schema's
///   `Arc`, then validate without holding any lock
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use verdict::SchemaRegistry;
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register_value("User", &json!({
///         "properties": {"name": {"type": "string", "minLength": 1}},
///         "required": ["name"]
///     }))
///     .unwrap();
///
/// let result = registry.validate("User", &json!({"name": "Alice"})).unwrap();
/// assert!(result.is_success());
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
    max_depth: usize,
}

impl SchemaRegistry {
    /// Creates a new empty schema registry with the default max depth (100).
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum `$ref` chain length used by [`validate`](Self::validate).
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::new().with_max_depth(50);
    /// ```
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Registers a decoded schema under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::{Schema, SchemaRegistry};
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("Anything", Schema::from(true)).unwrap();
    ///
    /// // Duplicate registration fails
    /// assert!(registry.register("Anything", Schema::from(true)).is_err());
    /// ```
    pub fn register(&self, name: impl Into<String>, schema: Schema) -> Result<(), RegistryError> {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(schema = %name, "registered schema");
        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Decodes a schema document with the built-in vocabulary and registers it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Decode` if the document is malformed, or
    /// `RegistryError::DuplicateName` if the name is taken.
    pub fn register_value(&self, name: impl Into<String>, raw: &Value) -> Result<(), RegistryError> {
        let schema = Schema::from_value(raw)?;
        self.register(name, schema)
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns every registered name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn options(&self) -> ValidationOptions {
        ValidationOptions::default().with_max_depth(self.max_depth)
    }

    fn require(&self, name: &str) -> Result<Arc<Schema>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))
    }

    /// Validates a value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if the schema name doesn't exist.
    pub fn validate(
        &self,
        schema_name: &str,
        value: &Value,
    ) -> Result<Validation<(), SchemaErrors>, RegistryError> {
        let schema = self.require(schema_name)?;
        Ok(schema.validate_with(value, &self.options()))
    }

    /// Validates many values against one named schema in parallel.
    ///
    /// Results come back in input order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if the schema name doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register_value("Port", &json!({"type": "integer", "minimum": 1})).unwrap();
    ///
    /// let results = registry
    ///     .validate_batch("Port", &[json!(80), json!(0), json!("x")])
    ///     .unwrap();
    /// let valid: Vec<bool> = results.iter().map(|r| r.is_success()).collect();
    /// assert_eq!(valid, vec![true, false, false]);
    /// ```
    pub fn validate_batch(
        &self,
        schema_name: &str,
        values: &[Value],
    ) -> Result<Vec<Validation<(), SchemaErrors>>, RegistryError> {
        let schema = self.require(schema_name)?;
        let options = self.options();
        Ok(values
            .par_iter()
            .map(|value| schema.validate_with(value, &options))
            .collect())
    }

    /// Exports all registered schemas as one document with `$defs`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register_value("UserId", &json!({"type": "integer", "exclusiveMinimum": 0})).unwrap();
    ///
    /// let document = registry.to_json_schema();
    /// assert_eq!(
    ///     document["$defs"]["UserId"],
    ///     json!({"type": "integer", "exclusiveMinimum": 0})
    /// );
    /// ```
    pub fn to_json_schema(&self) -> Value {
        let schemas = self.schemas.read();
        let mut names: Vec<&String> = schemas.keys().collect();
        names.sort();

        let mut defs = serde_json::Map::new();
        for name in names {
            defs.insert(name.clone(), schemas[name].to_json_schema());
        }

        json!({
            "$schema": DRAFT,
            "$defs": defs
        })
    }

    /// Exports a single schema as a standalone document.
    ///
    /// Object schemas gain a `$schema` member unless they already declare one;
    /// boolean schemas are returned as-is. Returns `None` if the schema
    /// doesn't exist.
    pub fn export_schema(&self, name: &str) -> Option<Value> {
        let mut document = self.get(name)?.to_json_schema();
        if let Value::Object(members) = &mut document {
            members
                .entry("$schema")
                .or_insert_with(|| Value::from(DRAFT));
        }
        Some(document)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
            max_depth: self.max_depth,
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to validate with a schema name that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    /// The schema document could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
