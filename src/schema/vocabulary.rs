//! Keyword registration and schema decoding.
//!
//! A [`Vocabulary`] maps keyword names to decoder functions. Decoding a schema
//! object looks each member name up in that table; members without a decoder
//! are kept verbatim but take no part in validation.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::DecodeError;
use crate::keywords;
use crate::path::SchemaPointer;
use crate::schema::{Entry, Keyword, Schema, SchemaObject};
use crate::value::type_name;

/// Builds a keyword from the raw value found under its name.
pub type KeywordDecoder =
    fn(&Value, &DecodeContext<'_>) -> Result<Box<dyn Keyword>, DecodeError>;

/// A keyword-name to decoder table.
///
/// `Vocabulary::default()` contains every built-in keyword;
/// `Vocabulary::new()` starts empty.
///
/// # Example
///
/// ```rust
/// use verdict::Vocabulary;
/// use serde_json::json;
///
/// // Without the built-ins, `minLength` is just an unknown member.
/// let bare = Vocabulary::new();
/// let schema = bare.decode(&json!({"minLength": 5})).unwrap();
/// assert!(schema.validate(&json!("hi")).is_success());
///
/// let schema = Vocabulary::standard().decode(&json!({"minLength": 5})).unwrap();
/// assert!(schema.validate(&json!("hi")).is_failure());
/// ```
#[derive(Clone)]
pub struct Vocabulary {
    decoders: IndexMap<String, KeywordDecoder>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self {
            decoders: IndexMap::new(),
        }
    }

    /// The shared vocabulary of built-in keywords.
    pub fn standard() -> &'static Vocabulary {
        static STANDARD: OnceLock<Vocabulary> = OnceLock::new();
        STANDARD.get_or_init(Vocabulary::default)
    }

    /// Registers (or replaces) the decoder for `name`.
    pub fn register(&mut self, name: impl Into<String>, decoder: KeywordDecoder) -> &mut Self {
        self.decoders.insert(name.into(), decoder);
        self
    }

    /// Builder form of [`Vocabulary::register`].
    pub fn with_keyword(mut self, name: impl Into<String>, decoder: KeywordDecoder) -> Self {
        self.register(name, decoder);
        self
    }

    /// Returns true if `name` is a recognized keyword.
    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    /// Returns the decoder registered for `name`.
    pub fn decoder(&self, name: &str) -> Option<KeywordDecoder> {
        self.decoders.get(name).copied()
    }

    /// Returns the recognized keyword names in registration order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }

    /// Decodes a schema document.
    ///
    /// # Errors
    ///
    /// Fails when the document (or any nested schema position) is neither an
    /// object nor a boolean, or when a recognized keyword has a malformed value.
    pub fn decode(&self, raw: &Value) -> Result<Schema, DecodeError> {
        let schema = DecodeContext::new(self, SchemaPointer::root()).schema(raw)?;
        tracing::debug!(
            keywords = schema.as_object().map_or(0, SchemaObject::len),
            "decoded schema document"
        );
        Ok(schema)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        let mut vocabulary = Self::new();
        keywords::register_standard(&mut vocabulary);
        vocabulary
    }
}

/// Where a decoder is running, and how to decode nested schemas from there.
///
/// A keyword decoder receives a context located at the keyword itself
/// (e.g. `#/if`).
pub struct DecodeContext<'a> {
    vocabulary: &'a Vocabulary,
    location: SchemaPointer,
}

impl<'a> DecodeContext<'a> {
    pub(crate) fn new(vocabulary: &'a Vocabulary, location: SchemaPointer) -> Self {
        Self {
            vocabulary,
            location,
        }
    }

    /// The location being decoded.
    pub fn location(&self) -> &SchemaPointer {
        &self.location
    }

    /// Name of the keyword being decoded (the last location token).
    pub fn keyword(&self) -> &str {
        self.location.last().unwrap_or_default()
    }

    /// A context one token deeper.
    pub fn child(&self, token: impl Into<String>) -> DecodeContext<'a> {
        DecodeContext::new(self.vocabulary, self.location.push(token))
    }

    /// Builds an [`DecodeError::InvalidKeyword`] for the current keyword.
    pub fn invalid(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::InvalidKeyword {
            location: self.location.clone(),
            keyword: self.keyword().to_string(),
            reason: reason.into(),
        }
    }

    /// Decodes a schema located exactly here.
    pub fn schema(&self, raw: &Value) -> Result<Schema, DecodeError> {
        match raw {
            Value::Bool(b) => Ok(Schema::Bool(*b)),
            Value::Object(members) => {
                let mut entries = IndexMap::with_capacity(members.len());
                for (name, value) in members {
                    let entry = match self.vocabulary.decoder(name) {
                        Some(decode) => Entry::Keyword(decode(value, &self.child(name.as_str()))?),
                        None => {
                            tracing::debug!(
                                keyword = %name,
                                location = %self.location,
                                "preserving unrecognized keyword"
                            );
                            Entry::Unknown(value.clone())
                        }
                    };
                    entries.insert(name.clone(), entry);
                }
                Ok(Schema::Object(SchemaObject::from_entries(entries)))
            }
            other => Err(DecodeError::InvalidSchema {
                location: self.location.clone(),
                got: type_name(other),
            }),
        }
    }

    /// Decodes a schema one token below here.
    pub fn schema_at(&self, token: impl Into<String>, raw: &Value) -> Result<Schema, DecodeError> {
        self.child(token).schema(raw)
    }

    /// Decodes a non-empty array of schemas addressed by position.
    pub fn schema_list(&self, raw: &Value) -> Result<Vec<Schema>, DecodeError> {
        let items = raw
            .as_array()
            .ok_or_else(|| self.invalid(format!("expected an array of schemas, got {}", type_name(raw))))?;
        if items.is_empty() {
            return Err(self.invalid("expected at least one schema"));
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.schema_at(i.to_string(), item))
            .collect()
    }

    /// Decodes an object whose members are all schemas.
    pub fn schema_map(&self, raw: &Value) -> Result<IndexMap<String, Schema>, DecodeError> {
        let members = raw
            .as_object()
            .ok_or_else(|| self.invalid(format!("expected an object of schemas, got {}", type_name(raw))))?;
        members
            .iter()
            .map(|(name, member)| Ok((name.clone(), self.schema_at(name.as_str(), member)?)))
            .collect()
    }

    /// Reads a non-negative integer (`3` or `3.0`).
    pub fn non_negative_integer(&self, raw: &Value) -> Result<u64, DecodeError> {
        if let Some(n) = raw.as_u64() {
            return Ok(n);
        }
        match raw.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
            _ => Err(self.invalid(format!("expected a non-negative integer, got {}", raw))),
        }
    }

    /// Reads a number.
    pub fn number(&self, raw: &Value) -> Result<Number, DecodeError> {
        match raw {
            Value::Number(n) => Ok(n.clone()),
            other => Err(self.invalid(format!("expected a number, got {}", type_name(other)))),
        }
    }

    /// Reads a boolean.
    pub fn boolean(&self, raw: &Value) -> Result<bool, DecodeError> {
        raw.as_bool()
            .ok_or_else(|| self.invalid(format!("expected a boolean, got {}", type_name(raw))))
    }

    /// Reads a string.
    pub fn string<'v>(&self, raw: &'v Value) -> Result<&'v str, DecodeError> {
        raw.as_str()
            .ok_or_else(|| self.invalid(format!("expected a string, got {}", type_name(raw))))
    }
}
