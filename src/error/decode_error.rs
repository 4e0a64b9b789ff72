//! Errors raised while decoding a schema document.

use crate::path::SchemaPointer;

/// A schema document could not be turned into a [`Schema`](crate::Schema).
///
/// Decode errors are fatal to the node being built and propagate to the caller
/// of [`Schema::from_value`](crate::Schema::from_value); a malformed keyword is
/// never downgraded to an always-valid schema.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The raw text was not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A schema position held something other than an object or boolean.
    #[error("schema at {location} must be an object or a boolean, got {got}")]
    InvalidSchema {
        /// Where the offending node sits in the document.
        location: SchemaPointer,
        /// JSON type name of the offending node.
        got: &'static str,
    },

    /// A keyword's value has the wrong kind or is out of range.
    #[error("invalid value for '{keyword}' at {location}: {reason}")]
    InvalidKeyword {
        /// Location of the keyword.
        location: SchemaPointer,
        /// The keyword name.
        keyword: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// A `pattern` or `patternProperties` regex failed to compile.
    #[error("invalid regular expression at {location}: {source}")]
    InvalidPattern {
        /// Location of the pattern.
        location: SchemaPointer,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A `$ref` pointed outside the current document.
    #[error("unsupported reference '{reference}' at {location}: only document-local pointers are resolved")]
    UnsupportedReference {
        /// Location of the `$ref` keyword.
        location: SchemaPointer,
        /// The reference text as written.
        reference: String,
    },
}

impl DecodeError {
    /// Returns the schema location the error was raised at, if it has one.
    pub fn location(&self) -> Option<&SchemaPointer> {
        match self {
            DecodeError::Parse(_) => None,
            DecodeError::InvalidSchema { location, .. }
            | DecodeError::InvalidKeyword { location, .. }
            | DecodeError::InvalidPattern { location, .. }
            | DecodeError::UnsupportedReference { location, .. } => Some(location),
        }
    }
}
