//! Validation failure types.
//!
//! [`SchemaError`] records one reason an instance does not conform;
//! [`SchemaErrors`] accumulates every reason found in a single validation.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::{InstancePath, SchemaPointer};

/// A single validation failure.
///
/// Besides the human-readable message, a failure records two locations:
/// - **path**: where in the instance the offending value sits
/// - **keyword_location**: which schema keyword rejected it (e.g. `#/then/minLength`)
///
/// # Example
///
/// ```rust
/// use verdict::{InstancePath, SchemaError, SchemaPointer};
///
/// let error = SchemaError::new(InstancePath::root().push_field("name"), "too short")
///     .with_keyword_location(SchemaPointer::root().push("then").push("minLength"))
///     .with_code("min_length")
///     .with_expected("at least 3 characters")
///     .with_got("2 characters");
///
/// assert_eq!(error.keyword.as_deref(), Some("minLength"));
/// assert_eq!(error.keyword_location.to_string(), "#/then/minLength");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Location of the offending value in the instance.
    pub path: InstancePath,
    /// Location of the rejecting keyword in the schema.
    pub keyword_location: SchemaPointer,
    /// Name of the rejecting keyword; None for a `false` schema.
    pub keyword: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// The actual value that was received (formatted as string).
    pub got: Option<String>,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// Machine-readable error code (e.g. `min_length`).
    pub code: String,
}

impl SchemaError {
    /// Creates a failure at the given instance path.
    ///
    /// The keyword location defaults to the schema root and the code to
    /// `validation_error`.
    pub fn new(path: InstancePath, message: impl Into<String>) -> Self {
        Self {
            path,
            keyword_location: SchemaPointer::root(),
            keyword: None,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
        }
    }

    /// Sets the keyword location; the keyword name is taken from its last token.
    pub fn with_keyword_location(mut self, location: SchemaPointer) -> Self {
        self.keyword = location.last().map(str::to_string);
        self.keyword_location = location;
        self
    }

    /// Sets the schema location of a whole schema (not a keyword), such as a
    /// `false` schema. The keyword name is cleared.
    pub fn with_schema_location(mut self, location: SchemaPointer) -> Self {
        self.keyword = None;
        self.keyword_location = location;
        self
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the "got" (actual value) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }
        write!(f, " [{}]", self.keyword_location)
    }
}

impl std::error::Error for SchemaError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

/// A non-empty collection of validation failures.
///
/// `SchemaErrors` implements `Semigroup`, which is how a schema container
/// ANDs its keywords together: every failing keyword contributes its errors.
///
/// ```rust
/// use verdict::{InstancePath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let errors1 = SchemaErrors::single(
///     SchemaError::new(InstancePath::root().push_field("name"), "required")
/// );
/// let errors2 = SchemaErrors::single(
///     SchemaError::new(InstancePath::root().push_field("email"), "invalid format")
/// );
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a `SchemaErrors` containing a single error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `SchemaErrors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<SchemaError>) -> Self {
        Self(errors)
    }

    /// Creates a `SchemaErrors` from a vec, or None if the vec is empty.
    pub fn try_from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let first = errors.next()?;
        Some(errors.fold(Self::single(first), |acc, error| {
            acc.combine(Self::single(error))
        }))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all errors at the specified instance path.
    pub fn at_path(&self, path: &InstancePath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors raised by the keyword at the given schema location.
    pub fn at_keyword_location(&self, location: &SchemaPointer) -> Vec<&SchemaError> {
        self.0
            .iter()
            .filter(|e| &e.keyword_location == location)
            .collect()
    }

    /// Returns all errors raised by keywords with the given name.
    pub fn for_keyword(&self, keyword: &str) -> Vec<&SchemaError> {
        self.0
            .iter()
            .filter(|e| e.keyword.as_deref() == Some(keyword))
            .collect()
    }

    /// Returns all errors with the specified error code.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<SchemaError>`.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<SchemaError> {
        &self.0
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaErrors {
    type Item = &'a SchemaError;
    type IntoIter = Box<dyn Iterator<Item = &'a SchemaError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};
