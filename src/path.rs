//! Locations inside instances and inside schemas.
//!
//! [`InstancePath`] points at a value inside the instance being validated
//! (e.g. `users[0].email`). [`SchemaPointer`] points at a node inside a schema
//! document (e.g. `#/if/properties/foo`) and is what validation failures use to
//! report which keyword rejected the instance.

use std::fmt::{self, Display};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::DecodeError;

/// A segment of an instance path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member (e.g. `user`, `email`)
    Field(String),
    /// An array element (e.g. `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// The location of a value inside a validated instance.
///
/// Paths are immutable; `push_*` returns an extended copy so sibling
/// validations can branch off a shared parent.
///
/// # Example
///
/// ```rust
/// use verdict::InstancePath;
///
/// let path = InstancePath::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// assert_eq!(path.to_pointer(), "/users/0/email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Creates an empty path representing the whole instance.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this path addresses the whole instance.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None at the root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Renders the path as an RFC 6901 JSON pointer (`""` for the root).
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => format!("/{}", escape_token(name)),
                PathSegment::Index(idx) => format!("/{}", idx),
            })
            .collect()
    }
}

impl Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// The location of a node inside a schema document.
///
/// Every segment is a property name: keyword names (`if`, `properties`),
/// member names under map-valued keywords (`foo` in `#/properties/foo`), or
/// decimal positions under array-valued keywords (`0` in `#/allOf/0`).
///
/// # Example
///
/// ```rust
/// use verdict::SchemaPointer;
///
/// let pointer = SchemaPointer::root().push("if").push("properties").push("a/b");
/// assert_eq!(pointer.to_string(), "#/if/properties/a~1b");
///
/// let parsed = SchemaPointer::parse("#/if/properties/a~1b").unwrap();
/// assert_eq!(parsed, pointer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SchemaPointer {
    tokens: Vec<String>,
}

impl SchemaPointer {
    /// The pointer to the schema root (`#`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a URI fragment pointer such as `#` or `#/$defs/node`.
    ///
    /// The fragment is percent-decoded before the `~0`/`~1` escapes are
    /// applied, so `#/$defs/a%20b` names the definition `a b`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedReference`] when the text is not a
    /// document-local pointer (for example a relative or absolute URI, or a
    /// named anchor).
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let unsupported = || DecodeError::UnsupportedReference {
            location: SchemaPointer::root(),
            reference: text.to_string(),
        };

        let fragment = text.strip_prefix('#').ok_or_else(unsupported)?;
        let body = percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|_| unsupported())?;
        if body.is_empty() {
            return Ok(Self::root());
        }
        let body = body.strip_prefix('/').ok_or_else(unsupported)?;

        let tokens = body
            .split('/')
            .map(unescape_token)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(unsupported)?;
        Ok(Self { tokens })
    }

    /// Returns a new pointer with one more token appended.
    pub fn push(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    /// Returns true for the root pointer.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the raw (unescaped) tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Returns the last token, or None for the root.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Returns the pointer to the enclosing node, or None for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(Self {
                tokens: self.tokens[..self.tokens.len() - 1].to_vec(),
            })
        }
    }
}

impl Display for SchemaPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        for token in &self.tokens {
            write!(f, "/{}", escape_token(token))?;
        }
        Ok(())
    }
}

/// Bytes that must be percent-encoded for a token to parse back unchanged.
const FRAGMENT_ESCAPES: &AsciiSet = &CONTROLS.add(b'%');

fn escape_token(token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    utf8_percent_encode(&escaped, FRAGMENT_ESCAPES).to_string()
}

fn unescape_token(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
