//! Validation options, per-validation context, and the keyword scope.
//!
//! [`ValidationContext`] carries what every keyword in one validation call
//! shares: the root schema (for `$ref` resolution), the reference depth, and
//! the chain of references currently being followed.
//! [`Scope`] is what a single keyword sees while it runs: where it sits, which
//! instance value it is looking at, and its sibling keywords.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::{InstancePath, SchemaPointer};
use crate::schema::{Keyword, Schema, SchemaObject};

/// Default limit on how many `$ref` hops a single validation may follow.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Caller-supplied knobs for a validation run.
///
/// # Example
///
/// ```rust
/// use verdict::{Schema, ValidationOptions};
/// use serde_json::json;
///
/// let schema = Schema::from_value(&json!({"minimum": 0})).unwrap();
/// let options = ValidationOptions::default().with_max_depth(16);
///
/// assert!(schema.validate_with(&json!(4), &options).is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    max_depth: usize,
}

impl ValidationOptions {
    /// Sets the maximum `$ref` chain length.
    ///
    /// When a reference chain grows past this depth the `$ref` keyword reports
    /// a `max_depth_exceeded` failure instead of recursing further.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the maximum `$ref` chain length.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// State shared by every keyword during one validation call.
///
/// The context is read-only and cheap to copy; following a reference produces
/// a new context with the depth incremented.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    root: &'a Schema,
    depth: usize,
    max_depth: usize,
    following: Option<&'a ReferenceFrame<'a>>,
}

/// A `$ref` being followed, linked to the reference that led to it.
pub(crate) struct ReferenceFrame<'a> {
    target: &'a SchemaPointer,
    instance_path: &'a InstancePath,
    parent: Option<&'a ReferenceFrame<'a>>,
}

impl<'a> ReferenceFrame<'a> {
    pub(crate) fn new(
        target: &'a SchemaPointer,
        instance_path: &'a InstancePath,
        parent: Option<&'a ReferenceFrame<'a>>,
    ) -> Self {
        Self {
            target,
            instance_path,
            parent,
        }
    }
}

impl<'a> ValidationContext<'a> {
    /// Creates a context validating against `root`.
    pub fn new(root: &'a Schema, options: &ValidationOptions) -> Self {
        Self {
            root,
            depth: 0,
            max_depth: options.max_depth(),
            following: None,
        }
    }

    /// Returns the current depth of reference traversal.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the maximum allowed depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the schema references are resolved against.
    pub fn root(&self) -> &'a Schema {
        self.root
    }

    /// Returns true if `target` is already being followed for the value at
    /// `instance_path`. Following it again could never make progress.
    pub fn is_following(&self, target: &SchemaPointer, instance_path: &InstancePath) -> bool {
        let mut frame = self.following;
        while let Some(current) = frame {
            if current.target == target && current.instance_path == instance_path {
                return true;
            }
            frame = current.parent;
        }
        false
    }

    pub(crate) fn following(&self) -> Option<&'a ReferenceFrame<'a>> {
        self.following
    }

    /// Returns a context one reference deeper, with `frame` on top of the
    /// reference chain.
    pub(crate) fn follow<'b>(&self, frame: &'b ReferenceFrame<'b>) -> ValidationContext<'b>
    where
        'a: 'b,
    {
        ValidationContext {
            root: self.root,
            depth: self.depth + 1,
            max_depth: self.max_depth,
            following: Some(frame),
        }
    }
}

/// One keyword's view of the validation in progress.
///
/// A keyword never holds pointers to its siblings; when it needs one (as `if`
/// needs `then`/`else`) it looks it up by name in the owning container through
/// [`Scope::sibling`].
pub struct Scope<'a> {
    container: &'a SchemaObject,
    location: &'a SchemaPointer,
    keyword: &'a str,
    instance_path: &'a InstancePath,
    context: &'a ValidationContext<'a>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        container: &'a SchemaObject,
        location: &'a SchemaPointer,
        keyword: &'a str,
        instance_path: &'a InstancePath,
        context: &'a ValidationContext<'a>,
    ) -> Self {
        Self {
            container,
            location,
            keyword,
            instance_path,
            context,
        }
    }

    /// Location of the value being validated.
    pub fn instance_path(&self) -> &'a InstancePath {
        self.instance_path
    }

    /// Name of the running keyword.
    pub fn keyword(&self) -> &'a str {
        self.keyword
    }

    /// Location of the schema object holding the running keyword.
    pub fn container_location(&self) -> &'a SchemaPointer {
        self.location
    }

    /// Location of the running keyword.
    pub fn keyword_location(&self) -> SchemaPointer {
        self.location.push(self.keyword)
    }

    /// Location of a sibling keyword in the same container.
    pub fn sibling_location(&self, name: &str) -> SchemaPointer {
        self.location.push(name)
    }

    /// Looks up a sibling keyword by name and concrete type.
    ///
    /// Returns None when the container has no keyword of that name, or when it
    /// was decoded into a different type.
    pub fn sibling<K: Keyword>(&self, name: &str) -> Option<&'a K> {
        self.container.keyword_as::<K>(name)
    }

    /// The shared validation context.
    pub fn context(&self) -> &'a ValidationContext<'a> {
        self.context
    }

    /// Starts a failure attributed to the running keyword at the current
    /// instance path.
    pub fn error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::new(self.instance_path.clone(), message)
            .with_keyword_location(self.keyword_location())
    }

    /// Validates `value` against a subschema located at `location`, sharing
    /// this validation's context.
    pub fn apply(
        &self,
        schema: &Schema,
        value: &Value,
        instance_path: &InstancePath,
        location: &SchemaPointer,
    ) -> Validation<(), SchemaErrors> {
        schema.validate_in(value, instance_path, location, self.context)
    }

    /// Validates the current value against a subschema one token below this
    /// keyword (e.g. `#/allOf` + `0`).
    pub fn apply_below(
        &self,
        schema: &Schema,
        value: &Value,
        token: impl Into<String>,
    ) -> Validation<(), SchemaErrors> {
        self.apply(
            schema,
            value,
            self.instance_path,
            &self.keyword_location().push(token),
        )
    }
}

/// Folds accumulated failures into a validation result.
pub(crate) fn from_errors(errors: Vec<SchemaError>) -> Validation<(), SchemaErrors> {
    match SchemaErrors::try_from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// Shorthand for a single-failure result.
pub(crate) fn fail(error: SchemaError) -> Validation<(), SchemaErrors> {
    Validation::Failure(SchemaErrors::single(error))
}

/// Appends the failures of `result`, if any, to `errors`.
pub(crate) fn collect_into(errors: &mut Vec<SchemaError>, result: Validation<(), SchemaErrors>) {
    if let Validation::Failure(failures) = result {
        errors.extend(failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        assert_eq!(ValidationOptions::default().max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(
            ValidationOptions::default().with_max_depth(3).max_depth(),
            3
        );
    }

    #[test]
    fn test_context_depth_tracking() {
        let root = Schema::from_value(&json!(true)).unwrap();
        let options = ValidationOptions::default().with_max_depth(2);
        let context = ValidationContext::new(&root, &options);

        assert_eq!(context.depth(), 0);
        let target = SchemaPointer::root();
        let here = InstancePath::root();
        let first = ReferenceFrame::new(&target, &here, context.following());
        let once = context.follow(&first);
        let second = ReferenceFrame::new(&target, &here, once.following());
        let deeper = once.follow(&second);
        assert_eq!(deeper.depth(), 2);
        assert_eq!(deeper.max_depth(), 2);
        assert_eq!(context.depth(), 0);
    }

    #[test]
    fn test_reference_chain() {
        let root = Schema::from_value(&json!(true)).unwrap();
        let options = ValidationOptions::default();
        let context = ValidationContext::new(&root, &options);

        let target = SchemaPointer::root().push("$defs").push("node");
        let here = InstancePath::root();
        let below = here.push_field("next");
        assert!(!context.is_following(&target, &here));

        let frame = ReferenceFrame::new(&target, &here, context.following());
        let inner = context.follow(&frame);
        assert_eq!(inner.depth(), 1);
        assert!(inner.is_following(&target, &here));
        assert!(!inner.is_following(&target, &below));
        assert!(!inner.is_following(&SchemaPointer::root(), &here));
    }

    #[test]
    fn test_from_errors() {
        assert!(from_errors(Vec::new()).is_success());
        let result = from_errors(vec![SchemaError::new(InstancePath::root(), "bad")]);
        assert!(result.is_failure());
    }
}
