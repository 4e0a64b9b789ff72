//! String keywords: `minLength`, `maxLength`, `pattern`.
//!
//! Lengths count Unicode scalar values. Non-string instances are ignored.

use std::any::Any;

use regex::Regex;
use serde_json::{Number, Value};
use stillwater::Validation;

use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::{DecodeContext, Keyword};
use crate::validation::{self, Scope};

/// Which side of the length range a [`LengthBound`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthLimit {
    Min,
    Max,
}

/// `minLength` or `maxLength`.
pub struct LengthBound {
    limit: LengthLimit,
    bound: u64,
    written: Number,
}

impl LengthBound {
    pub(crate) fn decode(
        limit: LengthLimit,
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self {
            limit,
            bound: ctx.non_negative_integer(raw)?,
            written: ctx.number(raw)?,
        }))
    }
}

impl Keyword for LengthBound {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Some(s) = value.as_str() else {
            return Validation::Success(());
        };
        let len = s.chars().count() as u64;

        match self.limit {
            LengthLimit::Min if len < self.bound => validation::fail(
                scope
                    .error(format!("length must be at least {}, got {}", self.bound, len))
                    .with_code("min_length")
                    .with_expected(format!("at least {} characters", self.bound))
                    .with_got(format!("{} characters", len)),
            ),
            LengthLimit::Max if len > self.bound => validation::fail(
                scope
                    .error(format!("length must be at most {}, got {}", self.bound, len))
                    .with_code("max_length")
                    .with_expected(format!("at most {} characters", self.bound))
                    .with_got(format!("{} characters", len)),
            ),
            _ => Validation::Success(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for LengthBound {
    fn to_json_schema(&self) -> Value {
        Value::Number(self.written.clone())
    }
}

/// The `pattern` keyword. The expression is unanchored.
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self {
            regex: compile(ctx.string(raw)?, ctx)?,
        }))
    }
}

/// Compiles a schema regex, attributing failures to the decoding location.
pub(crate) fn compile(pattern: &str, ctx: &DecodeContext<'_>) -> Result<Regex, DecodeError> {
    Regex::new(pattern).map_err(|source| DecodeError::InvalidPattern {
        location: ctx.location().clone(),
        source,
    })
}

impl Keyword for Pattern {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        match value.as_str() {
            Some(s) if !self.regex.is_match(s) => validation::fail(
                scope
                    .error(format!("must match pattern '{}'", self.regex.as_str()))
                    .with_code("pattern")
                    .with_expected(format!("string matching '{}'", self.regex.as_str()))
                    .with_got(s.to_string()),
            ),
            _ => Validation::Success(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Pattern {
    fn to_json_schema(&self) -> Value {
        Value::from(self.regex.as_str())
    }
}
