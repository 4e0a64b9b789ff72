//! Numeric keywords: `minimum`, `maximum`, `exclusiveMinimum`,
//! `exclusiveMaximum` and `multipleOf`.
//!
//! Non-numeric instances are ignored. Integers are compared exactly; anything
//! involving a float falls back to `f64`.

use std::any::Any;
use std::cmp::Ordering;

use serde_json::{Number, Value};
use stillwater::Validation;

use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::{DecodeContext, Keyword};
use crate::validation::{self, Scope};

/// Which comparison a [`NumericBound`] performs against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// `value >= limit`
    Minimum,
    /// `value <= limit`
    Maximum,
    /// `value > limit`
    ExclusiveMinimum,
    /// `value < limit`
    ExclusiveMaximum,
}

impl BoundKind {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            BoundKind::Minimum => ordering != Ordering::Less,
            BoundKind::Maximum => ordering != Ordering::Greater,
            BoundKind::ExclusiveMinimum => ordering == Ordering::Greater,
            BoundKind::ExclusiveMaximum => ordering == Ordering::Less,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BoundKind::Minimum => "min_value",
            BoundKind::Maximum => "max_value",
            BoundKind::ExclusiveMinimum => "exclusive_min_value",
            BoundKind::ExclusiveMaximum => "exclusive_max_value",
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            BoundKind::Minimum => ">=",
            BoundKind::Maximum => "<=",
            BoundKind::ExclusiveMinimum => ">",
            BoundKind::ExclusiveMaximum => "<",
        }
    }
}

/// A range keyword.
pub struct NumericBound {
    kind: BoundKind,
    limit: Number,
}

impl NumericBound {
    pub(crate) fn decode(
        kind: BoundKind,
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self {
            kind,
            limit: ctx.number(raw)?,
        }))
    }
}

impl Keyword for NumericBound {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        let Value::Number(n) = value else {
            return Validation::Success(());
        };

        match compare(n, &self.limit) {
            Some(ordering) if self.kind.accepts(ordering) => Validation::Success(()),
            _ => validation::fail(
                scope
                    .error(format!(
                        "value must be {} {}, got {}",
                        self.kind.relation(),
                        self.limit,
                        n
                    ))
                    .with_code(self.kind.code())
                    .with_expected(format!("value {} {}", self.kind.relation(), self.limit))
                    .with_got(n.to_string()),
            ),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for NumericBound {
    fn to_json_schema(&self) -> Value {
        Value::Number(self.limit.clone())
    }
}

/// The `multipleOf` keyword.
pub struct MultipleOf(Number);

impl MultipleOf {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        let divisor = ctx.number(raw)?;
        if !divisor.as_f64().is_some_and(|d| d > 0.0) {
            return Err(ctx.invalid(format!("expected a number greater than 0, got {}", divisor)));
        }
        Ok(Box::new(Self(divisor)))
    }

    fn divides(&self, n: &Number) -> bool {
        if let (Some(value), Some(divisor)) = (exact_integer(n), exact_integer(&self.0)) {
            return value % divisor == 0;
        }
        match (n.as_f64(), self.0.as_f64()) {
            (Some(value), Some(divisor)) => {
                let quotient = (value / divisor).round();
                if !quotient.is_finite() {
                    return false;
                }
                let remainder = (value - divisor * quotient).abs();
                // Rounding error grows with the magnitude of the value.
                let tolerance = (divisor * 1e-9).max(value.abs() * f64::EPSILON * 4.0);
                remainder <= tolerance
            }
            _ => false,
        }
    }
}

/// Returns the number as an exact integer when it has no fractional part.
fn exact_integer(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < 1.0e38).then(|| f as i128)
}

impl Keyword for MultipleOf {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        match value {
            Value::Number(n) if !self.divides(n) => validation::fail(
                scope
                    .error(format!("value must be a multiple of {}, got {}", self.0, n))
                    .with_code("multiple_of")
                    .with_expected(format!("multiple of {}", self.0))
                    .with_got(n.to_string()),
            ),
            _ => Validation::Success(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for MultipleOf {
    fn to_json_schema(&self) -> Value {
        Value::Number(self.0.clone())
    }
}

fn compare(value: &Number, limit: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (value.as_i64(), limit.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (value.as_u64(), limit.as_u64()) {
        return Some(a.cmp(&b));
    }
    value.as_f64()?.partial_cmp(&limit.as_f64()?)
}
