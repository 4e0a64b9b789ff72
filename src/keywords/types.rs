//! Keywords that test the instance's kind or exact value: `type`, `enum`,
//! `const`.

use std::any::Any;
use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::Validation;

use crate::error::{DecodeError, SchemaErrors};
use crate::interop::ToJsonSchema;
use crate::schema::{DecodeContext, Keyword};
use crate::validation::{self, Scope};
use crate::value::{is_integer, json_equal, type_name};

/// One of the JSON Schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    /// A number with no fractional part.
    Integer,
}

impl InstanceType {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            _ => None,
        }
    }

    /// The name used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Number => "number",
            Self::String => "string",
            Self::Integer => "integer",
        }
    }

    /// Returns true if `value` is of this type.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Null, Value::Null)
            | (Self::Boolean, Value::Bool(_))
            | (Self::Object, Value::Object(_))
            | (Self::Array, Value::Array(_))
            | (Self::Number, Value::Number(_))
            | (Self::String, Value::String(_)) => true,
            (Self::Integer, Value::Number(n)) => is_integer(n),
            _ => false,
        }
    }
}

impl Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` keyword.
pub struct Type {
    types: Vec<InstanceType>,
    listed: bool,
}

impl Type {
    /// The accepted types.
    pub fn types(&self) -> &[InstanceType] {
        &self.types
    }

    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        let parse = |name: &Value| {
            let name = ctx.string(name)?;
            InstanceType::parse(name).ok_or_else(|| ctx.invalid(format!("unknown type '{}'", name)))
        };

        let (types, listed) = match raw {
            Value::String(_) => (vec![parse(raw)?], false),
            Value::Array(names) => {
                let types = names.iter().map(parse).collect::<Result<Vec<_>, _>>()?;
                if types.is_empty() {
                    return Err(ctx.invalid("expected at least one type"));
                }
                (types, true)
            }
            other => {
                return Err(ctx.invalid(format!(
                    "expected a type name or an array of type names, got {}",
                    type_name(other)
                )))
            }
        };
        Ok(Box::new(Self { types, listed }))
    }
}

impl Keyword for Type {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        if self.types.iter().any(|t| t.matches(value)) {
            return Validation::Success(());
        }

        let expected = self
            .types
            .iter()
            .map(InstanceType::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        validation::fail(
            scope
                .error(format!("expected {}", expected))
                .with_code("invalid_type")
                .with_expected(expected)
                .with_got(type_name(value)),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Type {
    fn to_json_schema(&self) -> Value {
        let mut names = self.types.iter().map(|t| Value::from(t.as_str()));
        if self.listed {
            Value::Array(names.collect())
        } else {
            names.next().unwrap_or(Value::Null)
        }
    }
}

/// The `enum` keyword: the instance must equal one of the listed values.
pub struct Enum(Vec<Value>);

impl Enum {
    pub(crate) fn decode(
        raw: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        match raw {
            Value::Array(values) => Ok(Box::new(Self(values.clone()))),
            other => Err(ctx.invalid(format!("expected an array, got {}", type_name(other)))),
        }
    }
}

impl Keyword for Enum {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        if self.0.iter().any(|allowed| json_equal(allowed, value)) {
            return Validation::Success(());
        }
        validation::fail(
            scope
                .error(format!("value must be one of {} allowed values", self.0.len()))
                .with_code("enum")
                .with_expected(Value::Array(self.0.clone()).to_string())
                .with_got(value.to_string()),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Enum {
    fn to_json_schema(&self) -> Value {
        Value::Array(self.0.clone())
    }
}

/// The `const` keyword: the instance must equal exactly one value.
pub struct Const(Value);

impl Const {
    pub(crate) fn decode(
        raw: &Value,
        _ctx: &DecodeContext<'_>,
    ) -> Result<Box<dyn Keyword>, DecodeError> {
        Ok(Box::new(Self(raw.clone())))
    }
}

impl Keyword for Const {
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> Validation<(), SchemaErrors> {
        if json_equal(&self.0, value) {
            return Validation::Success(());
        }
        validation::fail(
            scope
                .error(format!("value must equal {}", self.0))
                .with_code("const")
                .with_expected(self.0.to_string())
                .with_got(value.to_string()),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ToJsonSchema for Const {
    fn to_json_schema(&self) -> Value {
        self.0.clone()
    }
}
