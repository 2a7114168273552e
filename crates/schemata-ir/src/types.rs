//! Primitive type tags and value equality

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The primitive type names understood by `type` and `disallow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    /// Matches every present value
    Any,
}

impl PrimitiveType {
    /// All type tags in declaration order
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::Integer,
        PrimitiveType::Boolean,
        PrimitiveType::Object,
        PrimitiveType::Array,
        PrimitiveType::Null,
        PrimitiveType::Any,
    ];

    /// Look up a type tag by its schema name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// The schema name of this type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
            PrimitiveType::Null => "null",
            PrimitiveType::Any => "any",
        }
    }

    /// Whether `value` is of this type
    ///
    /// Numbers with no fractional part count as integers, so `1.0` is an
    /// integer.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => value.is_string(),
            PrimitiveType::Number => value.is_number(),
            PrimitiveType::Integer => is_integer(value),
            PrimitiveType::Boolean => value.is_boolean(),
            PrimitiveType::Object => value.is_object(),
            PrimitiveType::Array => value.is_array(),
            PrimitiveType::Null => value.is_null(),
            PrimitiveType::Any => true,
        }
    }

    /// The most specific type of `value`
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => PrimitiveType::Null,
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Number(_) if is_integer(value) => PrimitiveType::Integer,
            Value::Number(_) => PrimitiveType::Number,
            Value::String(_) => PrimitiveType::String,
            Value::Array(_) => PrimitiveType::Array,
            Value::Object(_) => PrimitiveType::Object,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

/// Structural equality where numbers compare by value (`1 == 1.0`)
#[must_use]
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| json_equal(a, b)))
        }
        _ => a == b,
    }
}
