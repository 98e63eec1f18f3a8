//! Value classification.
//!
//! Every value has exactly one [`Kind`]. Detection goes by the value's
//! variant tag, so an array or a regex built by any other part of a
//! program classifies the same way as one built here.

use std::fmt;
use std::str::FromStr;

use crate::value::Value;

/// Classification bucket of a runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Float,
    Nan,
    Infinity,
    String,
    Boolean,
    Null,
    Undefined,
    Array,
    Object,
    Arguments,
    Function,
    Regex,
    Date,
}

impl Kind {
    pub const ALL: [Kind; 14] = [
        Kind::Integer,
        Kind::Float,
        Kind::Nan,
        Kind::Infinity,
        Kind::String,
        Kind::Boolean,
        Kind::Null,
        Kind::Undefined,
        Kind::Array,
        Kind::Object,
        Kind::Arguments,
        Kind::Function,
        Kind::Regex,
        Kind::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Nan => "nan",
            Kind::Infinity => "infinity",
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Arguments => "arguments",
            Kind::Function => "function",
            Kind::Regex => "regex",
            Kind::Date => "date",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl From<Kind> for Value {
    fn from(kind: Kind) -> Self {
        Value::Text(kind.as_str().to_string())
    }
}

/// Classify a value. Argument lists report as [`Kind::Object`].
pub fn classify(value: &Value) -> Kind {
    classify_with(value, false)
}

/// Classify a value, optionally telling argument lists apart from plain
/// objects.
pub fn classify_with(value: &Value, distinguish_arguments: bool) -> Kind {
    match value {
        Value::Undefined => Kind::Undefined,
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Boolean,
        Value::Int(_) => Kind::Integer,
        Value::Float(f) => classify_number(*f),
        Value::Text(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
        Value::Arguments(_) if distinguish_arguments => Kind::Arguments,
        Value::Arguments(_) => Kind::Object,
        Value::Function(_) => Kind::Function,
        Value::Regex(_) => Kind::Regex,
        Value::Date(_) => Kind::Date,
    }
}

fn classify_number(f: f64) -> Kind {
    if f.is_nan() {
        Kind::Nan
    } else if f.is_infinite() {
        Kind::Infinity
    } else if f.fract() == 0.0 {
        Kind::Integer
    } else {
        Kind::Float
    }
}
