//! Rule builders.
//!
//! Shorthand for common simple rules. Every builder returns plain rule
//! data, identical to writing the array by hand.

use vigil_core::{Kind, Value};

use crate::builtin;
use crate::rule::MultiOperator;

/// `[names, value, kind]`: `value` must classify as `kind`.
pub fn is_type(names: impl Into<Value>, value: impl Into<Value>, kind: Kind) -> Value {
    Value::array([names.into(), value.into(), Value::from(kind)])
}

pub fn is_string(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::String)
}

pub fn is_integer(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Integer)
}

pub fn is_float(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Float)
}

pub fn is_array(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Array)
}

pub fn is_object(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Object)
}

pub fn is_function(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Function)
}

pub fn is_boolean(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Boolean)
}

pub fn is_undefined(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Undefined)
}

pub fn is_null(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Null)
}

pub fn is_regex(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Regex)
}

pub fn is_date(names: impl Into<Value>, value: impl Into<Value>) -> Value {
    is_type(names, value, Kind::Date)
}

fn multi(names: Value, value: Value, to: Value, op: MultiOperator) -> Value {
    Value::array([names, value, to, Value::from(op.as_str())])
}

/// `value` must have one of the kinds in `kinds`.
pub fn is_one_of(names: impl Into<Value>, value: impl Into<Value>, kinds: impl Into<Value>) -> Value {
    multi(names.into(), value.into(), kinds.into(), MultiOperator::OneOf)
}

/// Every item of `value` must have kind `kind`.
pub fn is_each(names: impl Into<Value>, value: impl Into<Value>, kind: impl Into<Value>) -> Value {
    multi(names.into(), value.into(), kind.into(), MultiOperator::Each)
}

/// Every item of `value` must have one of the kinds in `kinds`.
pub fn is_each_of(names: impl Into<Value>, value: impl Into<Value>, kinds: impl Into<Value>) -> Value {
    multi(names.into(), value.into(), kinds.into(), MultiOperator::EachOf)
}

pub fn equals(names: impl Into<Value>, value: impl Into<Value>, expected: impl Into<Value>) -> Value {
    Value::array([names.into(), value.into(), expected.into(), builtin::equal().into()])
}

pub fn not_equals(names: impl Into<Value>, value: impl Into<Value>, expected: impl Into<Value>) -> Value {
    Value::array([names.into(), value.into(), expected.into(), builtin::not_equal().into()])
}

/// `range` is an object of `min`, `max`, `less` and `more` bounds.
pub fn is_in_range(names: impl Into<Value>, value: impl Into<Value>, range: impl Into<Value>) -> Value {
    Value::array([names.into(), value.into(), range.into(), builtin::range().into()])
}

pub fn matches(names: impl Into<Value>, value: impl Into<Value>, pattern: impl Into<Value>) -> Value {
    Value::array([names.into(), value.into(), pattern.into(), builtin::matches().into()])
}

/// Apply `rule` only when `value` is defined.
pub fn optional(value: &Value, rule: Value) -> Value {
    Value::array([Value::Bool(!value.is_undefined()), Value::array([rule])])
}
