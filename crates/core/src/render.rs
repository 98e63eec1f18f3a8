//! Human-readable rendering of values.
//!
//! Rendering always goes through [`copy`] first, so self-referencing
//! values print with a cycle marker instead of recursing forever.

use time::format_description::well_known::Rfc3339;

use crate::copy::copy;
use crate::value::Value;

/// Render a value as it appears inline in a diagnostic.
///
/// A top-level string is written as-is; strings nested in composites are
/// quoted.
pub fn render(value: &Value) -> String {
    match value {
        Value::Text(s) if !s.is_empty() => s.clone(),
        other => render_nested(other),
    }
}

/// Render a value with every string quoted.
pub fn render_nested(value: &Value) -> String {
    let mut out = String::new();
    write_value(&copy(value), &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Text(s) => out.push_str(&quote(s)),
        Value::Array(items) | Value::Arguments(items) => {
            out.push('[');
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_value(item, out);
            }
            out.push('}');
        }
        Value::Function(f) => match f.name() {
            Some(name) => {
                out.push_str("function ");
                out.push_str(name);
            }
            None => out.push_str("function"),
        },
        Value::Regex(r) => {
            out.push('/');
            out.push_str(r.as_str());
            out.push('/');
        }
        Value::Date(d) => match d.format(&Rfc3339) {
            Ok(s) => out.push_str(&s),
            Err(_) => out.push_str(&d.to_string()),
        },
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        f.to_string()
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
}
