//! Deep structural equality.

use crate::classify::classify_with;
use crate::value::Value;

/// Deep equality between two values.
///
/// Simple values compare by value: numbers numerically across integer and
/// float representations (NaN is never equal to anything), functions by
/// identity, regexes by source pattern, dates by instant. Composites must
/// have the same kind and key set, and equal values under every key.
///
/// There is no cycle detection: comparing two self-referencing values
/// recurses until the stack runs out.
pub fn equal(a: &Value, b: &Value) -> bool {
    if a.is_complex() || b.is_complex() {
        return equal_composite(a, b);
    }
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64() == b.as_f64()
        }
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        (Value::Regex(x), Value::Regex(y)) => x.as_str() == y.as_str(),
        (Value::Date(x), Value::Date(y)) => x == y,
        _ => false,
    }
}

fn equal_composite(a: &Value, b: &Value) -> bool {
    if classify_with(a, true) != classify_with(b, true) {
        return false;
    }
    match (a, b) {
        (Value::Array(x), Value::Array(y)) | (Value::Arguments(x), Value::Arguments(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| equal(l, r)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list;

    #[test]
    fn simple_values() {
        assert!(equal(&Value::Int(3), &Value::Int(3)));
        assert!(equal(&Value::Int(3), &Value::Float(3.0)));
        assert!(!equal(&Value::Int(3), &Value::from("3")));
        assert!(!equal(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
        assert!(equal(&Value::Undefined, &Value::Undefined));
        assert!(!equal(&Value::Undefined, &Value::Null));
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = Value::function(|_| Value::Null);
        let g = Value::function(|_| Value::Null);
        assert!(equal(&f, &f.clone()));
        assert!(!equal(&f, &g));
    }

    #[test]
    fn regexes_compare_by_pattern() {
        let a = Value::regex("^a+$").unwrap();
        let b = Value::regex("^a+$").unwrap();
        let c = Value::regex("^b+$").unwrap();
        assert!(equal(&a, &b));
        assert!(!equal(&a, &c));
    }

    #[test]
    fn arrays_by_position() {
        assert!(equal(&list![1, 2, 3], &list![1, 2, 3]));
        assert!(!equal(&list![1, 2, 3], &list![1, 2, "3"]));
        assert!(!equal(&list![1, 2, 3], &list![1, 2, 3, 4]));
        assert!(equal(&list![], &list![]));
    }

    #[test]
    fn objects_ignore_insertion_order() {
        let a = Value::object([("x", 1), ("y", 2)]);
        let b = Value::object([("y", 2), ("x", 1)]);
        assert!(equal(&a, &b));
        let c = Value::object([("x", 1), ("z", 2)]);
        assert!(!equal(&a, &c));
    }

    #[test]
    fn composite_kinds_must_match() {
        assert!(!equal(&list![], &Value::object(Vec::<(String, Value)>::new())));
        assert!(!equal(&list![1], &Value::arguments([1])));
        assert!(!equal(&list![1], &Value::Int(1)));
    }

    #[test]
    fn nested_structures() {
        let a = list![Value::object([("k", list![1, 2])]), "tail"];
        let b = list![Value::object([("k", list![1, 2])]), "tail"];
        let c = list![Value::object([("k", list![1, 3])]), "tail"];
        assert!(equal(&a, &b));
        assert!(!equal(&a, &c));
    }
}
