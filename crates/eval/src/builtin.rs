//! Built-in test functions.
//!
//! Built once per thread on first use and shared afterwards. Each accessor
//! returns a [`TestFunction`], which converts into a value for the test
//! slot of a simple rule.

use std::cmp::Ordering;

use vigil_core::{classify, equal as deep_equal, Value};

use crate::test_fn::{make_test_with, Clauses, TestFunction};

const RANGE_KEYS: [&str; 4] = ["min", "max", "less", "more"];

struct Builtins {
    type_of: TestFunction,
    equal: TestFunction,
    not_equal: TestFunction,
    range: TestFunction,
    matches: TestFunction,
}

thread_local! {
    static BUILTINS: Builtins = Builtins::build();
}

impl Builtins {
    fn build() -> Self {
        Builtins {
            type_of: make_test_with(
                "type",
                |compare, to| Value::Bool(to.as_str() == Some(classify(compare).as_str())),
                Clauses::new("should have as type")
                    .then_text("with type")
                    .then_computed(|compare, _| Value::from(classify(compare))),
            ),
            equal: make_test_with(
                "equal",
                |compare, to| Value::Bool(deep_equal(compare, to)),
                Clauses::new("should be equal to"),
            ),
            not_equal: make_test_with(
                "notEqual",
                |compare, to| Value::Bool(!deep_equal(compare, to)),
                Clauses::new("should not be equal to"),
            ),
            range: make_test_with("range", check_range, Clauses::new("should be in range")),
            matches: make_test_with("match", check_match, Clauses::new("should match")),
        }
    }
}

/// Passes iff `compare` classifies as the kind named by `to`.
/// The default test of a simple rule.
pub fn type_of() -> TestFunction {
    BUILTINS.with(|b| b.type_of.clone())
}

/// Passes iff `compare` and `to` are deeply equal.
pub fn equal() -> TestFunction {
    BUILTINS.with(|b| b.equal.clone())
}

pub fn not_equal() -> TestFunction {
    BUILTINS.with(|b| b.not_equal.clone())
}

/// `to` is an object with any of the bounds `min` (>=), `max` (<=),
/// `less` (<) and `more` (>); every bound present must hold.
pub fn range() -> TestFunction {
    BUILTINS.with(|b| b.range.clone())
}

/// `compare` is a string that must match the regex `to`.
pub fn matches() -> TestFunction {
    BUILTINS.with(|b| b.matches.clone())
}

fn check_range(compare: &Value, to: &Value) -> Value {
    let Some(bounds) = to.as_object() else {
        return Value::array([
            Value::from("range test expects an object with keys among"),
            Value::array(RANGE_KEYS),
            Value::from("but instead received"),
            to.clone(),
            Value::from("with type"),
            Value::from(classify(to)),
        ]);
    };
    let bounds = bounds.borrow();
    if let Some(key) = bounds.keys().find(|k| !RANGE_KEYS.contains(&k.as_str())) {
        return Value::array([
            Value::from("range test received an invalid key"),
            Value::from(key),
            Value::from("; valid keys are"),
            Value::array(RANGE_KEYS),
        ]);
    }
    let holds = bounds.iter().all(|(key, bound)| {
        let ordering = compare_ordered(compare, bound);
        match key.as_str() {
            "min" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            "max" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            "less" => ordering == Some(Ordering::Less),
            "more" => ordering == Some(Ordering::Greater),
            _ => false,
        }
    });
    Value::Bool(holds)
}

/// Order two values of the same family: numbers, strings or dates.
fn compare_ordered(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Date(x), Value::Date(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn check_match(compare: &Value, to: &Value) -> Value {
    let Value::Text(text) = compare else {
        return Value::array([
            Value::from("invalid compare value passed to the match test: it should be a string but instead is"),
            compare.clone(),
            Value::from("with type"),
            Value::from(classify(compare)),
        ]);
    };
    let Value::Regex(pattern) = to else {
        return Value::array([
            Value::from("invalid to value passed to the match test: it should be a regex but instead is"),
            to.clone(),
            Value::from("with type"),
            Value::from(classify(to)),
        ]);
    };
    Value::Bool(pattern.is_match(text))
}
