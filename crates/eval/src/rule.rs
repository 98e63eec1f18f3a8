//! Rule vocabulary and shape decoding.
//!
//! Rules are plain [`Value`] data. At every recursion step the evaluator
//! decodes the rule at hand into a [`Shape`], the closed set of rule kinds:
//!
//! - `true` / `false` -- an already computed outcome
//! - a function -- a thunk producing the rule to evaluate next
//! - `[condition, rules]` -- a guard: `rules` only run when `condition` holds
//! - `[names, compare, to, multi?, test?]` -- a simple rule
//! - any other array -- a list of rules, all of which must pass

use std::fmt;

use vigil_core::{Function, Value};

// ──────────────────────────────────────────────
// Names
// ──────────────────────────────────────────────

/// Shared check used wherever a simple rule must be told apart from a list
/// of rules: a string, or an array of exactly two strings.
pub fn is_names(value: &Value) -> bool {
    match value {
        Value::Text(_) => true,
        Value::Array(items) => {
            let items = items.borrow();
            items.len() == 2 && items.iter().all(|item| matches!(item, Value::Text(_)))
        }
        _ => false,
    }
}

/// Label of the value under test, plus an optional qualifier shown in
/// parentheses in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Names {
    pub label: String,
    pub qualifier: String,
}

impl Names {
    pub fn new(label: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Names {
            label: label.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Decode a names value. A bare label gets an empty qualifier.
    pub fn from_value(value: &Value) -> Option<Names> {
        if !is_names(value) {
            return None;
        }
        match value {
            Value::Text(label) => Some(Names::new(label.as_str(), "")),
            Value::Array(items) => {
                let items = items.borrow();
                Some(Names::new(
                    items[0].as_str().unwrap_or_default(),
                    items[1].as_str().unwrap_or_default(),
                ))
            }
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::array([self.label.as_str(), self.qualifier.as_str()])
    }
}

// ──────────────────────────────────────────────
// Multi operators
// ──────────────────────────────────────────────

/// Makes a simple rule iterate over its compare and/or candidate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiOperator {
    /// Every item of `compare` must pass against `to`.
    Each,
    /// `compare` must pass against at least one item of `to`.
    OneOf,
    /// Every item of `compare` must pass against at least one item of `to`.
    EachOf,
}

impl MultiOperator {
    pub const ALL: [MultiOperator; 3] = [
        MultiOperator::OneOf,
        MultiOperator::Each,
        MultiOperator::EachOf,
    ];

    pub fn parse(s: &str) -> Option<MultiOperator> {
        MultiOperator::ALL.into_iter().find(|op| op.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MultiOperator::Each => "each",
            MultiOperator::OneOf => "oneOf",
            MultiOperator::EachOf => "eachOf",
        }
    }

    /// The operator names as an array value, for diagnostics.
    pub fn names() -> Value {
        Value::array(MultiOperator::ALL.map(|op| op.as_str()))
    }
}

impl fmt::Display for MultiOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Shapes
// ──────────────────────────────────────────────

/// A decoded simple rule.
#[derive(Debug, Clone)]
pub struct SimpleRule {
    pub names: Names,
    pub compare: Value,
    pub to: Value,
    pub multi: Option<MultiOperator>,
    pub test: Option<Function>,
}

/// One recursion step's view of a rule.
#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Bool(bool),
    Thunk(Function),
    Empty,
    Guard { condition: bool, rules: Value },
    List(Vec<Value>),
    Simple(SimpleRule),
    /// Not a rule at all. Only reachable when shape validation is skipped.
    Malformed,
}

impl Shape {
    pub(crate) fn of(rule: &Value) -> Shape {
        let items = match rule {
            Value::Bool(b) => return Shape::Bool(*b),
            Value::Function(f) => return Shape::Thunk(f.clone()),
            Value::Array(items) => items.borrow(),
            _ => return Shape::Malformed,
        };
        match items.as_slice() {
            [] => Shape::Empty,
            [Value::Bool(condition), rules @ Value::Array(_)] => Shape::Guard {
                condition: *condition,
                rules: rules.clone(),
            },
            [first, rest @ ..] => match Names::from_value(first) {
                Some(names) if rest.len() >= 2 => Shape::Simple(simple_rule(names, rest)),
                Some(_) => Shape::Malformed,
                None => Shape::List(items.clone()),
            },
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Shape::Bool(_) => "boolean",
            Shape::Thunk(_) => "function",
            Shape::Empty => "empty",
            Shape::Guard { .. } => "guard",
            Shape::List(_) => "list",
            Shape::Simple(_) => "simple",
            Shape::Malformed => "malformed",
        }
    }
}

/// Decode `[compare, to, options...]`. The first multi operator string and
/// the first function among the options win; anything else is ignored.
fn simple_rule(names: Names, rest: &[Value]) -> SimpleRule {
    let mut multi = None;
    let mut test = None;
    for option in rest.iter().skip(2) {
        match option {
            Value::Text(s) if multi.is_none() => multi = MultiOperator::parse(s),
            Value::Function(f) if test.is_none() => test = Some(f.clone()),
            _ => {}
        }
    }
    SimpleRule {
        names,
        compare: rest[0].clone(),
        to: rest[1].clone(),
        multi,
        test,
    }
}
