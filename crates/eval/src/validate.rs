//! Pre-flight shape check of a rule.
//!
//! Only the rule at hand is inspected. Members of a list or guard are
//! checked when the evaluator recurses into them.

use vigil_core::{classify, Value};

use crate::diagnostic::Diagnostic;
use crate::rule::{is_names, MultiOperator};

/// Check that `rule` has a shape the evaluator understands.
pub fn validate_rule(rule: &Value) -> Result<(), Diagnostic> {
    let items = match rule {
        Value::Function(_) | Value::Bool(_) => return Ok(()),
        Value::Array(items) => items.borrow(),
        other => {
            return Err(diag![
                "each rule should be a function, a boolean or an array but instead is",
                other,
                "with type",
                classify(other)
            ])
        }
    };

    // Anything not led by names is a list or guard of rules.
    match items.first() {
        Some(first) if is_names(first) => {}
        _ => return Ok(()),
    }

    if !(3..=5).contains(&items.len()) {
        return Err(diag![
            "a simple rule should have between 3 and 5 elements but instead has",
            items.len(),
            "elements:",
            rule
        ]);
    }

    let mut multi_at: Option<usize> = None;
    let mut test_at: Option<usize> = None;
    for (index, option) in items.iter().enumerate().skip(3) {
        match option {
            Value::Text(op) => {
                if MultiOperator::parse(op).is_none() {
                    return Err(diag![
                        "element",
                        index,
                        "of a simple rule should be one of",
                        MultiOperator::names(),
                        "or a test function but instead is",
                        op.as_str(),
                        "in rule",
                        rule
                    ]);
                }
                if let Some(first) = multi_at {
                    return Err(diag![
                        "element",
                        index,
                        "of a simple rule is a second multi operator; the first is element",
                        first,
                        "in rule",
                        rule
                    ]);
                }
                multi_at = Some(index);
            }
            Value::Function(_) => {
                if let Some(first) = test_at {
                    return Err(diag![
                        "element",
                        index,
                        "of a simple rule is a second test function; the first is element",
                        first,
                        "in rule",
                        rule
                    ]);
                }
                test_at = Some(index);
            }
            other => {
                return Err(diag![
                    "element",
                    index,
                    "of a simple rule should be a multi operator or a test function but instead is",
                    other,
                    "with type",
                    classify(other)
                ])
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::list;

    fn test_fn() -> Value {
        Value::function(|_| Value::Bool(true))
    }

    #[test]
    fn accepts_functions_booleans_and_containers() {
        assert!(validate_rule(&Value::Bool(false)).is_ok());
        assert!(validate_rule(&Value::thunk(|| Value::Int(3))).is_ok());
        assert!(validate_rule(&list![]).is_ok());
        assert!(validate_rule(&list![true, list![1, 2]]).is_ok());
        // Containers are not inspected beyond their first element.
        assert!(validate_rule(&list![1, 2, 3, 4]).is_ok());
    }

    #[test]
    fn rejects_other_kinds() {
        let err = validate_rule(&Value::regex("a").unwrap()).unwrap_err();
        assert!(err.render().ends_with("with type regex"));
        assert!(validate_rule(&Value::Int(3)).is_err());
        assert!(validate_rule(&Value::Undefined).is_err());
    }

    #[test]
    fn simple_rule_length() {
        assert!(validate_rule(&list!["array", Value::Null, "array"]).is_ok());
        let err = validate_rule(&list!["a", 1]).unwrap_err();
        assert!(err.render().contains("instead has 2 elements"));
        let err = validate_rule(&list!["a", 1, 2, "each", test_fn(), 6]).unwrap_err();
        assert!(err.render().contains("instead has 6 elements"));
    }

    #[test]
    fn simple_rule_options() {
        assert!(validate_rule(&list!["a", 1, list![1], "oneOf"]).is_ok());
        assert!(validate_rule(&list!["a", 1, list![1], test_fn(), "eachOf"]).is_ok());
        assert!(validate_rule(&list![list!["a", "b"], 1, 2, "each", test_fn()]).is_ok());

        let err = validate_rule(&list!["a", 1, 2, "one_of"]).unwrap_err();
        assert!(err.render().starts_with("element 3 of a simple rule should be one of"));

        let err = validate_rule(&list!["a", 1, 2, "each", "oneOf"]).unwrap_err();
        assert!(err.render().starts_with("element 4 of a simple rule is a second multi operator"));

        let err = validate_rule(&list!["a", 1, 2, test_fn(), test_fn()]).unwrap_err();
        assert!(err.render().starts_with("element 4 of a simple rule is a second test function"));

        let err = validate_rule(&list!["a", 1, 2, 4]).unwrap_err();
        assert!(err.render().ends_with("with type integer"));
    }
}
