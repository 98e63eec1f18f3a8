//! Cycle-safe deep copy.
//!
//! Used to make values safe to render in diagnostics. Validation and
//! equality never go through a copy.

use crate::value::Value;

/// Placed where a copied value would otherwise refer back to one of its
/// own ancestors.
pub const CIRCULAR: &str = "[Circular]";

/// Deep-copy `value`.
///
/// Composites are rebuilt depth-first. Before descending into a composite
/// child, its identity is checked against the composites on the current
/// path; a match is replaced by [`CIRCULAR`] and not descended into. A
/// composite reachable twice without forming a cycle is copied twice.
/// Argument lists are copied into arrays.
pub fn copy(value: &Value) -> Value {
    let mut path = Vec::new();
    copy_on_path(value, &mut path)
}

fn copy_on_path(value: &Value, path: &mut Vec<*const ()>) -> Value {
    let Some(id) = value.identity() else {
        return value.clone();
    };
    path.push(id);
    let copied = match value {
        Value::Array(items) | Value::Arguments(items) => Value::array(
            items
                .borrow()
                .iter()
                .map(|item| copy_child(item, path))
                .collect::<Vec<_>>(),
        ),
        Value::Object(map) => Value::object(
            map.borrow()
                .iter()
                .map(|(k, v)| (k.clone(), copy_child(v, path)))
                .collect::<Vec<_>>(),
        ),
        other => other.clone(),
    };
    path.pop();
    copied
}

fn copy_child(child: &Value, path: &mut Vec<*const ()>) -> Value {
    match child.identity() {
        Some(id) if path.contains(&id) => Value::from(CIRCULAR),
        _ => copy_on_path(child, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equal::equal;
    use crate::list;

    #[test]
    fn simple_values_pass_through() {
        assert!(matches!(copy(&Value::Int(4)), Value::Int(4)));
        assert_eq!(copy(&Value::from("x")).as_str(), Some("x"));
    }

    #[test]
    fn copy_is_structurally_equal_but_not_shared() {
        let inner = list![1, 2];
        let original = Value::object([("inner", inner.clone()), ("n", Value::Int(3))]);
        let copied = copy(&original);
        assert!(equal(&original, &copied));
        assert_ne!(original.identity(), copied.identity());
        let copied_inner = copied.as_object().unwrap().borrow()["inner"].clone();
        assert_ne!(copied_inner.identity(), inner.identity());
    }

    #[test]
    fn self_reference_becomes_marker() {
        let a = list![1];
        a.as_array().unwrap().borrow_mut().push(a.clone());
        let copied = copy(&a);
        let items = copied.as_array().unwrap().borrow();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Value::Int(1)));
        assert_eq!(items[1].as_str(), Some(CIRCULAR));
    }

    #[test]
    fn deep_cycle_is_cut_at_the_back_edge() {
        let outer = Value::object(Vec::<(String, Value)>::new());
        let middle = list![];
        outer
            .as_object()
            .unwrap()
            .borrow_mut()
            .insert("middle".to_string(), middle.clone());
        middle.as_array().unwrap().borrow_mut().push(outer.clone());
        let copied = copy(&outer);
        let copied_middle = copied.as_object().unwrap().borrow()["middle"].clone();
        let back = copied_middle.as_array().unwrap().borrow()[0].clone();
        assert_eq!(back.as_str(), Some(CIRCULAR));
    }

    #[test]
    fn shared_acyclic_child_is_copied_twice() {
        let shared = list!["s"];
        let parent = list![shared.clone(), shared];
        let copied = copy(&parent);
        let items = copied.as_array().unwrap().borrow();
        assert!(equal(&items[0], &list!["s"]));
        assert!(equal(&items[1], &list!["s"]));
        assert_ne!(items[0].identity(), items[1].identity());
    }

    #[test]
    fn arguments_copy_into_arrays() {
        let copied = copy(&Value::arguments([1, 2]));
        assert!(matches!(copied, Value::Array(_)));
    }
}
