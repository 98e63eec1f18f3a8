//! Dynamic runtime values.
//!
//! A [`Value`] is any datum the engine can be asked to validate. Composite
//! values (arrays, objects, argument lists) are shared references, so a
//! value graph may contain reference cycles and two composites can be
//! compared by identity. All other variants are held inline.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use regex::Regex;
use time::OffsetDateTime;

use crate::render;

/// Shared, mutable list storage used by arrays and argument lists.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared, mutable key/value storage used by objects.
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Value>>>;

// ──────────────────────────────────────────────
// Functions
// ──────────────────────────────────────────────

/// A callable value.
///
/// Functions take a slice of positional arguments and return a value.
/// Missing arguments are the caller's business; by convention a function
/// treats an absent argument as [`Value::Undefined`].
#[derive(Clone)]
pub struct Function {
    name: Option<String>,
    call: Rc<dyn Fn(&[Value]) -> Value>,
}

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Function {
            name: None,
            call: Rc::new(f),
        }
    }

    /// Build a function carrying a name, shown when the function is rendered.
    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Function {
            name: Some(name.into()),
            call: Rc::new(f),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }

    /// Identity comparison: true only for clones of the same function.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Function({})", name),
            None => write!(f, "Function"),
        }
    }
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Array(ArrayRef),
    Object(ObjectRef),
    /// An argument list: array-shaped, but classified as an object unless
    /// the caller asks to tell the two apart.
    Arguments(ArrayRef),
    Function(Function),
    Regex(Regex),
    Date(OffsetDateTime),
}

impl Value {
    pub fn array<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Array(Rc::new(RefCell::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn arguments<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Arguments(Rc::new(RefCell::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn object<I, K, V>(entries: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(Rc::new(RefCell::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )))
    }

    pub fn function<F>(f: F) -> Value
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Value::Function(Function::new(f))
    }

    /// A zero-argument function producing a value on demand.
    pub fn thunk<F>(f: F) -> Value
    where
        F: Fn() -> Value + 'static,
    {
        Value::Function(Function::new(move |_| f()))
    }

    /// Compile `pattern` into a regex value.
    pub fn regex(pattern: &str) -> Result<Value, regex::Error> {
        Regex::new(pattern).map(Value::Regex)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True for arrays, objects and argument lists.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Arguments(_)
        )
    }

    /// True for anything that is neither complex nor undefined.
    pub fn is_simple(&self) -> bool {
        !self.is_complex() && !self.is_undefined()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(items) | Value::Arguments(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Address of the shared storage behind a composite value.
    ///
    /// Two composites with the same identity are the same node in the value
    /// graph. Non-composite values have no identity.
    pub fn identity(&self) -> Option<*const ()> {
        match self {
            Value::Array(items) | Value::Arguments(items) => Some(Rc::as_ptr(items) as *const ()),
            Value::Object(map) => Some(Rc::as_ptr(map) as *const ()),
            _ => None,
        }
    }

    /// Keys of a composite value: stringified indices for arrays and
    /// argument lists, field names for objects. Empty for anything else.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Array(items) | Value::Arguments(items) => {
                (0..items.borrow().len()).map(|i| i.to_string()).collect()
            }
            Value::Object(map) => map.borrow().keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::render_nested(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::render(self))
    }
}

// ──────────────────────────────────────────────
// Conversions
// ──────────────────────────────────────────────

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i)
            .map(Value::Int)
            .unwrap_or(Value::Float(i as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<Regex> for Value {
    fn from(r: Regex) -> Self {
        Value::Regex(r)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(d: OffsetDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::array(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::array(items),
            serde_json::Value::Object(map) => Value::object(map),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

/// Build an array value from heterogeneous items.
///
/// ```
/// use vigil_core::{list, Value};
///
/// let rule = list!["age", 30, "integer"];
/// assert_eq!(rule.keys().len(), 3);
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::Value::array(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Value::array(::std::vec![$($crate::Value::from($item)),+])
    };
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_identity_is_shared_by_clones() {
        let a = list![1, 2];
        let b = a.clone();
        let c = list![1, 2];
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
        assert!(Value::Int(1).identity().is_none());
    }

    #[test]
    fn keys_of_arrays_and_objects() {
        assert_eq!(list!["a", "b"].keys(), vec!["0", "1"]);
        let obj = Value::object([("b", 1), ("a", 2)]);
        assert_eq!(obj.keys(), vec!["a", "b"]);
        assert!(Value::from("text").keys().is_empty());
    }

    #[test]
    fn simple_and_complex() {
        assert!(Value::Int(1).is_simple());
        assert!(Value::Null.is_simple());
        assert!(!Value::Undefined.is_simple());
        assert!(!Value::Undefined.is_complex());
        assert!(list![].is_complex());
        assert!(Value::arguments([1]).is_complex());
        assert!(Value::object(Vec::<(String, Value)>::new()).is_complex());
    }

    #[test]
    fn from_json() {
        let v = Value::from(serde_json::json!({
            "limit": 10,
            "ratio": 0.5,
            "tags": ["a", null],
            "on": true
        }));
        let map = v.as_object().unwrap().borrow();
        assert!(matches!(map["limit"], Value::Int(10)));
        assert!(matches!(map["ratio"], Value::Float(f) if f == 0.5));
        assert!(matches!(map["on"], Value::Bool(true)));
        let tags = map["tags"].as_array().unwrap().borrow();
        assert_eq!(tags[0].as_str(), Some("a"));
        assert!(matches!(tags[1], Value::Null));
    }

    #[test]
    fn option_maps_to_undefined() {
        assert!(Value::from(None::<i64>).is_undefined());
        assert!(matches!(Value::from(Some(3)), Value::Int(3)));
    }

    #[test]
    fn thunk_ignores_arguments() {
        let t = Value::thunk(|| Value::from("built"));
        let f = t.as_function().unwrap();
        assert_eq!(f.call(&[Value::Int(1)]).as_str(), Some("built"));
        assert!(f.ptr_eq(&f.clone()));
    }

    #[test]
    fn self_referencing_debug_terminates() {
        let a = list![1];
        a.as_array().unwrap().borrow_mut().push(a.clone());
        assert_eq!(format!("{:?}", a), "[1, \"[Circular]\"]");
    }
}
