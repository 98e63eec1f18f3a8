//! Failure diagnostics.
//!
//! A diagnostic is an ordered list of fragments. String fragments are
//! prose; every other fragment is a raw value rendered inline. Rendering
//! goes through the cycle-safe copier, so a diagnostic can quote any value
//! it was given.

use std::fmt;

use vigil_core::{render, Value};

/// Build a [`Diagnostic`] from heterogeneous fragments.
macro_rules! diag {
    ($($fragment:expr),* $(,)?) => {
        $crate::diagnostic::Diagnostic::from_fragments(
            ::std::vec![$(::vigil_core::Value::from($fragment)),*]
        )
    };
}

/// An explanation of one failure.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    fragments: Vec<Value>,
}

impl Diagnostic {
    pub fn new() -> Self {
        Diagnostic::default()
    }

    pub fn from_fragments(fragments: Vec<Value>) -> Self {
        Diagnostic { fragments }
    }

    /// Interpret a value returned by a test function or predicate.
    ///
    /// An array is taken fragment by fragment; anything else becomes a
    /// single fragment.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Diagnostic::from_fragments(items.borrow().clone()),
            other => Diagnostic::from_fragments(vec![other.clone()]),
        }
    }

    pub fn push(&mut self, fragment: impl Into<Value>) {
        self.fragments.push(fragment.into());
    }

    pub fn fragments(&self) -> &[Value] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The fragments as an array value, the shape test functions return.
    pub fn to_value(&self) -> Value {
        Value::array(self.fragments.clone())
    }

    /// Render to a single line, fragments separated by spaces.
    pub fn render(&self) -> String {
        self.fragments
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
