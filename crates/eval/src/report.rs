//! How a failed evaluation is delivered, and what it returns.

use std::fmt;

use vigil_core::{classify, Function, Value};

/// Report channel for failures.
#[derive(Default)]
pub enum Report {
    /// Render through the engine's sink and return [`Verdict::Fail`].
    #[default]
    Print,
    /// Return the rendered diagnostic as [`Verdict::Report`].
    Text,
    /// Hand the rendered diagnostic to the callback and return
    /// [`Verdict::Fail`].
    Callback(Box<dyn FnMut(&str)>),
}

impl Report {
    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        Report::Callback(Box::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Report::Print => "print",
            Report::Text => "text",
            Report::Callback(_) => "callback",
        }
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Report::{}", self.name())
    }
}

/// A report channel given as data was not one of the accepted shapes.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report channel should be undefined, true or a function but instead is {value} with type {kind}")]
    InvalidChannel { value: String, kind: String },
}

/// Decode a channel from data: `undefined` prints, `true` returns text, a
/// function is called with the text.
impl TryFrom<&Value> for Report {
    type Error = ReportError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Undefined => Ok(Report::Print),
            Value::Bool(true) => Ok(Report::Text),
            Value::Function(f) => {
                let f: Function = f.clone();
                Ok(Report::callback(move |text| {
                    f.call(&[Value::from(text)]);
                }))
            }
            other => Err(ReportError::InvalidChannel {
                value: vigil_core::render(other),
                kind: classify(other).to_string(),
            }),
        }
    }
}

/// Outcome of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    /// Failure rendered to text, produced by [`Report::Text`].
    Report(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The rendered diagnostic, when the failure was reported as text.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Report(text) => Some(text),
            _ => None,
        }
    }
}
