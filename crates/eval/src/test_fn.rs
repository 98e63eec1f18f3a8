//! Test functions and the factory that builds them.
//!
//! A test function decides whether one `compare` value passes against one
//! `to` value, and explains the failure when it does not. Rules carry test
//! functions as ordinary function values, so a [`TestFunction`] converts to
//! and from [`Value::Function`]. The positional calling convention is
//! `(caller, names, compare, to, each, of)`; a test returns `true` to pass
//! and an array of diagnostic fragments to fail.

use std::rc::Rc;

use vigil_core::{Function, Value};

use crate::diagnostic::Diagnostic;
use crate::rule::Names;

/// Arguments of a single test invocation.
#[derive(Debug, Clone, Copy)]
pub struct TestCall<'a> {
    /// Label of the function whose inputs are validated, if any.
    pub caller: Option<&'a str>,
    pub names: &'a Names,
    pub compare: &'a Value,
    pub to: &'a Value,
    /// The whole compare collection, when iterating it (`each`, `eachOf`).
    pub each: Option<&'a Value>,
    /// The whole candidate collection, when iterating it (`oneOf`, `eachOf`).
    pub of: Option<&'a Value>,
}

impl TestCall<'_> {
    fn to_args(self) -> [Value; 6] {
        [
            Value::from(self.caller),
            self.names.to_value(),
            self.compare.clone(),
            self.to.clone(),
            self.each.cloned().unwrap_or_default(),
            self.of.cloned().unwrap_or_default(),
        ]
    }
}

/// A standardized test: `Ok(())` on pass, a [`Diagnostic`] on failure.
#[derive(Debug, Clone)]
pub struct TestFunction {
    function: Function,
}

impl TestFunction {
    /// Wrap a typed test body into the positional calling convention.
    pub fn from_fn<F>(name: &str, body: F) -> Self
    where
        F: Fn(&TestCall<'_>) -> Result<(), Diagnostic> + 'static,
    {
        let function = Function::named(name, move |args| {
            let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
            let names = Names::from_value(&arg(1)).unwrap_or_default();
            let caller = arg(0);
            let (compare, to, each, of) = (arg(2), arg(3), arg(4), arg(5));
            let call = TestCall {
                caller: caller.as_str(),
                names: &names,
                compare: &compare,
                to: &to,
                each: (!each.is_undefined()).then_some(&each),
                of: (!of.is_undefined()).then_some(&of),
            };
            match body(&call) {
                Ok(()) => Value::Bool(true),
                Err(diagnostic) => diagnostic.to_value(),
            }
        });
        TestFunction { function }
    }

    /// Run the test.
    ///
    /// Test functions that were not built by this crate may return
    /// anything; `true` passes, an array is a diagnostic, and any other
    /// value is a failure quoted in a generic diagnostic.
    pub fn call(&self, call: &TestCall<'_>) -> Result<(), Diagnostic> {
        match self.function.call(&call.to_args()) {
            Value::Bool(true) => Ok(()),
            result @ Value::Array(_) => Err(Diagnostic::from_value(&result)),
            other => Err(diag![
                "test function for",
                call.names.label.as_str(),
                "did not pass and returned",
                other
            ]),
        }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }
}

impl From<Function> for TestFunction {
    fn from(function: Function) -> Self {
        TestFunction { function }
    }
}

impl From<TestFunction> for Value {
    fn from(test: TestFunction) -> Self {
        Value::Function(test.function)
    }
}

impl From<&TestFunction> for Value {
    fn from(test: &TestFunction) -> Self {
        Value::Function(test.function.clone())
    }
}

// ──────────────────────────────────────────────
// Factory
// ──────────────────────────────────────────────

/// A clause appended after the compared value in a generated diagnostic.
#[derive(Debug, Clone)]
pub enum FinalClause {
    Text(String),
    /// Called with `(compare, to)`; the result is appended.
    Computed(Function),
}

/// Wording of a generated diagnostic.
#[derive(Debug, Clone)]
pub struct Clauses {
    pub should: String,
    pub finals: Vec<FinalClause>,
}

impl Clauses {
    pub fn new(should: impl Into<String>) -> Self {
        Clauses {
            should: should.into(),
            finals: Vec::new(),
        }
    }

    pub fn then_text(mut self, clause: impl Into<String>) -> Self {
        self.finals.push(FinalClause::Text(clause.into()));
        self
    }

    pub fn then_computed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + 'static,
    {
        self.finals
            .push(FinalClause::Computed(Function::new(move |args| {
                let compare = args.first().cloned().unwrap_or_default();
                let to = args.get(1).cloned().unwrap_or_default();
                f(&compare, &to)
            })));
        self
    }

    /// Decode clauses given as data: a should-clause string, or an array
    /// `[should, finals?]` where `finals` is an array of strings and
    /// functions.
    pub fn from_value(value: &Value) -> Result<Clauses, Diagnostic> {
        let items = match value {
            Value::Text(should) => return Ok(Clauses::new(should.as_str())),
            Value::Array(items) => items.borrow().clone(),
            other => {
                return Err(diag![
                    "clauses passed to make_test should be a string or an array but instead are",
                    other
                ])
            }
        };
        let (should, finals) = match items.as_slice() {
            [Value::Text(should)] => (should, Value::Undefined),
            [Value::Text(should), finals] => (should, finals.clone()),
            _ => {
                return Err(diag![
                    "clauses passed to make_test should be [should clause, final clauses] but instead are",
                    value
                ])
            }
        };
        let mut clauses = Clauses::new(should.as_str());
        match &finals {
            Value::Undefined => {}
            Value::Array(list) => {
                for (index, clause) in list.borrow().iter().enumerate() {
                    match clause {
                        Value::Text(s) => clauses.finals.push(FinalClause::Text(s.clone())),
                        Value::Function(f) => {
                            clauses.finals.push(FinalClause::Computed(f.clone()))
                        }
                        other => {
                            return Err(diag![
                                "final clause",
                                index,
                                "passed to make_test should be a string or a function but instead is",
                                other
                            ])
                        }
                    }
                }
            }
            other => {
                return Err(diag![
                    "final clauses passed to make_test should be an array but instead are",
                    other
                ])
            }
        }
        Ok(clauses)
    }
}

/// Build a test function from a predicate and diagnostic clauses.
///
/// The predicate receives `(compare, to)` and returns `true` to pass, an
/// array to fail with that exact diagnostic, or anything else to fail with
/// the diagnostic generated from `clauses`.
pub fn make_test<P>(predicate: P, clauses: impl Into<Value>) -> Result<TestFunction, Diagnostic>
where
    P: Fn(&Value, &Value) -> Value + 'static,
{
    let clauses = Clauses::from_value(&clauses.into())?;
    Ok(make_test_with("test", predicate, clauses))
}

/// Like [`make_test`], with clauses already decoded.
pub fn make_test_with<P>(name: &str, predicate: P, clauses: Clauses) -> TestFunction
where
    P: Fn(&Value, &Value) -> Value + 'static,
{
    let clauses = Rc::new(clauses);
    TestFunction::from_fn(name, move |call| match predicate(call.compare, call.to) {
        Value::Bool(true) => Ok(()),
        custom @ Value::Array(_) => Err(Diagnostic::from_value(&custom)),
        _ => Err(generated_diagnostic(call, &clauses)),
    })
}

/// Assemble the standard failure message. The fragment order is fixed:
///
/// `[each? "each of the"] [label?] [caller? "passed to" caller] should
/// [of? "one of"] (of or to) [qualifier? "(qualifier)"]
/// (each? "but one of" each : "but instead") "is" compare finals...`
fn generated_diagnostic(call: &TestCall<'_>, clauses: &Clauses) -> Diagnostic {
    let mut d = Diagnostic::new();
    if call.each.is_some() {
        d.push("each of the");
    }
    if !call.names.label.is_empty() {
        d.push(call.names.label.as_str());
    }
    if let Some(caller) = call.caller {
        d.push("passed to");
        d.push(caller);
    }
    d.push(clauses.should.as_str());
    match call.of {
        Some(of) => {
            d.push("one of");
            d.push(of);
        }
        None => d.push(call.to),
    }
    if !call.names.qualifier.is_empty() {
        d.push(format!("({})", call.names.qualifier));
    }
    match call.each {
        Some(each) => {
            d.push("but one of");
            d.push(each);
        }
        None => d.push("but instead"),
    }
    d.push("is");
    d.push(call.compare);
    for clause in &clauses.finals {
        match clause {
            FinalClause::Text(text) => d.push(text.as_str()),
            FinalClause::Computed(f) => d.push(f.call(&[call.compare.clone(), call.to.clone()])),
        }
    }
    d
}
