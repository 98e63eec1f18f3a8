//! The rule evaluator.
//!
//! `Engine::evaluate` walks a rule tree depth-first. Lists and guards
//! short-circuit on the first failing member; `oneOf` and `eachOf` exhaust
//! their candidates before concluding failure. The first failure is
//! delivered through the requested [`Report`] channel.

use vigil_core::Value;

use crate::builtin;
use crate::diagnostic::Diagnostic;
use crate::options::EngineOptions;
use crate::report::{Report, Verdict};
use crate::rule::{MultiOperator, Shape, SimpleRule};
use crate::sink::{ConsoleSink, DiagnosticSink};
use crate::test_fn::{TestCall, TestFunction};
use crate::validate::validate_rule;

/// Sink label used when the caller gave no function label.
pub const DEFAULT_LABEL: &str = "validation";

/// Why a rule tree did not pass.
#[derive(Debug, Clone)]
pub enum Failure {
    /// A rule was the literal `false`. There is nothing to report.
    Rejected,
    /// A rule failed and explained why. The diagnostic may be empty when a
    /// custom test chose to say nothing; it is still delivered.
    Diagnosed(Diagnostic),
}

impl Failure {
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Failure::Rejected => None,
            Failure::Diagnosed(diagnostic) => Some(diagnostic),
        }
    }
}

impl From<Diagnostic> for Failure {
    fn from(diagnostic: Diagnostic) -> Self {
        Failure::Diagnosed(diagnostic)
    }
}

pub struct Engine<S = ConsoleSink> {
    options: EngineOptions,
    sink: S,
}

impl Engine<ConsoleSink> {
    /// An engine printing failures to stderr.
    pub fn new() -> Self {
        Engine::with_sink(ConsoleSink::new())
    }
}

impl Default for Engine<ConsoleSink> {
    fn default() -> Self {
        Engine::new()
    }
}

impl<S: DiagnosticSink> Engine<S> {
    pub fn with_sink(sink: S) -> Self {
        Engine {
            options: EngineOptions::default(),
            sink,
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // ──────────────────────────────────────────────
    // Entry points
    // ──────────────────────────────────────────────

    /// Evaluate `rule`, delivering a failure through `report`.
    ///
    /// `label` names the function whose inputs are validated; it appears in
    /// generated diagnostics as "passed to <label>".
    pub fn evaluate(&mut self, label: Option<&str>, rule: &Value, report: Report) -> Verdict {
        match self.check(label, rule) {
            Ok(()) => Verdict::Pass,
            Err(failure) => self.deliver(label, failure, report),
        }
    }

    /// Like [`Engine::evaluate`], with the report channel given as data:
    /// `undefined`, `true` or a function. Outside production mode any
    /// other channel is reported through the sink and fails.
    pub fn evaluate_with(&mut self, label: Option<&str>, rule: &Value, report: &Value) -> Verdict {
        let report = match Report::try_from(report) {
            Ok(report) => report,
            Err(err) if !self.options.production => {
                tracing::debug!(error = %err, "rejected report channel");
                self.sink
                    .render(label.unwrap_or(DEFAULT_LABEL), &diag![err.to_string()]);
                return Verdict::Fail;
            }
            Err(_) => Report::Print,
        };
        self.evaluate(label, rule, report)
    }

    /// Evaluate without a label, printing failures. True iff `rule` passes.
    pub fn v(&mut self, rule: &Value) -> bool {
        self.evaluate(None, rule, Report::Print).is_pass()
    }

    /// True iff the evaluation did not pass, for early returns:
    /// `if engine.stop(..) { return; }`.
    pub fn stop(&mut self, label: Option<&str>, rule: &Value, report: Report) -> bool {
        !self.evaluate(label, rule, report).is_pass()
    }

    /// Evaluate `rule` and return the failure instead of reporting it.
    pub fn check(&self, label: Option<&str>, rule: &Value) -> Result<(), Failure> {
        let result = self.eval_rule(label, rule, 0);
        match &result {
            Err(Failure::Diagnosed(diagnostic)) => tracing::debug!(
                label = label.unwrap_or(DEFAULT_LABEL),
                diagnostic = %diagnostic,
                "rule failed"
            ),
            Err(Failure::Rejected) => tracing::debug!(
                label = label.unwrap_or(DEFAULT_LABEL),
                "rule rejected by a literal false"
            ),
            Ok(()) => {}
        }
        result
    }

    fn deliver(&mut self, label: Option<&str>, failure: Failure, report: Report) -> Verdict {
        let diagnostic = match failure {
            Failure::Rejected => return Verdict::Fail,
            Failure::Diagnosed(diagnostic) => diagnostic,
        };
        match report {
            Report::Print => {
                self.sink.render(label.unwrap_or(DEFAULT_LABEL), &diagnostic);
                Verdict::Fail
            }
            Report::Text => Verdict::Report(diagnostic.render()),
            Report::Callback(mut callback) => {
                callback(&diagnostic.render());
                Verdict::Fail
            }
        }
    }

    // ──────────────────────────────────────────────
    // Dispatch
    // ──────────────────────────────────────────────

    fn eval_rule(&self, caller: Option<&str>, rule: &Value, depth: usize) -> Result<(), Failure> {
        if depth > self.options.max_depth {
            return Err(Failure::from(diag![
                "rule nesting is deeper than the maximum depth of",
                self.options.max_depth,
                "at rule",
                rule
            ]));
        }
        if !self.options.production {
            validate_rule(rule)?;
        }

        let shape = Shape::of(rule);
        tracing::trace!(shape = shape.name(), depth, "evaluating rule");
        match shape {
            Shape::Bool(true) | Shape::Empty => Ok(()),
            Shape::Bool(false) => Err(Failure::Rejected),
            Shape::Thunk(f) => self.eval_rule(caller, &f.call(&[]), depth + 1),
            Shape::Guard { condition, rules } => {
                if condition {
                    self.eval_rule(caller, &rules, depth + 1)
                } else {
                    Ok(())
                }
            }
            Shape::List(rules) => rules
                .iter()
                .try_for_each(|member| self.eval_rule(caller, member, depth + 1)),
            Shape::Simple(simple) => Ok(self.eval_simple(caller, &simple)?),
            Shape::Malformed => Err(Failure::from(diag![
                "rule should be a boolean, a function or an array led by names but instead is",
                rule
            ])),
        }
    }

    fn eval_simple(&self, caller: Option<&str>, rule: &SimpleRule) -> Result<(), Diagnostic> {
        let test = match &rule.test {
            Some(f) => TestFunction::from(f.clone()),
            None => builtin::type_of(),
        };
        let run = |compare: &Value, to: &Value, each: Option<&Value>, of: Option<&Value>| {
            test.call(&TestCall {
                caller,
                names: &rule.names,
                compare,
                to,
                each,
                of,
            })
        };
        let one_of = |compare: &Value, candidates: &[Value], each: Option<&Value>| {
            let mut last = Diagnostic::new();
            for candidate in candidates {
                match run(compare, candidate, each, Some(&rule.to)) {
                    Ok(()) => return Ok(()),
                    Err(diagnostic) => last = diagnostic,
                }
            }
            Err(last)
        };

        match rule.multi {
            None => run(&rule.compare, &rule.to, None, None),
            Some(MultiOperator::Each) => members(&rule.compare)
                .iter()
                .try_for_each(|item| run(item, &rule.to, Some(&rule.compare), None)),
            Some(MultiOperator::OneOf) => {
                let candidates = members(&rule.to);
                if candidates.is_empty() {
                    return Err(no_candidates(caller, rule, MultiOperator::OneOf));
                }
                one_of(&rule.compare, &candidates, None)
            }
            Some(MultiOperator::EachOf) => {
                let items = members(&rule.compare);
                if items.is_empty() {
                    return Ok(());
                }
                let candidates = members(&rule.to);
                if candidates.is_empty() {
                    return Err(no_candidates(caller, rule, MultiOperator::EachOf));
                }
                items
                    .iter()
                    .try_for_each(|item| one_of(item, &candidates, Some(&rule.compare)))
            }
        }
    }
}

/// The items a multi operator iterates: array and argument list items,
/// object values, nothing for `undefined`, and any other value by itself.
fn members(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) | Value::Arguments(items) => items.borrow().clone(),
        Value::Object(map) => map.borrow().values().cloned().collect(),
        Value::Undefined => Vec::new(),
        other => vec![other.clone()],
    }
}

fn no_candidates(caller: Option<&str>, rule: &SimpleRule, multi: MultiOperator) -> Diagnostic {
    let mut d = Diagnostic::new();
    if !rule.names.label.is_empty() {
        d.push(rule.names.label.as_str());
    }
    if let Some(caller) = caller {
        d.push("passed to");
        d.push(caller);
    }
    if !rule.names.qualifier.is_empty() {
        d.push(format!("({})", rule.names.qualifier));
    }
    d.push("is checked with");
    d.push(multi.as_str());
    d.push("against an empty list of candidates:");
    d.push(&rule.to);
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;
    use vigil_core::list;

    fn engine() -> Engine<MemorySink> {
        Engine::with_sink(MemorySink::new())
    }

    fn text(engine: &mut Engine<MemorySink>, rule: Value) -> Option<String> {
        engine
            .evaluate(None, &rule, Report::Text)
            .message()
            .map(str::to_string)
    }

    #[test]
    fn booleans_and_empty_lists() {
        let mut e = engine();
        assert!(e.v(&Value::Bool(true)));
        assert!(e.v(&list![]));
        assert!(!e.v(&Value::Bool(false)));
        // Nothing to report for a literal false.
        assert!(e.sink().is_empty());
        assert_eq!(e.evaluate(None, &Value::Bool(false), Report::Text), Verdict::Fail);
    }

    #[test]
    fn thunks_are_called_and_their_result_evaluated() {
        let mut e = engine();
        assert!(e.v(&Value::thunk(|| list!["n", 1, "integer"])));
        assert!(!e.v(&Value::thunk(|| list!["n", "1", "integer"])));
        assert_eq!(
            e.sink().last(),
            Some("n should have as type integer but instead is 1 with type string")
        );
    }

    #[test]
    fn list_short_circuits() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let rule = list![
            list!["a", 1, "string"],
            Value::thunk(move || {
                counter.set(counter.get() + 1);
                Value::Bool(true)
            })
        ];
        assert!(!engine().v(&rule));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn guard_skips_rules_when_false() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let thunk = Value::thunk(move || {
            counter.set(counter.get() + 1);
            Value::Bool(false)
        });
        let mut e = engine();
        assert!(e.v(&list![false, list![thunk.clone()]]));
        assert_eq!(calls.get(), 0);
        assert!(!e.v(&list![true, list![thunk]]));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn caller_label_reaches_diagnostics_and_sink() {
        let mut e = engine();
        let verdict = e.evaluate(Some("createUser"), &list!["age", "x", "integer"], Report::Print);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(e.sink().entries[0].0, "createUser");
        assert_eq!(
            e.sink().entries[0].1,
            "age passed to createUser should have as type integer but instead is x with type string"
        );
        e.v(&list!["age", "x", "integer"]);
        assert_eq!(e.sink().entries[1].0, DEFAULT_LABEL);
    }

    #[test]
    fn each_iterates_compare() {
        let mut e = engine();
        assert!(e.v(&list!["ids", list![1, 2, 3], "integer", "each"]));
        assert!(e.v(&list!["ids", list![], "integer", "each"]));
        assert!(e.v(&list!["ids", Value::Undefined, "integer", "each"]));
        assert!(e.v(&list!["ids", Value::object([("a", 1), ("b", 2)]), "integer", "each"]));
        // A lone value is a single item.
        assert!(e.v(&list!["ids", 4, "integer", "each"]));
        assert_eq!(
            text(&mut e, list!["ids", list![1, "2"], "integer", "each"]),
            Some(
                "each of the ids should have as type integer but one of [1, \"2\"] is 2 with type string"
                    .to_string()
            )
        );
    }

    #[test]
    fn one_of_reports_last_candidate() {
        let mut e = engine();
        assert!(e.v(&list!["id", "x", list!["integer", "string"], "oneOf"]));
        assert_eq!(
            text(&mut e, list!["id", true, list!["integer", "string"], "oneOf"]),
            Some(
                "id should have as type one of [\"integer\", \"string\"] but instead is true with type boolean"
                    .to_string()
            )
        );
    }

    #[test]
    fn one_of_and_each_of_need_candidates() {
        let mut e = engine();
        let message = text(&mut e, list!["role", "admin", list![], "oneOf"]).unwrap();
        assert_eq!(message, "role is checked with oneOf against an empty list of candidates: []");
        assert!(text(&mut e, list!["role", list!["a"], Value::Undefined, "eachOf"]).is_some());
        // Empty compare wins over empty candidates.
        assert!(e.v(&list!["role", list![], list![], "eachOf"]));
    }

    #[test]
    fn each_of_checks_every_item() {
        let equal = Value::from(builtin::equal());
        let mut e = engine();
        assert!(e.v(&list!["tags", list!["a", "b"], list!["a", "b", "c"], "eachOf", equal.clone()]));
        assert_eq!(
            text(&mut e, list!["tags", list!["a", "z"], list!["a", "b"], equal, "eachOf"]),
            Some(
                "each of the tags should be equal to one of [\"a\", \"b\"] but one of [\"a\", \"z\"] is z"
                    .to_string()
            )
        );
    }

    #[test]
    fn invalid_rules_fail_with_diagnostic() {
        let mut e = engine();
        let message = text(&mut e, Value::Int(3)).unwrap();
        assert!(message.starts_with("each rule should be"), "{}", message);
        let message = text(&mut e, list![list!["a", 1]]).unwrap();
        assert!(message.contains("between 3 and 5 elements"), "{}", message);
    }

    #[test]
    fn production_skips_validation() {
        let mut e = engine().with_options(EngineOptions::production());
        // An unknown operator is ignored rather than rejected.
        assert!(e.v(&list!["n", 1, "integer", "one_of"]));
        let message = text(&mut e, Value::Int(3)).unwrap();
        assert!(message.starts_with("rule should be a boolean"), "{}", message);
    }

    #[test]
    fn depth_guard() {
        fn nest(depth: usize) -> Value {
            (0..depth).fold(Value::Bool(true), |rule, _| list![rule])
        }
        let mut e = engine().with_options(EngineOptions::default().with_max_depth(10));
        assert!(e.v(&nest(10)));
        let message = text(&mut e, nest(11)).unwrap();
        assert!(message.starts_with("rule nesting is deeper than the maximum depth of 10"));
    }

    #[test]
    fn report_channels() {
        let mut e = engine();
        let failing = list!["age", "30", "integer"];

        let seen = Rc::new(std::cell::RefCell::new(String::new()));
        let out = seen.clone();
        let verdict = e.evaluate(None, &failing, Report::callback(move |text| *out.borrow_mut() = text.to_string()));
        assert_eq!(verdict, Verdict::Fail);
        assert!(seen.borrow().contains("with type string"));
        assert!(e.sink().is_empty());

        assert!(e.stop(None, &failing, Report::Text));
        assert!(!e.stop(None, &list!["age", 30, "integer"], Report::Print));
    }

    #[test]
    fn evaluate_with_validates_channel() {
        let mut e = engine();
        let rule = list!["age", 30, "integer"];
        assert_eq!(e.evaluate_with(None, &rule, &Value::Int(1)), Verdict::Fail);
        assert!(e.sink().last().unwrap().starts_with("report channel should be"));

        let mut prod = engine().with_options(EngineOptions::production());
        assert_eq!(prod.evaluate_with(None, &rule, &Value::Int(1)), Verdict::Pass);
        assert!(matches!(
            e.evaluate_with(None, &list!["age", "30", "integer"], &Value::Bool(true)),
            Verdict::Report(_)
        ));
    }

    #[test]
    fn empty_custom_diagnostic_is_still_delivered() {
        let silent = crate::test_fn::make_test(|_, _| list![], "should pass").unwrap();
        let rule = list!["x", 1, 2, silent];

        let mut e = engine();
        assert_eq!(
            e.evaluate(None, &rule, Report::Text),
            Verdict::Report(String::new())
        );
        assert!(!e.v(&rule));
        assert_eq!(e.sink().len(), 1);
        assert_eq!(e.sink().last(), Some(""));
        assert!(matches!(
            e.check(None, &rule),
            Err(Failure::Diagnosed(d)) if d.is_empty()
        ));
        assert!(matches!(e.check(None, &Value::Bool(false)), Err(Failure::Rejected)));
    }

    /// A test comparing by equality that counts its invocations.
    fn counting_equal(calls: &Rc<Cell<usize>>) -> Value {
        let calls = calls.clone();
        let test = crate::test_fn::make_test(
            move |compare, to| {
                calls.set(calls.get() + 1);
                Value::Bool(vigil_core::equal(compare, to))
            },
            "should be equal to",
        )
        .unwrap();
        Value::from(test)
    }

    #[test]
    fn each_stops_at_first_failing_item() {
        let calls = Rc::new(Cell::new(0));
        let rule = list!["xs", list![1, 9, 9, 9], 1, "each", counting_equal(&calls)];
        assert!(!engine().v(&rule));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn one_of_stops_at_first_passing_candidate() {
        let calls = Rc::new(Cell::new(0));
        let rule = list!["x", 1, list![1, 2, 3], "oneOf", counting_equal(&calls)];
        assert!(engine().v(&rule));
        assert_eq!(calls.get(), 1);

        // A failing oneOf tries every candidate.
        calls.set(0);
        let rule = list!["x", 9, list![1, 2, 3], "oneOf", counting_equal(&calls)];
        assert!(!engine().v(&rule));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn each_of_stops_after_an_item_exhausts_candidates() {
        let calls = Rc::new(Cell::new(0));
        let rule = list!["xs", list![9, 1], list![1, 2, 3], "eachOf", counting_equal(&calls)];
        assert!(!engine().v(&rule));
        assert_eq!(calls.get(), 3);

        calls.set(0);
        let rule = list!["xs", list![2, 1], list![1, 2, 3], "eachOf", counting_equal(&calls)];
        assert!(engine().v(&rule));
        // 2 matches on the second candidate, 1 on the first.
        assert_eq!(calls.get(), 3);
    }
}
