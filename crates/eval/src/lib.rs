//! vigil-eval: declarative validation of runtime values.
//!
//! A rule is plain [`Value`](vigil_core::Value) data describing
//! constraints on some input. The [`Engine`] evaluates a rule tree to a
//! [`Verdict`]; on failure it produces a [`Diagnostic`] and delivers it
//! through a [`Report`] channel.
//!
//! ```
//! use vigil_core::list;
//! use vigil_eval::{builtin, Engine};
//!
//! let mut engine = Engine::new();
//! let ok = engine.v(&list![
//!     list!["age", 30, "integer"],
//!     list!["role", "admin", list!["admin", "editor"], "oneOf", builtin::equal()],
//! ]);
//! assert!(ok);
//! ```

#[macro_use]
pub mod diagnostic;

pub mod builders;
pub mod builtin;
pub mod engine;
pub mod options;
pub mod report;
pub mod rule;
pub mod sink;
pub mod test_fn;
pub mod validate;

pub use diagnostic::Diagnostic;
pub use engine::{Engine, Failure, DEFAULT_LABEL};
pub use options::{EngineOptions, OptionsError};
pub use report::{Report, ReportError, Verdict};
pub use rule::{is_names, MultiOperator, Names, SimpleRule};
pub use sink::{ConsoleSink, DiagnosticSink, MemorySink, TracingSink};
pub use test_fn::{make_test, make_test_with, Clauses, FinalClause, TestCall, TestFunction};
pub use validate::validate_rule;
