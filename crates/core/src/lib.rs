//! vigil-core: the value model used by the vigil validation engine.
//!
//! Provides the dynamic [`Value`] type plus the three value-level
//! operations the engine is built on:
//!
//! - [`classify()`] -- map any value to exactly one [`Kind`]
//! - [`equal()`] -- deep structural equality
//! - [`copy()`] -- cycle-safe deep copy, used for diagnostic rendering
//!
//! [`render()`] turns a value into the text shown in diagnostics.

pub mod classify;
pub mod copy;
pub mod equal;
pub mod render;
pub mod value;

// ── Convenience re-exports ────────────────────────────────

pub use classify::{classify, classify_with, Kind, UnknownKind};
pub use copy::{copy, CIRCULAR};
pub use equal::equal;
pub use render::{render, render_nested};
pub use value::{ArrayRef, Function, ObjectRef, Value};
