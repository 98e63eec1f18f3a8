//! Destinations for printed diagnostics.
//!
//! The engine owns its sink, so any rendering state (the elapsed-time
//! baseline of [`ConsoleSink`]) lives with that engine and nowhere else.

use std::io::{self, Stderr, Write};
use std::time::Instant;

use crate::diagnostic::Diagnostic;

const BLOCK_DELIMITER: &str = "----";

/// Receives every failure evaluated in print mode.
pub trait DiagnosticSink {
    /// `label` is the validated function's label, or `"validation"`.
    fn render(&mut self, label: &str, diagnostic: &Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn render(&mut self, label: &str, diagnostic: &Diagnostic) {
        (**self).render(label, diagnostic)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn render(&mut self, label: &str, diagnostic: &Diagnostic) {
        (**self).render(label, diagnostic)
    }
}

// ──────────────────────────────────────────────
// Console
// ──────────────────────────────────────────────

/// Writes each diagnostic between dashed delimiters, prefixed with the
/// milliseconds elapsed since the sink was created.
#[derive(Debug)]
pub struct ConsoleSink<W: Write = Stderr> {
    out: W,
    started: Instant,
}

impl ConsoleSink<Stderr> {
    pub fn new() -> Self {
        ConsoleSink::with_writer(io::stderr())
    }
}

impl Default for ConsoleSink<Stderr> {
    fn default() -> Self {
        ConsoleSink::new()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        ConsoleSink {
            out,
            started: Instant::now(),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticSink for ConsoleSink<W> {
    fn render(&mut self, label: &str, diagnostic: &Diagnostic) {
        let elapsed = self.started.elapsed().as_millis();
        // A failed write must not turn a validation failure into a panic.
        let _ = writeln!(
            self.out,
            "\n{BLOCK_DELIMITER}\n({elapsed}ms) {label} failed: {diagnostic}\n{BLOCK_DELIMITER}"
        );
        let _ = self.out.flush();
    }
}

// ──────────────────────────────────────────────
// Tracing
// ──────────────────────────────────────────────

/// Emits each diagnostic as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn render(&mut self, label: &str, diagnostic: &Diagnostic) {
        tracing::warn!(label, diagnostic = %diagnostic, "validation failed");
    }
}

// ──────────────────────────────────────────────
// Memory
// ──────────────────────────────────────────────

/// Keeps every `(label, rendered diagnostic)` pair.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub entries: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Rendered diagnostics, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, message)| message.as_str())
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|(_, message)| message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn render(&mut self, label: &str, diagnostic: &Diagnostic) {
        self.entries.push((label.to_string(), diagnostic.render()));
    }
}
