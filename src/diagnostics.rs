//! Diagnostics sink: where the catalog reports non-fatal problems.
//!
//! Unknown columns on delete, unknown uids on uncatalog, failing indexes
//! during uncatalog or search, and indexes lacking a capability are all
//! reported here instead of aborting the operation.

use std::fmt;

use parking_lot::Mutex;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One reported condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The catalog operation that produced it, e.g. `uncatalog_object`.
    pub operation: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            operation,
            message: message.into(),
        }
    }

    pub fn error(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

/// Receives diagnostics from a catalog.
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!(target: "object_catalog", "{}", diagnostic),
            Severity::Error => log::error!(target: "object_catalog", "{}", diagnostic),
        }
    }
}

/// Keeps diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Number of reported diagnostics.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop everything reported so far.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl DiagnosticsSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        log::debug!(target: "object_catalog", "recorded {}", diagnostic);
        self.entries.lock().push(diagnostic);
    }
}
