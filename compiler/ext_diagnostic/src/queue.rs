//! Diagnostic collection.
//!
//! Features:
//! - [`DiagnosticSink`] capability the rewriter reports through
//! - Error limit (the unit is still marked failed past the limit)
//! - Deduplication of identical diagnostics at the same span
//! - Stable ordering by source position on flush

use ext_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Write-only diagnostic channel.
///
/// Reporting never aborts the current pass; an error only marks the
/// compilation unit as failed.
pub trait DiagnosticSink {
    /// Record a diagnostic of any severity.
    fn emit(&mut self, diag: Diagnostic);

    /// Record an error and get proof it was reported.
    fn error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "`error` called with {}", diag.severity);
        self.emit(diag);
        ErrorGuaranteed::new()
    }

    /// Record an informational warning.
    fn warning(&mut self, diag: Diagnostic) {
        debug_assert!(!diag.is_error(), "`warning` called with an error");
        self.emit(diag);
    }
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// A config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// In-memory [`DiagnosticSink`].
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// let guarantee = queue.error(diagnostic);
/// // ... rewrite continues
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Every error reported, including those dropped by the limit.
    error_count: usize,
    /// Errors dropped because the limit was reached.
    suppressed: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a queue with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic. Returns `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();
        if is_error {
            self.error_count += 1;
        }

        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }

        if is_error && self.limit_reached() {
            self.suppressed += 1;
            return false;
        }

        self.diagnostics.push(diag);
        true
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.kept_errors() >= self.config.error_limit
    }

    fn kept_errors(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of errors reported (including suppressed ones).
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Proof that errors were emitted, if any were.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    ///
    /// Diagnostics without a primary span sort last. If errors were dropped
    /// by the limit, a trailing "too many errors" diagnostic is appended.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by_key(|d| d.primary_span().map_or((1, Span::DUMMY), |s| (0, s)));

        if self.suppressed > 0 {
            result.push(too_many_errors(self.config.error_limit, self.suppressed));
        }

        self.error_count = 0;
        self.suppressed = 0;
        result
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn emit(&mut self, diag: Diagnostic) {
        self.add(diag);
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
fn too_many_errors(limit: usize, suppressed: usize) -> Diagnostic {
    Diagnostic::new(ErrorCode::E9002)
        .with_message(format!(
            "stopped reporting after {limit} errors ({suppressed} more not shown)"
        ))
        .with_note("raise the error limit to see every error")
}
