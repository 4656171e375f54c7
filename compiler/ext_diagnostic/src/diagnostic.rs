//! Rewriter diagnostics.
//!
//! A diagnostic is built from its [`ErrorCode`]; the code's class decides
//! whether it is an error or a warning, so a call site cannot report a
//! warning code as an error.

use ext_ir::Span;
use std::fmt;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    /// The offending definition was dropped; the unit fails.
    Error,
    /// Generated code is valid but may surprise the caller.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A span in the rewritten unit with a short explanation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// The definition or annotation being reported, as opposed to context.
    pub is_primary: bool,
}

/// Trailing text rendered after the labels.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Attachment {
    /// Background on the rule that was broken.
    Note(String),
    /// A concrete edit that resolves the diagnostic.
    Help(String),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported through a sink"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub attachments: Vec<Attachment>,
}

impl Diagnostic {
    #[cold]
    pub fn new(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: code.severity(),
            message: String::new(),
            labels: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at the reported definition or annotation.
    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), true)
    }

    /// Point at a related location, e.g. each of several conflicting
    /// annotations.
    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), false)
    }

    fn label(mut self, span: Span, message: String, is_primary: bool) -> Self {
        self.labels.push(Label {
            span,
            message,
            is_primary,
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.attachments.push(Attachment::Note(note.into()));
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.attachments.push(Attachment::Help(suggestion.into()));
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {marker} {:?}: {}", label.span, label.message)?;
        }
        for attachment in &self.attachments {
            match attachment {
                Attachment::Note(text) => write!(f, "\n  = note: {text}")?,
                Attachment::Help(text) => write!(f, "\n  = help: {text}")?,
            }
        }
        Ok(())
    }
}
