//! Diagnostics for the extension rewriter.
//!
//! Every rewrite failure is reported, never thrown: a [`Diagnostic`] carries
//! an [`ErrorCode`], a message and a primary label at the offending span.
//! Reporting goes through the [`DiagnosticSink`] capability so the host
//! compiler can route diagnostics into its own reporter; [`DiagnosticQueue`]
//! is the in-process implementation used by tests and the `extc` session.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that an error was emitted. A
//! rewrite step that gives up on a definition returns
//! `Err(ErrorGuaranteed)`, which can only be obtained by reporting first.
//!
//! ```text
//! let guarantee = sink.error(diagnostic);
//! return Err(guarantee);
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Attachment, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink};
