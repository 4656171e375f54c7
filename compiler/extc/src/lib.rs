//! Extension compiler session.
//!
//! Ties the passes together for one compilation unit:
//!
//! ```text
//! Tree ──► Session::rewrite ──► RewriteOutcome { tree, diagnostics }
//!
//! Reified<V> ──► Session::compile_reified ──► Compiled<V>
//!                   flatten → emit → compile
//! ```
//!
//! Logging is off unless `EXT_LOG` (or `RUST_LOG`) is set; see
//! [`init_tracing`].

use std::sync::Once;

mod config;
mod session;

pub use config::SessionConfig;
pub use session::{reify_diagnostic, ReifiedError, RewriteOutcome, Session};

// Re-exports so callers need only this crate.
pub use ext_diagnostic::{Diagnostic, DiagnosticConfig, ErrorCode, Severity};
pub use ext_ir::{SharedInterner, Tree, TreePrinter};
pub use ext_reify::{Capture, CompileError, Compiled, Lift, Reified, ReifyError, Toolbox};
pub use ext_rewrite::{AnnotationSpelling, RewriteOptions};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber.
///
/// Filters come from `EXT_LOG`, falling back to `RUST_LOG`; with neither set
/// nothing is installed. Safe to call more than once.
///
/// ```text
/// EXT_LOG=ext_rewrite=debug     per-definition decisions
/// EXT_LOG=ext_reify=trace       capture placement during flattening
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let directives = std::env::var("EXT_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            let filter = EnvFilter::new(directives);
            let layer = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_writer(std::io::stderr);
            // Another subscriber may already be installed (e.g. by a host).
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init();
        }
    });
}
