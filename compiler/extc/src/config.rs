//! Session configuration.

use ext_diagnostic::DiagnosticConfig;
use ext_rewrite::{AnnotationSpelling, RewriteOptions};

/// Configuration for one [`Session`](crate::Session).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    pub annotations: AnnotationSpelling,
    /// Name bound to the receiver inside extension bodies.
    pub self_name: String,
    pub diagnostics: DiagnosticConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let RewriteOptions {
            annotations,
            self_name,
        } = RewriteOptions::default();
        SessionConfig {
            annotations,
            self_name,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Environment variable overriding the error limit (`0` = unlimited).
    pub const ERROR_LIMIT_VAR: &'static str = "EXT_ERROR_LIMIT";

    /// Defaults, with overrides read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, with overrides read through `lookup`.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(Self::ERROR_LIMIT_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.diagnostics.error_limit = limit,
                Err(err) => tracing::warn!(
                    var = Self::ERROR_LIMIT_VAR,
                    value = %raw,
                    %err,
                    "ignoring invalid error limit"
                ),
            }
        }
        config
    }

    /// The part of the configuration the rewriter reads.
    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            annotations: self.annotations.clone(),
            self_name: self.self_name.clone(),
        }
    }
}
