//! One compilation unit's pipeline.

use ext_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use ext_ir::{SharedInterner, Tree};
use ext_reify::{CompileError, Compiled, Lift, Reified, ReifyError, Toolbox};
use ext_rewrite::{rewrite_unit, RewriteCtx};

use crate::SessionConfig;

/// Result of rewriting one unit.
#[derive(Clone, Debug)]
pub struct RewriteOutcome {
    pub tree: Tree,
    /// Sorted by source position.
    pub diagnostics: Vec<Diagnostic>,
}

impl RewriteOutcome {
    /// Did any definition fail to rewrite?
    pub fn is_failed(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Failure to turn a reified value into a callable.
#[derive(Debug, thiserror::Error)]
pub enum ReifiedError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Reify(#[from] ReifyError),
    #[error(transparent)]
    Compile(#[from] CompileError<E>),
}

impl<E: std::error::Error + 'static> ReifiedError<E> {
    /// Report this failure the same way rewrite failures are reported.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ReifiedError::Reify(err) => reify_diagnostic(err),
            ReifiedError::Compile(err) => Diagnostic::new(ErrorCode::E5001)
                .with_message(format!("generated tree rejected: {}", err.first))
                .with_note(format!("retry keeping attached types: {}", err.second))
                .with_note(format!("tree: `{}`", err.tree)),
        }
    }
}

/// Unsupported captures are user input; a dangling tag is a bug in whoever
/// built the reified value.
pub fn reify_diagnostic(err: &ReifyError) -> Diagnostic {
    match err {
        ReifyError::UnsupportedCapture { ty, .. } => Diagnostic::new(ErrorCode::E3002)
            .with_message(err.to_string())
            .with_label(ty.span, "captured with this type")
            .with_suggestion("capture a value the lift function can turn into a tree"),
        ReifyError::DanglingCapture { .. } => {
            Diagnostic::new(ErrorCode::E9001).with_message(err.to_string())
        }
    }
}

/// Pipeline entry points sharing one interner and configuration.
pub struct Session {
    interner: SharedInterner,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session::with_interner(SharedInterner::new(), config)
    }

    /// Use an interner the caller's trees were built with.
    pub fn with_interner(interner: SharedInterner, config: SessionConfig) -> Self {
        Session { interner, config }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Rewrite every extension in `tree`.
    ///
    /// Each call is a separate unit with its own fresh-name counter and
    /// diagnostic queue.
    pub fn rewrite(&self, tree: Tree) -> RewriteOutcome {
        let mut queue = DiagnosticQueue::with_config(self.config.diagnostics.clone());
        let options = self.config.rewrite_options();
        let mut ctx = RewriteCtx::new(&self.interner, &mut queue, &options);
        let tree = rewrite_unit(tree, &mut ctx);
        let diagnostics = queue.flush();
        tracing::debug!(diagnostics = diagnostics.len(), "unit rewritten");
        RewriteOutcome { tree, diagnostics }
    }

    /// Flatten and emit `reified` as one self-contained tree.
    pub fn emit_reified<V>(
        &self,
        reified: &Reified<V>,
        lift: &dyn Lift<V>,
    ) -> Result<Tree, ReifyError> {
        let flattened = ext_reify::flatten(reified, lift)?;
        Ok(ext_reify::emit(flattened, &self.interner))
    }

    /// Flatten, emit and compile `reified`.
    pub fn compile_reified<V, T>(
        &self,
        reified: &Reified<V>,
        lift: &dyn Lift<V>,
        toolbox: &T,
    ) -> Result<Compiled<V>, ReifiedError<T::Error>>
    where
        T: Toolbox<V> + ?Sized,
        T::Error: 'static,
    {
        let tree = self.emit_reified(reified, lift)?;
        Ok(ext_reify::compile(toolbox, &tree, &self.interner)?)
    }
}
