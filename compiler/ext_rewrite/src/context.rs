//! Per-unit rewrite context.
//!
//! Everything a rewrite pass mutates lives here: the fresh-name counter and
//! the diagnostic sink. One context serves one compilation unit; concurrent
//! units each build their own.

use ext_diagnostic::{Diagnostic, DiagnosticSink, ErrorGuaranteed};
use ext_ir::{Name, StringInterner, Tree, TreePrinter};

use crate::annotation::AnnotationNames;
use crate::fresh::FreshNames;

/// Source spellings of the extension annotations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotationSpelling {
    /// Staged extension (wrapper class + generator companion).
    pub staged: String,
    /// Runtime extension (wrapper class holding a plain copy).
    pub runtime: String,
    /// Legacy spelling of `staged`; accepted with an error.
    pub deprecated: String,
}

impl Default for AnnotationSpelling {
    fn default() -> Self {
        AnnotationSpelling {
            staged: "extend".to_owned(),
            runtime: "runtimeExtend".to_owned(),
            deprecated: "ext".to_owned(),
        }
    }
}

/// Rewrite configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewriteOptions {
    pub annotations: AnnotationSpelling,
    /// Name the receiver is bound to inside an extension body.
    pub self_name: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            annotations: AnnotationSpelling::default(),
            self_name: "self".to_owned(),
        }
    }
}

/// Names the synthesizer emits into generated code.
#[derive(Copy, Clone, Debug)]
pub(crate) struct WellKnown {
    pub annotations: AnnotationNames,
    pub self_name: Name,
    /// Context type of a generator's first parameter.
    pub context: Name,
    /// `c.Expr`: staged-value type and constructor.
    pub expr: Name,
    /// `c.WeakTypeTag`: type evidence.
    pub weak_type_tag: Name,
    pub prefix: Name,
    pub tree: Name,
    /// Extractors used to destructure the call-site prefix.
    pub apply: Name,
    pub list: Name,
}

impl WellKnown {
    fn intern(interner: &StringInterner, options: &RewriteOptions) -> Self {
        WellKnown {
            annotations: AnnotationNames {
                staged: interner.intern(&options.annotations.staged),
                runtime: interner.intern(&options.annotations.runtime),
                deprecated: interner.intern(&options.annotations.deprecated),
            },
            self_name: interner.intern(&options.self_name),
            context: interner.intern("Context"),
            expr: interner.intern("Expr"),
            weak_type_tag: interner.intern("WeakTypeTag"),
            prefix: interner.intern("prefix"),
            tree: interner.intern("tree"),
            apply: interner.intern("Apply"),
            list: interner.intern("List"),
        }
    }
}

/// State threaded through one rewrite of one compilation unit.
pub struct RewriteCtx<'a> {
    pub(crate) interner: &'a StringInterner,
    sink: &'a mut dyn DiagnosticSink,
    fresh: FreshNames,
    pub(crate) names: WellKnown,
}

impl<'a> RewriteCtx<'a> {
    pub fn new(
        interner: &'a StringInterner,
        sink: &'a mut dyn DiagnosticSink,
        options: &RewriteOptions,
    ) -> Self {
        RewriteCtx {
            interner,
            sink,
            fresh: FreshNames::new(),
            names: WellKnown::intern(interner, options),
        }
    }

    /// Allocate a fresh name derived from `hint`.
    pub fn fresh(&mut self, hint: &str) -> Name {
        self.fresh.fresh(self.interner, hint)
    }

    /// Allocate a fresh name derived from an existing name.
    pub(crate) fn fresh_from(&mut self, base: Name) -> Name {
        let hint = self.interner.lookup(base);
        self.fresh(hint)
    }

    pub(crate) fn error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.sink.error(diag)
    }

    pub(crate) fn warning(&mut self, diag: Diagnostic) {
        self.sink.warning(diag);
    }

    pub(crate) fn lookup(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub(crate) fn print(&self, tree: &Tree) -> String {
        TreePrinter::print(self.interner, tree)
    }
}
