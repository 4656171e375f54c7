//! Extension annotation recognition.
//!
//! An annotation is stored as the constructor call that would create it, so
//! `@extend(Array[Int])` arrives as
//! `Apply(New(TypeIdent(extend)), [TypeApply(Ident(Array), [TypeIdent(Int)])])`.

use ext_diagnostic::{Diagnostic, ErrorCode, ErrorGuaranteed};
use ext_ir::{Modifiers, Name, Span, Tree, TreeKind};

use crate::context::RewriteCtx;

/// Which desugaring an annotation requests.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExtensionKind {
    /// Wrapper class with a deferred method plus a generator companion.
    Staged,
    /// Wrapper class holding a plain copy of the method.
    Runtime,
}

/// Interned annotation names.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AnnotationNames {
    pub staged: Name,
    pub runtime: Name,
    pub deprecated: Name,
}

/// Result of matching one annotation tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AnnotationMatch<'t> {
    Matched {
        kind: ExtensionKind,
        payload: &'t Tree,
    },
    /// Legacy spelling; still rewritten, but reported as an error.
    Deprecated {
        kind: ExtensionKind,
        payload: &'t Tree,
    },
    /// Extension annotation with the wrong number of arguments.
    Malformed { arity: usize },
    NoMatch,
}

impl AnnotationMatch<'_> {
    fn is_extension(&self) -> bool {
        !matches!(self, AnnotationMatch::NoMatch)
    }
}

/// Destructure `new C(args)` (or a bare `new C`) into the class name and
/// arguments.
fn constructor_call(ann: &Tree) -> Option<(Name, &[Tree])> {
    fn class_name(tpt: &Tree) -> Option<Name> {
        match tpt.kind {
            TreeKind::TypeIdent(name) | TreeKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    match &ann.kind {
        TreeKind::Apply { fun, args } => match &fun.kind {
            TreeKind::New(tpt) => class_name(tpt).map(|name| (name, args.as_slice())),
            _ => None,
        },
        TreeKind::New(tpt) => class_name(tpt).map(|name| (name, &[][..])),
        _ => None,
    }
}

fn recognize_canonical(name: Name, names: &AnnotationNames) -> Option<ExtensionKind> {
    if name == names.staged {
        Some(ExtensionKind::Staged)
    } else if name == names.runtime {
        Some(ExtensionKind::Runtime)
    } else {
        None
    }
}

fn recognize_deprecated(name: Name, names: &AnnotationNames) -> Option<ExtensionKind> {
    (name == names.deprecated).then_some(ExtensionKind::Staged)
}

/// Match one annotation tree against the extension annotation spellings.
pub fn match_annotation<'t>(ann: &'t Tree, names: &AnnotationNames) -> AnnotationMatch<'t> {
    let Some((name, args)) = constructor_call(ann) else {
        return AnnotationMatch::NoMatch;
    };

    let (kind, deprecated) = if let Some(kind) = recognize_canonical(name, names) {
        (kind, false)
    } else if let Some(kind) = recognize_deprecated(name, names) {
        (kind, true)
    } else {
        return AnnotationMatch::NoMatch;
    };

    match args {
        [payload] if deprecated => AnnotationMatch::Deprecated { kind, payload },
        [payload] => AnnotationMatch::Matched { kind, payload },
        _ => AnnotationMatch::Malformed { arity: args.len() },
    }
}

/// The extension annotation found on a definition.
#[derive(Clone, Debug)]
pub(crate) struct FoundExtension {
    pub kind: ExtensionKind,
    pub payload: Tree,
    /// Position within the modifier's annotation list.
    pub index: usize,
    /// Span of the annotation itself.
    pub span: Span,
    /// Written with the legacy spelling; see [`deprecated_spelling`].
    pub deprecated: bool,
}

/// Find the single extension annotation in `mods`.
///
/// Returns `Ok(None)` when there is none. Malformed and conflicting
/// annotations are reported and yield `Err`. A legacy spelling is returned
/// unreported so the caller can decide, knowing the scope, whether the
/// definition is still rewritten.
pub(crate) fn find_extension(
    ctx: &mut RewriteCtx<'_>,
    mods: &Modifiers,
    def_name: Name,
    def_span: Span,
) -> Result<Option<FoundExtension>, ErrorGuaranteed> {
    let names = ctx.names.annotations;
    let matches: Vec<(usize, AnnotationMatch<'_>)> = mods
        .annotations
        .iter()
        .map(|ann| match_annotation(ann, &names))
        .enumerate()
        .filter(|(_, m)| m.is_extension())
        .collect();

    let Some((index, first)) = matches.first() else {
        return Ok(None);
    };

    if matches.len() > 1 {
        let mut diag = Diagnostic::new(ErrorCode::E2004)
            .with_message(format!(
                "`{}` carries {} extension annotations",
                ctx.lookup(def_name),
                matches.len()
            ))
            .with_label(def_span, "only one extension annotation is allowed");
        for (i, _) in &matches {
            diag = diag.with_secondary_label(mods.annotations[*i].span, "extension annotation");
        }
        return Err(ctx.error(diag));
    }

    let span = mods.annotations[*index].span;
    let (kind, payload, deprecated) = match first {
        AnnotationMatch::Matched { kind, payload } => (*kind, *payload, false),
        AnnotationMatch::Deprecated { kind, payload } => (*kind, *payload, true),
        AnnotationMatch::Malformed { arity } => {
            return Err(ctx.error(
                Diagnostic::new(ErrorCode::E1001)
                    .with_message(format!(
                        "extension annotation takes exactly one argument, found {arity}"
                    ))
                    .with_label(span, "expected a single target type"),
            ))
        }
        AnnotationMatch::NoMatch => return Ok(None),
    };
    Ok(Some(FoundExtension {
        kind,
        payload: payload.clone(),
        index: *index,
        span,
        deprecated,
    }))
}

/// The E2003 report for a legacy spelling, ready for the caller to extend.
pub(crate) fn deprecated_spelling(ctx: &RewriteCtx<'_>, found: &FoundExtension) -> Diagnostic {
    let names = ctx.names.annotations;
    Diagnostic::new(ErrorCode::E2003)
        .with_message(format!("`@{}` is deprecated", ctx.lookup(names.deprecated)))
        .with_label(found.span, "deprecated spelling")
        .with_suggestion(format!("use `@{}` instead", ctx.lookup(names.staged)))
}
