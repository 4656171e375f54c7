//! Emission of a flattened value as one self-contained expression.

use ext_ir::visitor::walk_fold_tree;
use ext_ir::{CaptureIndex, Folder, Name, StringInterner, Tree, TreeKind, ValDef};

use crate::flatten::Flattened;

/// Binding name for the capture at `index`: `capture$i`.
pub fn capture_name(interner: &StringInterner, index: CaptureIndex) -> Name {
    interner.intern(&format!("capture${index}"))
}

/// Replace capture tags, spliced or not, with references to their bindings.
struct BindCaptures<'n> {
    names: &'n [Name],
}

impl BindCaptures<'_> {
    fn binding(&self, tag: &Tree) -> Option<Tree> {
        match tag.kind {
            TreeKind::CaptureTag(index) => self
                .names
                .get(index.index())
                .map(|&name| Tree::ident(name, tag.span)),
            _ => None,
        }
    }
}

impl Folder for BindCaptures<'_> {
    fn fold_tree(&mut self, tree: Tree) -> Tree {
        let bound = match &tree.kind {
            TreeKind::Splice(inner) => self.binding(inner),
            TreeKind::CaptureTag(_) => self.binding(&tree),
            _ => None,
        };
        match bound {
            Some(ident) => ident,
            None => walk_fold_tree(self, tree),
        }
    }
}

/// Build `{ val capture$0: T0 = ..; ...; expr }`.
///
/// Without captures the expression is returned as is.
#[tracing::instrument(level = "debug", skip_all, fields(captures = flattened.captures.len()))]
pub fn emit(flattened: Flattened, interner: &StringInterner) -> Tree {
    let Flattened { expr, captures } = flattened;
    if captures.is_empty() {
        return expr;
    }

    let names: Vec<Name> = (0..captures.len())
        .map(|i| capture_name(interner, CaptureIndex::from_usize(i)))
        .collect();
    let mut bind = BindCaptures { names: &names };

    let span = expr.span;
    let stats = captures
        .into_iter()
        .zip(&names)
        .map(|(capture, &name)| {
            let rhs = bind.fold_tree(capture.tree);
            let binding_span = rhs.span;
            Tree::val_def(ValDef {
                tpt: Some(Box::new(capture.ty)),
                ..ValDef::local(name, rhs, binding_span)
            })
        })
        .collect();
    let expr = bind.fold_tree(expr);
    Tree::block(stats, expr, span)
}
