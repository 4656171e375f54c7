//! Splicing of captured references in a staged body.
//!
//! Inside the generator, `self` and the parameters are staged values
//! (`c.Expr[T]`), so each plain reference in the quoted body must
//! dereference them: `self.toString` becomes `${self}.toString`.

use ext_ir::visitor::walk_fold_tree;
use ext_ir::{Folder, Tree, TreeKind};

use crate::guard::ReservedNames;

struct SpliceReserved<'r> {
    reserved: &'r ReservedNames,
}

impl Folder for SpliceReserved<'_> {
    fn fold_tree(&mut self, tree: Tree) -> Tree {
        match tree.kind {
            TreeKind::Ident(name) if self.reserved.contains(name) => {
                let span = tree.span;
                Tree::splice(tree, span)
            }
            _ => walk_fold_tree(self, tree),
        }
    }
}

/// Wrap every reference to a reserved name in a `Splice`.
///
/// Identity on trees that mention no reserved name.
pub fn splice_reserved(body: Tree, reserved: &ReservedNames) -> Tree {
    SpliceReserved { reserved }.fold_tree(body)
}
