//! Tree traversal.
//!
//! Two traits are provided:
//! - [`Visitor`] walks a borrowed tree; it can mutate its own state but not
//!   the tree.
//! - [`Folder`] consumes a tree and rebuilds it, so a pass can replace any
//!   node while the rest of the tree is reassembled structurally.
//!
//! Default implementations call the `walk_*` functions, which descend into
//! every child. Override a method to act on a node, and call the matching
//! `walk_*` function to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountIdents(usize);
//!
//! impl<'t> Visitor<'t> for CountIdents {
//!     fn visit_tree(&mut self, tree: &'t Tree) {
//!         if let TreeKind::Ident(_) = tree.kind {
//!             self.0 += 1;
//!         }
//!         walk_tree(self, tree);
//!     }
//! }
//! ```

use crate::stack::ensure_sufficient_stack;
use crate::tree::{CaseDef, ClassDef, DefDef, ModuleDef, Tree, TreeKind, ValDef};

// Visitor

/// Read-only tree visitor.
pub trait Visitor<'t> {
    fn visit_tree(&mut self, tree: &'t Tree) {
        walk_tree(self, tree);
    }

    fn visit_val_def(&mut self, def: &'t ValDef) {
        walk_val_def(self, def);
    }

    fn visit_def_def(&mut self, def: &'t DefDef) {
        walk_def_def(self, def);
    }

    fn visit_case(&mut self, case: &'t CaseDef) {
        walk_case(self, case);
    }
}

/// Visit every child of `tree`.
pub fn walk_tree<'t, V: Visitor<'t> + ?Sized>(v: &mut V, tree: &'t Tree) {
    ensure_sufficient_stack(|| match &tree.kind {
        TreeKind::Ident(_)
        | TreeKind::TypeIdent(_)
        | TreeKind::Literal(_)
        | TreeKind::Wildcard
        | TreeKind::CaptureTag(_) => {}
        TreeKind::Select { qual, .. } => v.visit_tree(qual),
        TreeKind::Apply { fun, args } | TreeKind::TypeApply { fun, args } => {
            v.visit_tree(fun);
            for arg in args {
                v.visit_tree(arg);
            }
        }
        TreeKind::AppliedType { tpt, args } => {
            v.visit_tree(tpt);
            for arg in args {
                v.visit_tree(arg);
            }
        }
        TreeKind::New(tpt) => v.visit_tree(tpt),
        TreeKind::Block { stats, expr } => {
            for stat in stats {
                v.visit_tree(stat);
            }
            v.visit_tree(expr);
        }
        TreeKind::Match { scrutinee, cases } => {
            v.visit_tree(scrutinee);
            for case in cases {
                v.visit_case(case);
            }
        }
        TreeKind::Bind { pat, .. } => v.visit_tree(pat),
        TreeKind::Function { params, body } => {
            for param in params {
                v.visit_val_def(param);
            }
            v.visit_tree(body);
        }
        TreeKind::ValDef(def) => v.visit_val_def(def),
        TreeKind::DefDef(def) => v.visit_def_def(def),
        TreeKind::ClassDef(def) => {
            for param in &def.ctor_params {
                v.visit_val_def(param);
            }
            for member in &def.body {
                v.visit_tree(member);
            }
        }
        TreeKind::ModuleDef(def) => {
            for member in &def.body {
                v.visit_tree(member);
            }
        }
        TreeKind::Package { stats, .. } => {
            for stat in stats {
                v.visit_tree(stat);
            }
        }
        TreeKind::Quote(inner) | TreeKind::Splice(inner) => v.visit_tree(inner),
    });
}

/// Visit the type and right-hand side of a `val`.
pub fn walk_val_def<'t, V: Visitor<'t> + ?Sized>(v: &mut V, def: &'t ValDef) {
    if let Some(tpt) = &def.tpt {
        v.visit_tree(tpt);
    }
    if let Some(rhs) = &def.rhs {
        v.visit_tree(rhs);
    }
}

/// Visit parameters, result type and body of a method.
pub fn walk_def_def<'t, V: Visitor<'t> + ?Sized>(v: &mut V, def: &'t DefDef) {
    for param in def.params() {
        v.visit_val_def(param);
    }
    if let Some(tpt) = &def.tpt {
        v.visit_tree(tpt);
    }
    v.visit_tree(&def.rhs);
}

pub fn walk_case<'t, V: Visitor<'t> + ?Sized>(v: &mut V, case: &'t CaseDef) {
    v.visit_tree(&case.pat);
    if let Some(guard) = &case.guard {
        v.visit_tree(guard);
    }
    v.visit_tree(&case.body);
}

// Folder

/// Owning tree rewriter.
pub trait Folder {
    fn fold_tree(&mut self, tree: Tree) -> Tree {
        walk_fold_tree(self, tree)
    }

    fn fold_val_def(&mut self, def: ValDef) -> ValDef {
        walk_fold_val_def(self, def)
    }

    fn fold_def_def(&mut self, def: DefDef) -> DefDef {
        walk_fold_def_def(self, def)
    }

    fn fold_case(&mut self, case: CaseDef) -> CaseDef {
        CaseDef {
            pat: self.fold_tree(case.pat),
            guard: case.guard.map(|g| self.fold_tree(g)),
            body: self.fold_tree(case.body),
        }
    }

    /// Fold a member list. Containers route through here so a pass can
    /// replace one member with several.
    fn fold_stats(&mut self, stats: Vec<Tree>) -> Vec<Tree> {
        stats.into_iter().map(|t| self.fold_tree(t)).collect()
    }
}

fn fold_boxed<F: Folder + ?Sized>(f: &mut F, tree: Box<Tree>) -> Box<Tree> {
    Box::new(f.fold_tree(*tree))
}

fn fold_all<F: Folder + ?Sized>(f: &mut F, trees: Vec<Tree>) -> Vec<Tree> {
    trees.into_iter().map(|t| f.fold_tree(t)).collect()
}

/// Rebuild `tree` with every child folded. Span and attached type are kept.
pub fn walk_fold_tree<F: Folder + ?Sized>(f: &mut F, tree: Tree) -> Tree {
    let Tree { kind, span, ty } = tree;
    let kind = ensure_sufficient_stack(|| match kind {
        leaf @ (TreeKind::Ident(_)
        | TreeKind::TypeIdent(_)
        | TreeKind::Literal(_)
        | TreeKind::Wildcard
        | TreeKind::CaptureTag(_)) => leaf,
        TreeKind::Select { qual, name } => TreeKind::Select {
            qual: fold_boxed(f, qual),
            name,
        },
        TreeKind::Apply { fun, args } => TreeKind::Apply {
            fun: fold_boxed(f, fun),
            args: fold_all(f, args),
        },
        TreeKind::TypeApply { fun, args } => TreeKind::TypeApply {
            fun: fold_boxed(f, fun),
            args: fold_all(f, args),
        },
        TreeKind::AppliedType { tpt, args } => TreeKind::AppliedType {
            tpt: fold_boxed(f, tpt),
            args: fold_all(f, args),
        },
        TreeKind::New(tpt) => TreeKind::New(fold_boxed(f, tpt)),
        TreeKind::Block { stats, expr } => TreeKind::Block {
            stats: f.fold_stats(stats),
            expr: fold_boxed(f, expr),
        },
        TreeKind::Match { scrutinee, cases } => TreeKind::Match {
            scrutinee: fold_boxed(f, scrutinee),
            cases: cases.into_iter().map(|c| f.fold_case(c)).collect(),
        },
        TreeKind::Bind { name, pat } => TreeKind::Bind {
            name,
            pat: fold_boxed(f, pat),
        },
        TreeKind::Function { params, body } => TreeKind::Function {
            params: params.into_iter().map(|p| f.fold_val_def(p)).collect(),
            body: fold_boxed(f, body),
        },
        TreeKind::ValDef(def) => TreeKind::ValDef(f.fold_val_def(def)),
        TreeKind::DefDef(def) => TreeKind::DefDef(f.fold_def_def(def)),
        TreeKind::ClassDef(def) => TreeKind::ClassDef(ClassDef {
            ctor_params: def
                .ctor_params
                .into_iter()
                .map(|p| f.fold_val_def(p))
                .collect(),
            body: f.fold_stats(def.body),
            ..def
        }),
        TreeKind::ModuleDef(def) => TreeKind::ModuleDef(ModuleDef {
            body: f.fold_stats(def.body),
            ..def
        }),
        TreeKind::Package { name, stats } => TreeKind::Package {
            name,
            stats: f.fold_stats(stats),
        },
        TreeKind::Quote(inner) => TreeKind::Quote(fold_boxed(f, inner)),
        TreeKind::Splice(inner) => TreeKind::Splice(fold_boxed(f, inner)),
    });
    Tree { kind, span, ty }
}

pub fn walk_fold_val_def<F: Folder + ?Sized>(f: &mut F, def: ValDef) -> ValDef {
    ValDef {
        tpt: def.tpt.map(|t| fold_boxed(f, t)),
        rhs: def.rhs.map(|t| fold_boxed(f, t)),
        ..def
    }
}

pub fn walk_fold_def_def<F: Folder + ?Sized>(f: &mut F, def: DefDef) -> DefDef {
    DefDef {
        vparamss: def
            .vparamss
            .into_iter()
            .map(|group| group.into_iter().map(|p| f.fold_val_def(p)).collect())
            .collect(),
        tpt: def.tpt.map(|t| fold_boxed(f, t)),
        rhs: fold_boxed(f, def.rhs),
        ..def
    }
}
