//! Unit-level rewrite driver.
//!
//! Members of objects and packages are the only place a staged extension is
//! expanded: the wrapper class and its companion must both be reachable by
//! implicit search from call sites. Elsewhere (a `def` local to a block or a
//! class body) only runtime extensions are rewritten, into the wrapper class
//! alone; a staged extension there is kept with a warning, or removed with an
//! error when it uses the legacy spelling.

use ext_diagnostic::{Diagnostic, ErrorCode};
use ext_ir::visitor::walk_fold_tree;
use ext_ir::{DefDef, Folder, Tree, TreeKind};

use crate::annotation::{deprecated_spelling, find_extension, ExtensionKind};
use crate::context::RewriteCtx;
use crate::synth::synthesize;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Scope {
    /// Member of an object or package.
    Container,
    /// Statement of a block or member of a class.
    Local,
}

enum Expansion {
    Unchanged(Tree),
    Replaced(Vec<Tree>),
    /// Reported and removed.
    Dropped,
}

struct ExtensionRewriter<'c, 'a> {
    ctx: &'c mut RewriteCtx<'a>,
    expanded: usize,
    dropped: usize,
}

impl ExtensionRewriter<'_, '_> {
    fn expand(&mut self, member: Tree, scope: Scope) -> Expansion {
        let Tree { kind, span, ty } = member;
        let def = match kind {
            TreeKind::DefDef(def) => def,
            kind => return Expansion::Unchanged(Tree { kind, span, ty }),
        };
        let unchanged = |def: DefDef| Expansion::Unchanged(Tree {
            kind: TreeKind::DefDef(def),
            span,
            ty,
        });

        let found = match find_extension(self.ctx, &def.mods, def.name, span) {
            Ok(Some(found)) => found,
            Ok(None) => return unchanged(def),
            Err(_) => return Expansion::Dropped,
        };

        if scope == Scope::Local && found.kind == ExtensionKind::Staged {
            let name = self.ctx.lookup(def.name);
            if found.deprecated {
                let diag = deprecated_spelling(self.ctx, &found).with_note(format!(
                    "`{name}` is outside an object or package and was removed"
                ));
                let _ = self.ctx.error(diag);
                return Expansion::Dropped;
            }
            tracing::trace!(method = name, "staged extension left in place");
            self.ctx.warning(
                Diagnostic::new(ErrorCode::E4002)
                    .with_message(format!("staged extension `{name}` is not expanded here"))
                    .with_label(found.span, "only members of objects and packages are expanded")
                    .with_note("the definition is kept as an ordinary method"),
            );
            return unchanged(def);
        }

        if found.deprecated {
            let diag = deprecated_spelling(self.ctx, &found);
            let _ = self.ctx.error(diag);
        }

        match synthesize(self.ctx, def, span, found) {
            Ok(trees) => Expansion::Replaced(trees),
            Err(_) => Expansion::Dropped,
        }
    }

    fn rewrite_members(&mut self, members: Vec<Tree>, scope: Scope) -> Vec<Tree> {
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            match self.expand(member, scope) {
                Expansion::Unchanged(tree) => out.push(self.fold_tree(tree)),
                Expansion::Replaced(trees) => {
                    self.expanded += 1;
                    // Generated bodies may hold local extensions of their own.
                    out.extend(trees.into_iter().map(|t| self.fold_tree(t)));
                }
                Expansion::Dropped => self.dropped += 1,
            }
        }
        out
    }
}

impl Folder for ExtensionRewriter<'_, '_> {
    fn fold_tree(&mut self, tree: Tree) -> Tree {
        let Tree { kind, span, ty } = tree;
        let kind = match kind {
            TreeKind::ModuleDef(mut def) => {
                def.body = self.rewrite_members(def.body, Scope::Container);
                TreeKind::ModuleDef(def)
            }
            TreeKind::Package { name, stats } => TreeKind::Package {
                name,
                stats: self.rewrite_members(stats, Scope::Container),
            },
            kind => return walk_fold_tree(self, Tree { kind, span, ty }),
        };
        Tree { kind, span, ty }
    }

    fn fold_stats(&mut self, stats: Vec<Tree>) -> Vec<Tree> {
        self.rewrite_members(stats, Scope::Local)
    }
}

/// Rewrite every extension in one compilation unit.
///
/// Failures are reported through the context's sink and drop only the
/// offending definition. A tree without extension annotations comes back
/// unchanged.
#[tracing::instrument(level = "debug", skip_all, fields(span = %tree.span))]
pub fn rewrite_unit(tree: Tree, ctx: &mut RewriteCtx<'_>) -> Tree {
    let mut rewriter = ExtensionRewriter {
        ctx,
        expanded: 0,
        dropped: 0,
    };
    let tree = rewriter.fold_tree(tree);
    tracing::debug!(
        expanded = rewriter.expanded,
        dropped = rewriter.dropped,
        "extension rewrite finished"
    );
    tree
}
