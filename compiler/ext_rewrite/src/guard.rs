//! Reserved-name checking for staged extension bodies.
//!
//! Inside a staged body, `self` and every value parameter are rewritten to
//! splices. A body that declares its own binding with one of those names
//! would have that binding's uses spliced as well, so such bodies are
//! rejected before the splice transform runs.

use std::fmt;

use ext_ir::visitor::{walk_tree, walk_val_def};
use ext_ir::{DefDef, Name, Span, Tree, TreeKind, ValDef, Visitor};
use smallvec::SmallVec;

/// Names an extension body may reference but not redeclare.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReservedNames {
    names: SmallVec<[Name; 4]>,
}

impl ReservedNames {
    /// The self-name followed by every value parameter of `def`.
    pub fn for_extension(self_name: Name, def: &DefDef) -> Self {
        let mut names = SmallVec::new();
        names.push(self_name);
        for param in def.params() {
            if !names.contains(&param.name) {
                names.push(param.name);
            }
        }
        ReservedNames { names }
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.names.contains(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = Name> + '_ {
        self.names.iter().copied()
    }
}

/// What kind of binding redeclared a reserved name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BindingKind {
    Value,
    Method,
    Object,
    Pattern,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingKind::Value => "value",
            BindingKind::Method => "method",
            BindingKind::Object => "object",
            BindingKind::Pattern => "pattern binding",
        })
    }
}

/// One binding that shadows a reserved name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Redeclaration {
    pub name: Name,
    pub kind: BindingKind,
    pub span: Span,
}

struct ReservedNameChecker<'r> {
    reserved: &'r ReservedNames,
    found: Vec<Redeclaration>,
}

impl ReservedNameChecker<'_> {
    fn check(&mut self, name: Name, kind: BindingKind, span: Span) {
        if self.reserved.contains(name) {
            self.found.push(Redeclaration { name, kind, span });
        }
    }
}

impl<'t> Visitor<'t> for ReservedNameChecker<'_> {
    fn visit_tree(&mut self, tree: &'t Tree) {
        match &tree.kind {
            TreeKind::DefDef(def) => self.check(def.name, BindingKind::Method, tree.span),
            TreeKind::ModuleDef(def) => self.check(def.name, BindingKind::Object, tree.span),
            TreeKind::Bind { name, .. } => self.check(*name, BindingKind::Pattern, tree.span),
            _ => {}
        }
        walk_tree(self, tree);
    }

    fn visit_val_def(&mut self, def: &'t ValDef) {
        self.check(def.name, BindingKind::Value, def.span);
        walk_val_def(self, def);
    }
}

/// Collect every binding in `body` that redeclares a reserved name.
///
/// Bindings are returned in traversal order; an empty list means the body
/// is safe to splice.
pub fn check_reserved_names(body: &Tree, reserved: &ReservedNames) -> Vec<Redeclaration> {
    let mut checker = ReservedNameChecker {
        reserved,
        found: Vec::new(),
    };
    checker.visit_tree(body);
    checker.found
}
