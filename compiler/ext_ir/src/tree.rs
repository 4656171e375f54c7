//! Syntax tree nodes.
//!
//! The tree is a plain owned sum type. Annotation arguments are parsed at
//! value level, so a type written in an annotation (`@extend(Array[Int])`)
//! arrives as `TypeApply(Ident(Array), [TypeIdent(Int)])` and must be
//! converted before it can be used in type position.

use std::fmt;

use bitflags::bitflags;

use crate::{Name, Span};

/// Zero-based position into a reified value's capture list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct CaptureIndex(pub u32);

impl CaptureIndex {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Build from a list position.
    ///
    /// # Panics
    /// Panics if `index` does not fit in `u32`.
    #[inline]
    pub fn from_usize(index: usize) -> Self {
        let raw = u32::try_from(index)
            .unwrap_or_else(|_| panic!("capture index {index} overflows u32"));
        CaptureIndex(raw)
    }
}

impl fmt::Display for CaptureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// Definition modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ModFlags: u16 {
        const PRIVATE = 1 << 0;
        const IMPLICIT = 1 << 1;
        /// Deferred to the host's code-generation stage.
        const MACRO = 1 << 2;
        /// `var` rather than `val`.
        const MUTABLE = 1 << 3;
        /// Value or constructor parameter.
        const PARAM = 1 << 4;
        const CASE = 1 << 5;
    }
}

/// Modifier flags plus annotation trees.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Modifiers {
    pub flags: ModFlags,
    pub annotations: Vec<Tree>,
}

impl Modifiers {
    pub fn new(flags: ModFlags) -> Self {
        Modifiers {
            flags,
            annotations: Vec::new(),
        }
    }

    #[inline]
    pub fn has(&self, flag: ModFlags) -> bool {
        self.flags.contains(flag)
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Tree) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Literal constants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(Name),
    Unit,
}

/// A type parameter of a definition or class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeParam {
    pub name: Name,
    pub span: Span,
}

/// `val`/`var` definition; also used for parameters.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ValDef {
    pub mods: Modifiers,
    pub name: Name,
    pub tpt: Option<Box<Tree>>,
    pub rhs: Option<Box<Tree>>,
    pub span: Span,
}

impl ValDef {
    /// A parameter `name: tpt`.
    pub fn param(name: Name, tpt: Tree, span: Span) -> Self {
        ValDef {
            mods: Modifiers::new(ModFlags::PARAM),
            name,
            tpt: Some(Box::new(tpt)),
            rhs: None,
            span,
        }
    }

    /// A local `val name = rhs`.
    pub fn local(name: Name, rhs: Tree, span: Span) -> Self {
        ValDef {
            mods: Modifiers::default(),
            name,
            tpt: None,
            rhs: Some(Box::new(rhs)),
            span,
        }
    }
}

/// Method definition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DefDef {
    pub mods: Modifiers,
    pub name: Name,
    pub tparams: Vec<TypeParam>,
    /// Curried parameter groups, outermost first.
    pub vparamss: Vec<Vec<ValDef>>,
    /// Declared result type, if written.
    pub tpt: Option<Box<Tree>>,
    pub rhs: Box<Tree>,
}

impl DefDef {
    /// Iterate all value parameters across every group.
    pub fn params(&self) -> impl Iterator<Item = &ValDef> {
        self.vparamss.iter().flatten()
    }
}

/// Class definition with a single primary constructor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDef {
    pub mods: Modifiers,
    pub name: Name,
    pub tparams: Vec<TypeParam>,
    pub ctor_params: Vec<ValDef>,
    pub body: Vec<Tree>,
}

/// Singleton object definition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ModuleDef {
    pub mods: Modifiers,
    pub name: Name,
    pub body: Vec<Tree>,
}

/// One `case pat if guard => body` arm.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CaseDef {
    pub pat: Tree,
    pub guard: Option<Tree>,
    pub body: Tree,
}

/// Node shapes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TreeKind {
    /// Value-level identifier reference.
    Ident(Name),
    /// Type-level identifier reference.
    TypeIdent(Name),
    Literal(Literal),
    /// Member access `qual.name`.
    Select { qual: Box<Tree>, name: Name },
    Apply { fun: Box<Tree>, args: Vec<Tree> },
    /// Value-level type application `fun[args]`.
    TypeApply { fun: Box<Tree>, args: Vec<Tree> },
    /// Type-level applied type `F[args]`.
    AppliedType { tpt: Box<Tree>, args: Vec<Tree> },
    /// Constructor reference `new T`.
    New(Box<Tree>),
    Block { stats: Vec<Tree>, expr: Box<Tree> },
    Match { scrutinee: Box<Tree>, cases: Vec<CaseDef> },
    /// Pattern binding `name @ pat`.
    Bind { name: Name, pat: Box<Tree> },
    /// Pattern `_`.
    Wildcard,
    /// Lambda `(params) => body`.
    Function { params: Vec<ValDef>, body: Box<Tree> },
    ValDef(ValDef),
    DefDef(DefDef),
    ClassDef(ClassDef),
    ModuleDef(ModuleDef),
    Package { name: Name, stats: Vec<Tree> },
    /// Stage the expression: evaluated later, as a tree.
    Quote(Box<Tree>),
    /// Dereference a staged value inside a `Quote`.
    Splice(Box<Tree>),
    /// Placeholder for a captured runtime value.
    CaptureTag(CaptureIndex),
}

/// A syntax tree node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Tree {
    pub kind: TreeKind,
    pub span: Span,
    /// Type attached by an earlier typing pass, if any.
    pub ty: Option<Name>,
}

impl Tree {
    #[inline]
    pub fn new(kind: TreeKind, span: Span) -> Self {
        Tree {
            kind,
            span,
            ty: None,
        }
    }

    #[must_use]
    pub fn with_ty(mut self, ty: Name) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn ident(name: Name, span: Span) -> Self {
        Tree::new(TreeKind::Ident(name), span)
    }

    pub fn type_ident(name: Name, span: Span) -> Self {
        Tree::new(TreeKind::TypeIdent(name), span)
    }

    pub fn lit(lit: Literal, span: Span) -> Self {
        Tree::new(TreeKind::Literal(lit), span)
    }

    pub fn int(value: i64, span: Span) -> Self {
        Tree::lit(Literal::Int(value), span)
    }

    pub fn select(qual: Tree, name: Name, span: Span) -> Self {
        Tree::new(
            TreeKind::Select {
                qual: Box::new(qual),
                name,
            },
            span,
        )
    }

    pub fn apply(fun: Tree, args: Vec<Tree>, span: Span) -> Self {
        Tree::new(
            TreeKind::Apply {
                fun: Box::new(fun),
                args,
            },
            span,
        )
    }

    pub fn type_apply(fun: Tree, args: Vec<Tree>, span: Span) -> Self {
        Tree::new(
            TreeKind::TypeApply {
                fun: Box::new(fun),
                args,
            },
            span,
        )
    }

    pub fn applied_type(tpt: Tree, args: Vec<Tree>, span: Span) -> Self {
        Tree::new(
            TreeKind::AppliedType {
                tpt: Box::new(tpt),
                args,
            },
            span,
        )
    }

    pub fn new_instance(tpt: Tree, span: Span) -> Self {
        Tree::new(TreeKind::New(Box::new(tpt)), span)
    }

    pub fn block(stats: Vec<Tree>, expr: Tree, span: Span) -> Self {
        Tree::new(
            TreeKind::Block {
                stats,
                expr: Box::new(expr),
            },
            span,
        )
    }

    pub fn match_(scrutinee: Tree, cases: Vec<CaseDef>, span: Span) -> Self {
        Tree::new(
            TreeKind::Match {
                scrutinee: Box::new(scrutinee),
                cases,
            },
            span,
        )
    }

    pub fn bind(name: Name, pat: Tree, span: Span) -> Self {
        Tree::new(
            TreeKind::Bind {
                name,
                pat: Box::new(pat),
            },
            span,
        )
    }

    pub fn wildcard(span: Span) -> Self {
        Tree::new(TreeKind::Wildcard, span)
    }

    pub fn quote(expr: Tree, span: Span) -> Self {
        Tree::new(TreeKind::Quote(Box::new(expr)), span)
    }

    pub fn splice(expr: Tree, span: Span) -> Self {
        Tree::new(TreeKind::Splice(Box::new(expr)), span)
    }

    pub fn capture_tag(index: CaptureIndex, span: Span) -> Self {
        Tree::new(TreeKind::CaptureTag(index), span)
    }

    pub fn val_def(def: ValDef) -> Self {
        let span = def.span;
        Tree::new(TreeKind::ValDef(def), span)
    }

    /// Is this a definition (as opposed to an expression or pattern)?
    pub fn is_definition(&self) -> bool {
        matches!(
            self.kind,
            TreeKind::ValDef(_)
                | TreeKind::DefDef(_)
                | TreeKind::ClassDef(_)
                | TreeKind::ModuleDef(_)
        )
    }

    /// Modifiers of a definition node.
    pub fn modifiers(&self) -> Option<&Modifiers> {
        match &self.kind {
            TreeKind::ValDef(d) => Some(&d.mods),
            TreeKind::DefDef(d) => Some(&d.mods),
            TreeKind::ClassDef(d) => Some(&d.mods),
            TreeKind::ModuleDef(d) => Some(&d.mods),
            _ => None,
        }
    }

    /// Drop every attached type, recursively.
    #[must_use]
    pub fn reset_attrs(self) -> Tree {
        struct ResetAttrs;
        impl crate::Folder for ResetAttrs {
            fn fold_tree(&mut self, tree: Tree) -> Tree {
                let mut tree = crate::visitor::walk_fold_tree(self, tree);
                tree.ty = None;
                tree
            }
        }
        crate::Folder::fold_tree(&mut ResetAttrs, self)
    }

    /// Does any node in this tree carry an attached type?
    pub fn has_attrs(&self) -> bool {
        struct HasAttrs(bool);
        impl crate::Visitor<'_> for HasAttrs {
            fn visit_tree(&mut self, tree: &Tree) {
                if tree.ty.is_some() {
                    self.0 = true;
                    return;
                }
                crate::visitor::walk_tree(self, tree);
            }
        }
        let mut v = HasAttrs(false);
        crate::Visitor::visit_tree(&mut v, self);
        v.0
    }
}
