//! Terse tree construction for tests.

use extc::{SharedInterner, Tree};
use ext_ir::{CaptureIndex, DefDef, ModFlags, Modifiers, ModuleDef, Span, TreeKind, ValDef};

/// Builds trees over one interner.
#[derive(Clone)]
pub struct Builder {
    pub interner: SharedInterner,
}

impl Builder {
    pub fn new(interner: SharedInterner) -> Self {
        Builder { interner }
    }

    pub fn ident(&self, name: &str) -> Tree {
        Tree::ident(self.interner.intern(name), Span::DUMMY)
    }

    pub fn ty(&self, name: &str) -> Tree {
        Tree::type_ident(self.interner.intern(name), Span::DUMMY)
    }

    pub fn int(&self, value: i64) -> Tree {
        Tree::int(value, Span::DUMMY)
    }

    pub fn tag(&self, index: u32) -> Tree {
        Tree::capture_tag(CaptureIndex(index), Span::DUMMY)
    }

    /// `name(args...)`
    pub fn call(&self, name: &str, args: Vec<Tree>) -> Tree {
        Tree::apply(self.ident(name), args, Span::DUMMY)
    }

    /// `recv.name(args...)`
    pub fn method_call(&self, recv: Tree, name: &str, args: Vec<Tree>) -> Tree {
        Tree::apply(self.select(recv, name), args, Span::DUMMY)
    }

    pub fn select(&self, qual: Tree, name: &str) -> Tree {
        Tree::select(qual, self.interner.intern(name), Span::DUMMY)
    }

    /// `@annotation(target)` stored as `new annotation(target)`.
    pub fn annotation(&self, annotation: &str, target: Tree) -> Tree {
        Tree::apply(
            Tree::new_instance(self.ty(annotation), Span::DUMMY),
            vec![target],
            Span::DUMMY,
        )
    }

    /// `@ann def name(params): result = body`, with `Int` parameters.
    pub fn def(
        &self,
        ann: Option<Tree>,
        name: &str,
        params: &[&str],
        result: Option<&str>,
        body: Tree,
    ) -> Tree {
        let mut mods = Modifiers::new(ModFlags::empty());
        if let Some(ann) = ann {
            mods = mods.with_annotation(ann);
        }
        let params = params
            .iter()
            .map(|p| ValDef::param(self.interner.intern(p), self.ty("Int"), Span::DUMMY))
            .collect();
        Tree::new(
            TreeKind::DefDef(DefDef {
                mods,
                name: self.interner.intern(name),
                tparams: Vec::new(),
                vparamss: vec![params],
                tpt: result.map(|r| Box::new(self.ty(r))),
                rhs: Box::new(body),
            }),
            Span::DUMMY,
        )
    }

    pub fn object(&self, name: &str, body: Vec<Tree>) -> Tree {
        Tree::new(
            TreeKind::ModuleDef(ModuleDef {
                mods: Modifiers::default(),
                name: self.interner.intern(name),
                body,
            }),
            Span::DUMMY,
        )
    }

    pub fn package(&self, name: &str, stats: Vec<Tree>) -> Tree {
        Tree::new(
            TreeKind::Package {
                name: self.interner.intern(name),
                stats,
            },
            Span::DUMMY,
        )
    }
}
