//! Source-like rendering of trees.
//!
//! Used for diagnostics that embed the offending tree and for test
//! assertions. Output is single-line and stable; it is not meant to be
//! re-parsed.

use std::fmt::Write;

use crate::tree::{CaseDef, ClassDef, DefDef, Literal, ModFlags, Modifiers, Tree, TreeKind, ValDef};
use crate::{Name, StringInterner};

/// Renders trees using the interner that produced their names.
pub struct TreePrinter<'a> {
    interner: &'a StringInterner,
    out: String,
}

impl<'a> TreePrinter<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        TreePrinter {
            interner,
            out: String::new(),
        }
    }

    /// Render one tree.
    pub fn print(interner: &'a StringInterner, tree: &Tree) -> String {
        let mut printer = TreePrinter::new(interner);
        printer.tree(tree);
        printer.out
    }

    fn name(&mut self, name: Name) {
        self.out.push_str(self.interner.lookup(name));
    }

    fn sep_by(&mut self, trees: &[Tree], sep: &str) {
        for (i, tree) in trees.iter().enumerate() {
            if i > 0 {
                self.out.push_str(sep);
            }
            self.tree(tree);
        }
    }

    fn tree(&mut self, tree: &Tree) {
        crate::stack::ensure_sufficient_stack(|| self.tree_kind(&tree.kind));
    }

    fn tree_kind(&mut self, kind: &TreeKind) {
        match kind {
            TreeKind::Ident(name) | TreeKind::TypeIdent(name) => self.name(*name),
            TreeKind::Literal(lit) => self.literal(lit),
            TreeKind::Select { qual, name } => {
                self.tree(qual);
                self.out.push('.');
                self.name(*name);
            }
            TreeKind::Apply { fun, args } => {
                self.tree(fun);
                self.out.push('(');
                self.sep_by(args, ", ");
                self.out.push(')');
            }
            TreeKind::TypeApply { fun: tpt, args } | TreeKind::AppliedType { tpt, args } => {
                self.tree(tpt);
                self.out.push('[');
                self.sep_by(args, ", ");
                self.out.push(']');
            }
            TreeKind::New(tpt) => {
                self.out.push_str("new ");
                self.tree(tpt);
            }
            TreeKind::Block { stats, expr } => {
                self.out.push_str("{ ");
                for stat in stats {
                    self.tree(stat);
                    self.out.push_str("; ");
                }
                self.tree(expr);
                self.out.push_str(" }");
            }
            TreeKind::Match { scrutinee, cases } => {
                self.tree(scrutinee);
                self.out.push_str(" match { ");
                for case in cases {
                    self.case(case);
                    self.out.push_str("; ");
                }
                self.out.push('}');
            }
            TreeKind::Bind { name, pat } => {
                self.name(*name);
                if !matches!(pat.kind, TreeKind::Wildcard) {
                    self.out.push_str(" @ ");
                    self.tree(pat);
                }
            }
            TreeKind::Wildcard => self.out.push('_'),
            TreeKind::Function { params, body } => {
                self.params(params);
                self.out.push_str(" => ");
                self.tree(body);
            }
            TreeKind::ValDef(def) => self.val_def(def),
            TreeKind::DefDef(def) => self.def_def(def),
            TreeKind::ClassDef(def) => self.class_def(def),
            TreeKind::ModuleDef(def) => {
                self.mods(&def.mods);
                self.out.push_str("object ");
                self.name(def.name);
                self.members(&def.body);
            }
            TreeKind::Package { name, stats } => {
                self.out.push_str("package ");
                self.name(*name);
                self.members(stats);
            }
            TreeKind::Quote(inner) => {
                self.out.push_str("'{ ");
                self.tree(inner);
                self.out.push_str(" }");
            }
            TreeKind::Splice(inner) => {
                self.out.push_str("${ ");
                self.tree(inner);
                self.out.push_str(" }");
            }
            TreeKind::CaptureTag(index) => {
                let _ = write!(self.out, "#capture({})", index.0);
            }
        }
    }

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Int(v) => {
                let _ = write!(self.out, "{v}");
            }
            Literal::Bool(v) => {
                let _ = write!(self.out, "{v}");
            }
            Literal::Str(s) => {
                let _ = write!(self.out, "{:?}", self.interner.lookup(*s));
            }
            Literal::Unit => self.out.push_str("()"),
        }
    }

    fn case(&mut self, case: &CaseDef) {
        self.out.push_str("case ");
        self.tree(&case.pat);
        if let Some(guard) = &case.guard {
            self.out.push_str(" if ");
            self.tree(guard);
        }
        self.out.push_str(" => ");
        self.tree(&case.body);
    }

    fn mods(&mut self, mods: &Modifiers) {
        for ann in &mods.annotations {
            self.out.push('@');
            // Annotations are stored as constructor calls; print them as written.
            match &ann.kind {
                TreeKind::Apply { fun, args } => match &fun.kind {
                    TreeKind::New(tpt) => {
                        self.tree(tpt);
                        self.out.push('(');
                        self.sep_by(args, ", ");
                        self.out.push(')');
                    }
                    _ => self.tree(ann),
                },
                TreeKind::New(tpt) => self.tree(tpt),
                _ => self.tree(ann),
            }
            self.out.push(' ');
        }
        for (flag, word) in [
            (ModFlags::PRIVATE, "private "),
            (ModFlags::IMPLICIT, "implicit "),
            (ModFlags::CASE, "case "),
            (ModFlags::MACRO, "macro "),
        ] {
            if mods.has(flag) {
                self.out.push_str(word);
            }
        }
    }

    fn members(&mut self, members: &[Tree]) {
        self.out.push_str(" { ");
        for member in members {
            self.tree(member);
            self.out.push_str("; ");
        }
        self.out.push('}');
    }

    fn params(&mut self, params: &[ValDef]) {
        self.out.push('(');
        if params.iter().any(|p| p.mods.has(ModFlags::IMPLICIT)) {
            self.out.push_str("implicit ");
        }
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.name(param.name);
            if let Some(tpt) = &param.tpt {
                self.out.push_str(": ");
                self.tree(tpt);
            }
        }
        self.out.push(')');
    }

    fn type_params(&mut self, tparams: &[crate::TypeParam]) {
        if tparams.is_empty() {
            return;
        }
        self.out.push('[');
        for (i, tp) in tparams.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.name(tp.name);
        }
        self.out.push(']');
    }

    fn val_def(&mut self, def: &ValDef) {
        if def.mods.has(ModFlags::PARAM) {
            self.name(def.name);
            if let Some(tpt) = &def.tpt {
                self.out.push_str(": ");
                self.tree(tpt);
            }
            return;
        }
        self.mods(&def.mods);
        self.out
            .push_str(if def.mods.has(ModFlags::MUTABLE) { "var " } else { "val " });
        self.name(def.name);
        if let Some(tpt) = &def.tpt {
            self.out.push_str(": ");
            self.tree(tpt);
        }
        if let Some(rhs) = &def.rhs {
            self.out.push_str(" = ");
            self.tree(rhs);
        }
    }

    fn def_def(&mut self, def: &DefDef) {
        self.mods(&def.mods);
        self.out.push_str("def ");
        self.name(def.name);
        self.type_params(&def.tparams);
        for group in &def.vparamss {
            self.params(group);
        }
        if let Some(tpt) = &def.tpt {
            self.out.push_str(": ");
            self.tree(tpt);
        }
        self.out.push_str(" = ");
        self.tree(&def.rhs);
    }

    fn class_def(&mut self, def: &ClassDef) {
        self.mods(&def.mods);
        self.out.push_str("class ");
        self.name(def.name);
        self.type_params(&def.tparams);
        self.params(&def.ctor_params);
        self.members(&def.body);
    }
}
