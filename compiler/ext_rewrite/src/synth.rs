//! Extension synthesis.
//!
//! One annotated method becomes an implicit wrapper class over the target
//! type, plus (for staged extensions) a companion object whose generator
//! method builds the call site's code at expansion time.
//!
//! For `@extend(Int) def str1(): String = self.toString` the output is
//!
//! ```text
//! implicit class str1$1(self: Int) {
//!   macro def str1(): String = str1$1.str1
//! }
//! object str1$1 {
//!   def str1(implicit c$2: Context): c$2.Expr[String] = {
//!     val selfTree$3 = c$2.prefix.tree match {
//!       case Apply(_, List(selfTree$3)) => selfTree$3
//!     }
//!     val self = c$2.Expr[Int](selfTree$3)
//!     '{ ${ self }.toString }
//!   }
//! }
//! ```

use ext_diagnostic::{Diagnostic, ErrorCode, ErrorGuaranteed};
use ext_ir::{
    CaseDef, ClassDef, DefDef, ModFlags, Modifiers, ModuleDef, Name, Span, Tree, TreeKind,
    TypeParam, ValDef,
};

use crate::annotation::{ExtensionKind, FoundExtension};
use crate::context::RewriteCtx;
use crate::guard::{check_reserved_names, ReservedNames};
use crate::splice::splice_reserved;
use crate::type_expr::{partition_type_params, to_type_tree, ExtensionTarget};

/// The body of an extension, as written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ExtensionBody {
    /// Ordinary code; quoted (after splicing) by the generator.
    Raw(Tree),
    /// Already a staged expression; the generator returns it verbatim.
    Staged(Tree),
}

impl ExtensionBody {
    fn classify(mods: &Modifiers, rhs: Tree) -> Self {
        if mods.has(ModFlags::MACRO) || matches!(rhs.kind, TreeKind::Quote(_)) {
            ExtensionBody::Staged(rhs)
        } else {
            ExtensionBody::Raw(rhs)
        }
    }
}

/// Rewrite one annotated method into its replacement declarations.
///
/// Every precondition is checked and reported before giving up, so one
/// definition can produce several errors. On failure nothing is produced
/// and the caller drops the definition.
pub(crate) fn synthesize(
    ctx: &mut RewriteCtx<'_>,
    mut def: DefDef,
    span: Span,
    found: FoundExtension,
) -> Result<Vec<Tree>, ErrorGuaranteed> {
    def.mods.annotations.remove(found.index);

    let target = match to_type_tree(&found.payload) {
        Ok(target) => Ok(target),
        Err(err) => {
            let printed = ctx.print(&found.payload);
            Err(ctx.error(
                Diagnostic::new(ErrorCode::E3001)
                    .with_message(format!("type not handled: `{printed}`"))
                    .with_label(err.span(), err.to_string())
                    .with_note(
                        "an extension target is a type name, optionally applied to type arguments",
                    ),
            ))
        }
    };

    match found.kind {
        ExtensionKind::Staged => {
            let missing_result = def.tpt.is_none().then(|| {
                let name = ctx.lookup(def.name);
                ctx.error(
                    Diagnostic::new(ErrorCode::E2001)
                        .with_message(format!(
                            "staged extension `{name}` needs an explicit result type"
                        ))
                        .with_label(span, "result type missing")
                        .with_suggestion(format!("declare it: `def {name}(...): T = ...`")),
                )
            });

            let reserved = ReservedNames::for_extension(ctx.names.self_name, &def);
            let rhs = std::mem::replace(&mut *def.rhs, Tree::wildcard(span));
            let body = ExtensionBody::classify(&def.mods, rhs);
            let shadowed = match &body {
                ExtensionBody::Raw(rhs) => report_redeclarations(ctx, rhs, &reserved),
                ExtensionBody::Staged(_) => None,
            };

            let target = target?;
            if let Some(guar) = missing_result.or(shadowed) {
                return Err(guar);
            }
            Ok(staged(ctx, def, span, &target, body, &reserved))
        }
        ExtensionKind::Runtime => {
            let target = target?;
            let wrapper = runtime(ctx, def, span, &target);
            Ok(vec![wrapper])
        }
    }
}

fn report_redeclarations(
    ctx: &mut RewriteCtx<'_>,
    body: &Tree,
    reserved: &ReservedNames,
) -> Option<ErrorGuaranteed> {
    let mut guar = None;
    for found in check_reserved_names(body, reserved) {
        let name = ctx.lookup(found.name);
        guar = Some(ctx.error(
            Diagnostic::new(ErrorCode::E2002)
                .with_message(format!("extension body redeclares `{name}`"))
                .with_label(found.span, format!("{} `{name}` declared here", found.kind))
                .with_note(format!(
                    "`{name}` refers to the extension's receiver or a parameter and cannot be shadowed"
                )),
        ));
    }
    guar
}

/// `implicit class G[outer](self: Target) { method }`
fn wrapper_class(
    ctx: &RewriteCtx<'_>,
    group: Name,
    outer: Vec<TypeParam>,
    target: &ExtensionTarget,
    method: DefDef,
    span: Span,
) -> Tree {
    let self_param = ValDef::param(ctx.names.self_name, target.tpt.clone(), span);
    Tree::new(
        TreeKind::ClassDef(ClassDef {
            mods: Modifiers::new(ModFlags::IMPLICIT),
            name: group,
            tparams: outer,
            ctor_params: vec![self_param],
            body: vec![Tree::new(TreeKind::DefDef(method), span)],
        }),
        span,
    )
}

#[tracing::instrument(level = "trace", skip_all)]
fn runtime(ctx: &mut RewriteCtx<'_>, def: DefDef, span: Span, target: &ExtensionTarget) -> Tree {
    let group = ctx.fresh_from(def.name);
    let (outer, inner) = partition_type_params(&def.tparams, target);
    let name = ctx.lookup(def.name);
    tracing::debug!(method = name, group = ctx.lookup(group), "runtime extension");

    ctx.warning(
        Diagnostic::new(ErrorCode::E4001)
            .with_message(format!(
                "runtime extension `{name}` is called through its wrapper class"
            ))
            .with_label(span, "wrapper class generated here")
            .with_note("call sites now depend on this definition's enclosing scope"),
    );

    let method = DefDef { tparams: inner, ..def };
    wrapper_class(ctx, group, outer, target, method, span)
}

#[tracing::instrument(level = "trace", skip_all)]
fn staged(
    ctx: &mut RewriteCtx<'_>,
    def: DefDef,
    span: Span,
    target: &ExtensionTarget,
    body: ExtensionBody,
    reserved: &ReservedNames,
) -> Vec<Tree> {
    let group = ctx.fresh_from(def.name);
    let c = ctx.fresh("c");
    let self_tree = ctx.fresh("selfTree");
    let (outer, inner) = partition_type_params(&def.tparams, target);
    tracing::debug!(
        method = ctx.lookup(def.name),
        group = ctx.lookup(group),
        outer = outer.len(),
        inner = inner.len(),
        "staged extension"
    );

    let builder = Generator {
        names: ctx.names,
        c,
        span,
    };

    // Generator: def name[outer ++ inner](implicit c: Context)(x: c.Expr[X])...
    let mut vparamss = Vec::with_capacity(def.vparamss.len() + 2);
    vparamss.push(vec![implicit_param(
        c,
        Tree::type_ident(ctx.names.context, span),
        span,
    )]);
    for params in &def.vparamss {
        vparamss.push(params.iter().map(|p| builder.staged_param(p)).collect());
    }
    if !inner.is_empty() {
        let evidence = inner
            .iter()
            .map(|tp| {
                let name = ctx.fresh("evidence");
                implicit_param(name, builder.weak_type_tag(tp), span)
            })
            .collect();
        vparamss.push(evidence);
    }

    let generated_body = match body {
        ExtensionBody::Staged(rhs) => rhs,
        ExtensionBody::Raw(rhs) => {
            let rhs_span = rhs.span;
            Tree::quote(splice_reserved(rhs, reserved), rhs_span)
        }
    };
    let generator = DefDef {
        mods: Modifiers::default(),
        name: def.name,
        tparams: outer.iter().chain(&inner).copied().collect(),
        vparamss,
        tpt: def.tpt.as_deref().map(|r| Box::new(builder.expr_type(r.clone()))),
        rhs: Box::new(Tree::block(
            vec![
                builder.extract_self_tree(self_tree),
                builder.bind_self(self_tree, target),
            ],
            generated_body,
            span,
        )),
    };
    let companion = Tree::new(
        TreeKind::ModuleDef(ModuleDef {
            mods: Modifiers::default(),
            name: group,
            body: vec![Tree::new(TreeKind::DefDef(generator), span)],
        }),
        span,
    );

    // Forwarder: macro def name[inner](params): R = G.name
    let mut mods = def.mods;
    mods.flags |= ModFlags::MACRO;
    let forwarder = DefDef {
        mods,
        name: def.name,
        tparams: inner,
        vparamss: def.vparamss,
        tpt: def.tpt,
        rhs: Box::new(Tree::select(Tree::ident(group, span), def.name, span)),
    };
    let wrapper = wrapper_class(ctx, group, outer, target, forwarder, span);

    vec![wrapper, companion]
}

fn implicit_param(name: Name, tpt: Tree, span: Span) -> ValDef {
    let mut param = ValDef::param(name, tpt, span);
    param.mods.flags |= ModFlags::IMPLICIT;
    param
}

/// Builds trees that live inside one generator and refer to its context
/// parameter.
struct Generator {
    names: crate::context::WellKnown,
    c: Name,
    span: Span,
}

impl Generator {
    fn ctx_member(&self, member: Name) -> Tree {
        Tree::select(Tree::ident(self.c, self.span), member, self.span)
    }

    /// `c.Expr[ty]`
    fn expr_type(&self, ty: Tree) -> Tree {
        Tree::applied_type(self.ctx_member(self.names.expr), vec![ty], self.span)
    }

    /// `c.WeakTypeTag[T]`
    fn weak_type_tag(&self, tp: &TypeParam) -> Tree {
        Tree::applied_type(
            self.ctx_member(self.names.weak_type_tag),
            vec![Tree::type_ident(tp.name, tp.span)],
            self.span,
        )
    }

    /// `x: c.Expr[X]`, keeping the parameter's own modifiers.
    fn staged_param(&self, param: &ValDef) -> ValDef {
        ValDef {
            tpt: param
                .tpt
                .as_deref()
                .map(|t| Box::new(self.expr_type(t.clone()))),
            ..param.clone()
        }
    }

    /// `val t = c.prefix.tree match { case Apply(_, List(t)) => t }`
    fn extract_self_tree(&self, t: Name) -> Tree {
        let span = self.span;
        let prefix_tree = Tree::select(self.ctx_member(self.names.prefix), self.names.tree, span);
        let pattern = Tree::apply(
            Tree::ident(self.names.apply, span),
            vec![
                Tree::wildcard(span),
                Tree::apply(
                    Tree::ident(self.names.list, span),
                    vec![Tree::bind(t, Tree::wildcard(span), span)],
                    span,
                ),
            ],
            span,
        );
        let matched = Tree::match_(
            prefix_tree,
            vec![CaseDef {
                pat: pattern,
                guard: None,
                body: Tree::ident(t, span),
            }],
            span,
        );
        Tree::val_def(ValDef::local(t, matched, span))
    }

    /// `val self = c.Expr[Target](t)`
    fn bind_self(&self, t: Name, target: &ExtensionTarget) -> Tree {
        let span = self.span;
        let ctor = Tree::type_apply(
            self.ctx_member(self.names.expr),
            vec![target.tpt.clone()],
            span,
        );
        let wrapped = Tree::apply(ctor, vec![Tree::ident(t, span)], span);
        Tree::val_def(ValDef::local(self.names.self_name, wrapped, span))
    }
}
