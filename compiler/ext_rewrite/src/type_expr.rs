//! Conversion of annotation arguments into type trees.
//!
//! Annotation arguments are parsed as values, so the target of
//! `@extend(Map[K, List[V]])` arrives as nested `TypeApply` over `Ident`s.
//! The converter maps that back to `AppliedType` over `TypeIdent`s and
//! collects every identifier it saw, which later decides how the method's
//! own type parameters are split.

use ext_ir::{Name, Span, Tree, TreeKind, TypeParam};
use rustc_hash::FxHashSet;

/// A converted extension target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtensionTarget {
    pub tpt: Tree,
    /// Every identifier name occurring in `tpt`.
    pub type_names: FxHashSet<Name>,
}

/// The argument has a shape with no type-level counterpart.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TypeExprError {
    #[error("cannot use this expression as an extension target type")]
    NotHandled { span: Span, tree: Box<Tree> },
}

impl TypeExprError {
    pub fn span(&self) -> Span {
        match self {
            TypeExprError::NotHandled { span, .. } => *span,
        }
    }
}

/// Convert a value-level annotation argument to a type tree.
///
/// Idempotent: trees already in type form pass through unchanged, so a
/// caller may feed back a previous result.
pub fn to_type_tree(expr: &Tree) -> Result<ExtensionTarget, TypeExprError> {
    let mut type_names = FxHashSet::default();
    let tpt = convert(expr, &mut type_names)?;
    Ok(ExtensionTarget { tpt, type_names })
}

fn convert(expr: &Tree, names: &mut FxHashSet<Name>) -> Result<Tree, TypeExprError> {
    ext_ir::stack::ensure_sufficient_stack(|| match &expr.kind {
        TreeKind::Ident(name) | TreeKind::TypeIdent(name) => {
            names.insert(*name);
            Ok(Tree::type_ident(*name, expr.span))
        }
        TreeKind::TypeApply { fun: tpt, args } | TreeKind::AppliedType { tpt, args } => {
            let tpt = convert(tpt, names)?;
            let args = args
                .iter()
                .map(|arg| convert(arg, names))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Tree::applied_type(tpt, args, expr.span))
        }
        _ => Err(TypeExprError::NotHandled {
            span: expr.span,
            tree: Box::new(expr.clone()),
        }),
    })
}

/// Split a method's type parameters by whether the target mentions them.
///
/// Returns `(outer, inner)`: `outer` parameters appear in the target and move
/// onto the wrapper class, `inner` stay on the method. Declaration order is
/// kept within each side.
pub fn partition_type_params(
    tparams: &[TypeParam],
    target: &ExtensionTarget,
) -> (Vec<TypeParam>, Vec<TypeParam>) {
    tparams
        .iter()
        .copied()
        .partition(|tp| target.type_names.contains(&tp.name))
}
