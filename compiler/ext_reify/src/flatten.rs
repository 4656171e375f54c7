//! Capture flattening.
//!
//! Captures are visited post-order: a nested value's own captures are
//! appended first, then its rewritten expression is appended as one more
//! capture and the parent's tag is pointed at it. For `[A, B{C, D}]` the
//! flat list is `[A, C, D, B']`, so every capture only refers to captures
//! before it.

use ext_ir::stack::ensure_sufficient_stack;
use ext_ir::visitor::walk_fold_tree;
use ext_ir::{CaptureIndex, Folder, Tree, TreeKind};

use crate::error::ReifyError;
use crate::value::{Capture, Lift, Reified};

/// Where a flat capture came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaptureOrigin {
    /// A leaf value converted by the lift function.
    Leaf,
    /// The rewritten expression of a nested reified value.
    Nested,
}

/// One capture of a flattened value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlatCapture {
    /// Expression producing the captured value.
    pub tree: Tree,
    pub ty: Tree,
    pub origin: CaptureOrigin,
}

/// A reified value with a single level of captures.
///
/// Every tag in `expr` or in a capture's tree refers to an earlier position
/// of `captures`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Flattened {
    pub(crate) expr: Tree,
    pub(crate) captures: Vec<FlatCapture>,
}

impl Flattened {
    pub fn expr(&self) -> &Tree {
        &self.expr
    }

    pub fn captures(&self) -> &[FlatCapture] {
        &self.captures
    }
}

/// Point every tag at its flat position.
struct Retag<'m> {
    mapping: &'m [CaptureIndex],
    dangling: Option<ReifyError>,
}

impl Folder for Retag<'_> {
    fn fold_tree(&mut self, tree: Tree) -> Tree {
        match tree.kind {
            TreeKind::CaptureTag(index) => match self.mapping.get(index.index()) {
                Some(&flat) => Tree::capture_tag(flat, tree.span),
                None => {
                    if self.dangling.is_none() {
                        self.dangling = Some(ReifyError::DanglingCapture {
                            index,
                            count: self.mapping.len(),
                        });
                    }
                    tree
                }
            },
            _ => walk_fold_tree(self, tree),
        }
    }
}

fn flatten_into<V>(
    reified: &Reified<V>,
    lift: &dyn Lift<V>,
    out: &mut Vec<FlatCapture>,
) -> Result<Tree, ReifyError> {
    ensure_sufficient_stack(|| {
        let mut mapping = Vec::with_capacity(reified.captures.len());
        for (local, capture) in reified.captures.iter().enumerate() {
            let (tree, origin) = match capture {
                Capture::Leaf { value, ty } => {
                    let tree = lift.lift(value, ty).ok_or_else(|| {
                        ReifyError::UnsupportedCapture {
                            index: CaptureIndex::from_usize(out.len()),
                            ty: Box::new(ty.clone()),
                        }
                    })?;
                    (tree, CaptureOrigin::Leaf)
                }
                Capture::Nested { reified, .. } => {
                    (flatten_into(reified, lift, out)?, CaptureOrigin::Nested)
                }
            };
            tracing::trace!(local, flat = out.len(), ?origin, "capture placed");
            mapping.push(CaptureIndex::from_usize(out.len()));
            out.push(FlatCapture {
                tree,
                ty: capture.ty().clone(),
                origin,
            });
        }

        let mut retag = Retag {
            mapping: &mapping,
            dangling: None,
        };
        let expr = retag.fold_tree(reified.expr.clone());
        match retag.dangling {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    })
}

/// Collapse nested captures into one ordered list.
///
/// Fails if a leaf value cannot be lifted or an expression refers to a
/// capture that does not exist.
#[tracing::instrument(level = "debug", skip_all, fields(captures = reified.captures.len()))]
pub fn flatten<V>(reified: &Reified<V>, lift: &dyn Lift<V>) -> Result<Flattened, ReifyError> {
    let mut captures = Vec::new();
    let expr = flatten_into(reified, lift, &mut captures)?;
    tracing::debug!(flat = captures.len(), "flattened");
    Ok(Flattened { expr, captures })
}
