//! Reified-value model.

use ext_ir::{CaptureIndex, Tree};

/// A runtime value together with an expression that rebuilds it.
///
/// Every `CaptureTag(i)` in `expr` refers to `captures[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Reified<V> {
    pub value: V,
    pub expr: Tree,
    pub captures: Vec<Capture<V>>,
}

/// One captured runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Capture<V> {
    /// A plain value, turned into a tree by a [`Lift`] when flattened.
    Leaf { value: V, ty: Tree },
    /// A value that is itself reified.
    Nested { reified: Box<Reified<V>>, ty: Tree },
}

impl<V> Capture<V> {
    /// Declared type of the captured value.
    pub fn ty(&self) -> &Tree {
        match self {
            Capture::Leaf { ty, .. } | Capture::Nested { ty, .. } => ty,
        }
    }
}

impl<V> Reified<V> {
    /// A reified value with no captures.
    pub fn new(value: V, expr: Tree) -> Self {
        Reified {
            value,
            expr,
            captures: Vec::new(),
        }
    }

    /// Append a capture, returning the index `expr` should use for it.
    pub fn capture(&mut self, capture: Capture<V>) -> CaptureIndex {
        let index = CaptureIndex::from_usize(self.captures.len());
        self.captures.push(capture);
        index
    }

    #[must_use]
    pub fn with_leaf(mut self, value: V, ty: Tree) -> Self {
        self.capture(Capture::Leaf { value, ty });
        self
    }

    #[must_use]
    pub fn with_nested(mut self, reified: Reified<V>, ty: Tree) -> Self {
        self.capture(Capture::Nested {
            reified: Box::new(reified),
            ty,
        });
        self
    }
}

/// Conversion of a captured value into a tree that evaluates to it.
///
/// Returning `None` means the value kind has no tree form; flattening then
/// fails with [`ReifyError::UnsupportedCapture`](crate::ReifyError).
pub trait Lift<V> {
    fn lift(&self, value: &V, ty: &Tree) -> Option<Tree>;
}

impl<V, F> Lift<V> for F
where
    F: Fn(&V, &Tree) -> Option<Tree>,
{
    fn lift(&self, value: &V, ty: &Tree) -> Option<Tree> {
        self(value, ty)
    }
}
