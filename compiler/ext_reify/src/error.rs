//! Errors raised while flattening a reified value.

use ext_ir::{CaptureIndex, Tree};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ReifyError {
    /// The lift function has no tree form for a captured leaf value.
    #[error("captured value #{index} has no tree representation")]
    UnsupportedCapture { index: CaptureIndex, ty: Box<Tree> },

    /// The expression refers to a capture that does not exist.
    #[error("capture #{index} referenced, but only {count} captures are present")]
    DanglingCapture { index: CaptureIndex, count: usize },
}
