//! Reified values.
//!
//! A reified value pairs a runtime value with the expression that rebuilds
//! it. The expression may refer to other runtime values through
//! `CaptureTag(i)` placeholders, and a captured value may itself be
//! reified, so captures form a tree.
//!
//! Turning a reified value back into something callable takes three steps:
//!
//! 1. **Flatten** (`flatten`): collapse nested captures into one ordered
//!    list, converting leaf values to trees with a caller-supplied [`Lift`]
//! 2. **Emit** (`emit`): bind every capture to `capture$i` and replace the
//!    placeholders, producing one self-contained block
//! 3. **Compile** (`compile`): hand the block to a [`Toolbox`], retrying once
//!    with attached types kept if the first attempt fails
//!
//! Each step is deterministic, so a reified value can be compiled again and
//! again with the same result.

mod compile;
mod emit;
mod error;
mod flatten;
mod value;

pub use compile::{compile, CompileError, Compiled, Toolbox};
pub use emit::{capture_name, emit};
pub use error::ReifyError;
pub use flatten::{flatten, CaptureOrigin, FlatCapture, Flattened};
pub use value::{Capture, Lift, Reified};
