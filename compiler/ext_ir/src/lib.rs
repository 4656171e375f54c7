//! Ext IR - syntax tree types for the extension rewriter.
//!
//! This crate contains the data structures every other `ext_*` crate works on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - The `Tree` sum type (identifiers, applications, definitions, staging nodes)
//! - A read-only `Visitor` and an owning `Folder` for traversal
//! - A printer producing source-like text for diagnostics
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)`, compared in O(1)
//! - **Trees Are Values**: every rewrite builds a new tree; nothing is
//!   mutated in place, so a subtree can be cloned into two sibling
//!   declarations without sharing identity
//! - **Exhaustive Shapes**: every node kind is a `TreeKind` variant, so a pass
//!   that forgets a shape fails to compile instead of silently falling through

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
pub mod print;
mod span;
pub mod stack;
pub mod tree;
pub mod visitor;

pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use print::TreePrinter;
pub use span::Span;
pub use tree::{
    CaptureIndex, CaseDef, ClassDef, DefDef, Literal, ModFlags, Modifiers, ModuleDef, Tree,
    TreeKind, TypeParam, ValDef,
};
pub use visitor::{Folder, Visitor};
