//! Extension-method rewriting.
//!
//! Finds definitions annotated with `@extend(T)` (or `@runtimeExtend(T)`) and
//! replaces each with synthetic declarations that make the definition
//! callable as `x.method(args)` on any `x: T`.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → **Extension Rewrite** → Type Check → ...
//! ```
//!
//! # What Happens During a Rewrite
//!
//! 1. **Driver** (`driver`): walks the unit; members of objects and packages
//!    are checked for extension annotations
//! 2. **Annotation matching** (`annotation`): canonical, runtime and
//!    deprecated spellings, ambiguity detection
//! 3. **Target conversion** (`type_expr`): the annotation argument is a value
//!    expression and is converted into a type tree
//! 4. **Name guard** (`guard`): a staged body may not redeclare `self` or a
//!    parameter name
//! 5. **Synthesis** (`synth`): implicit wrapper class, plus a companion
//!    object holding the staged generator, whose body is quoted after
//!    `splice` rewrites captured references
//!
//! Every failure is local to one definition: it is reported through the
//! [`DiagnosticSink`](ext_diagnostic::DiagnosticSink), the definition is
//! dropped, and its siblings are still rewritten.

mod annotation;
mod context;
mod driver;
mod fresh;
mod guard;
mod splice;
mod synth;
mod type_expr;

pub use annotation::{match_annotation, AnnotationMatch, AnnotationNames, ExtensionKind};
pub use context::{AnnotationSpelling, RewriteCtx, RewriteOptions};
pub use driver::rewrite_unit;
pub use fresh::FreshNames;
pub use guard::{check_reserved_names, BindingKind, Redeclaration, ReservedNames};
pub use splice::splice_reserved;
pub use type_expr::{partition_type_params, to_type_tree, ExtensionTarget, TypeExprError};
