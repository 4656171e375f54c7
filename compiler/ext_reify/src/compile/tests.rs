#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;

use ext_ir::{Name, Span};
use pretty_assertions::assert_eq;

use super::*;

#[derive(Debug, thiserror::Error)]
#[error("rejected: {0}")]
struct Rejected(&'static str);

/// Records what it was asked to compile; accepts according to `policy`.
struct RecordingToolbox {
    seen: RefCell<Vec<bool>>,
    policy: fn(has_attrs: bool) -> Result<(), Rejected>,
}

impl RecordingToolbox {
    fn new(policy: fn(bool) -> Result<(), Rejected>) -> Self {
        RecordingToolbox {
            seen: RefCell::new(Vec::new()),
            policy,
        }
    }
}

impl Toolbox<i64> for RecordingToolbox {
    type Error = Rejected;

    fn compile(&self, tree: &Tree) -> Result<Compiled<i64>, Rejected> {
        let has_attrs = tree.has_attrs();
        self.seen.borrow_mut().push(has_attrs);
        (self.policy)(has_attrs)?;
        Ok(Box::new(|| 42))
    }
}

fn typed_tree(interner: &StringInterner) -> Tree {
    Tree::int(42, Span::new(0, 2)).with_ty(interner.intern("Int"))
}

#[test]
fn first_attempt_resets_attributes() {
    let interner = StringInterner::new();
    let toolbox = RecordingToolbox::new(|_| Ok(()));

    let compiled = compile(&toolbox, &typed_tree(&interner), &interner).unwrap();
    assert_eq!(compiled(), 42);
    assert_eq!(*toolbox.seen.borrow(), [false]);
}

#[test]
fn retry_keeps_attributes() {
    let interner = StringInterner::new();
    let toolbox = RecordingToolbox::new(|has_attrs| {
        if has_attrs {
            Ok(())
        } else {
            Err(Rejected("types missing"))
        }
    });

    let compiled = compile(&toolbox, &typed_tree(&interner), &interner).unwrap();
    assert_eq!(compiled(), 42);
    assert_eq!(*toolbox.seen.borrow(), [false, true]);
}

#[test]
fn both_failures_are_kept() {
    let interner = StringInterner::new();
    let toolbox = RecordingToolbox::new(|has_attrs| {
        Err(Rejected(if has_attrs { "second" } else { "first" }))
    });

    let Err(err) = compile(&toolbox, &typed_tree(&interner), &interner) else {
        panic!("both attempts should fail");
    };
    assert_eq!(err.tree, "42");
    assert_eq!(err.first.0, "first");
    assert_eq!(err.second.0, "second");
    assert_eq!(
        err.to_string(),
        "could not compile generated tree `42`: rejected: first; \
         retry keeping attached types: rejected: second"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn compiled_function_is_repeatable() {
    let interner = StringInterner::new();
    let toolbox = RecordingToolbox::new(|_| Ok(()));
    let tree = Tree::ident(Name::EMPTY, Span::DUMMY);

    let compiled = compile(&toolbox, &tree, &interner).unwrap();
    assert_eq!((compiled(), compiled()), (42, 42));
}
