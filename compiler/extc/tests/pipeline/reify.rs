//! Reified values compiled through the evaluator.

use extc::{ErrorCode, Reified, ReifiedError, ReifyError, Severity, Tree, TreePrinter};
use pretty_assertions::assert_eq;

use crate::common::{session, Builder, EvalError, Value};

/// R2 = add(R1, 7) where R1 = inc(5).
fn nested(b: &Builder) -> Reified<Value> {
    let r1 = Reified::new(Value::Int(6), b.call("inc", vec![b.tag(0)]))
        .with_leaf(Value::Int(5), b.ty("Int"));
    Reified::new(Value::Int(13), b.call("add", vec![b.tag(0), b.tag(1)]))
        .with_nested(r1, b.ty("Int"))
        .with_leaf(Value::Int(7), b.ty("Int"))
}

#[test]
fn nested_value_compiles_to_its_value() {
    let (session, b, evaluator) = session();
    let lift = |v: &Value, _: &Tree| evaluator.lift(v);
    let r2 = nested(&b);

    let tree = session.emit_reified(&r2, &lift).unwrap();
    assert_eq!(
        TreePrinter::print(&b.interner, &tree),
        "{ val capture$0: Int = 5; val capture$1: Int = inc(capture$0); \
         val capture$2: Int = 7; add(capture$1, capture$2) }"
    );

    let compiled = session.compile_reified(&r2, &lift, &evaluator).unwrap();
    assert_eq!(compiled(), r2.value);
}

#[test]
fn recompiling_is_deterministic() {
    let (session, b, evaluator) = session();
    let lift = |v: &Value, _: &Tree| evaluator.lift(v);
    let r2 = nested(&b);

    let first = session.emit_reified(&r2, &lift).unwrap();
    let second = session.emit_reified(&r2, &lift).unwrap();
    assert_eq!(first, second);

    let compiled = session.compile_reified(&r2, &lift, &evaluator).unwrap();
    let again = session.compile_reified(&r2, &lift, &evaluator).unwrap();
    assert_eq!(compiled(), again());
}

#[test]
fn value_without_captures() {
    let (session, b, evaluator) = session();
    let lift = |v: &Value, _: &Tree| evaluator.lift(v);
    let reified = Reified::new(Value::Str("hi".to_owned()), b.select(b.int(42), "toString"));

    let tree = session.emit_reified(&reified, &lift).unwrap();
    assert_eq!(tree, reified.expr);
    let compiled = session.compile_reified(&reified, &lift, &evaluator).unwrap();
    assert_eq!(compiled(), Value::Str("42".to_owned()));
}

#[test]
fn unliftable_capture_is_a_reify_error() {
    let (session, b, evaluator) = session();
    let lift = |v: &Value, _: &Tree| evaluator.lift(v);
    let reified = Reified::new(Value::Unit, b.call("inc", vec![b.tag(0)]))
        .with_leaf(Value::Tree(b.int(1)), b.ty("Tree"));

    let err = session.compile_reified(&reified, &lift, &evaluator).err().unwrap();
    assert!(matches!(
        err,
        ReifiedError::Reify(ReifyError::UnsupportedCapture { .. })
    ));

    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E3002);
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.message, "captured value #0 has no tree representation");
}

#[test]
fn rejected_tree_reports_both_attempts() {
    let (session, b, evaluator) = session();
    let lift = |v: &Value, _: &Tree| evaluator.lift(v);
    let reified = Reified::new(Value::Unit, b.call("missing", vec![b.tag(0)]))
        .with_leaf(Value::Int(1), b.ty("Int"));

    let err = session.compile_reified(&reified, &lift, &evaluator).err().unwrap();
    assert_eq!(err.to_diagnostic().code, ErrorCode::E5001);
    let err = match err {
        ReifiedError::Compile(err) => err,
        ReifiedError::Reify(err) => panic!("compile error expected, got {err}"),
    };
    assert_eq!(err.tree, "{ val capture$0: Int = 1; missing(capture$0) }");
    assert!(matches!(err.first, EvalError::BadCall(_)));
    assert!(matches!(err.second, EvalError::BadCall(_)));
}
