//! Extension rewriting followed by expansion through the evaluator.

use ext_ir::{DefDef, ModFlags, Span, TreeKind};
use extc::{ErrorCode, Severity, Toolbox, Tree, TreePrinter};
use pretty_assertions::assert_eq;

use crate::common::{session, Builder, Env, Evaluator, Value};

fn members(tree: &Tree) -> &[Tree] {
    match &tree.kind {
        TreeKind::Package { stats, .. } => stats,
        TreeKind::ModuleDef(def) => &def.body,
        TreeKind::ClassDef(def) => &def.body,
        _ => panic!("container expected"),
    }
}

fn only_method(tree: &Tree) -> &DefDef {
    match &members(tree)[0].kind {
        TreeKind::DefDef(def) => def,
        _ => panic!("method expected"),
    }
}

/// Run a staged generator for the call `<wrapper>(receiver).<method>(args)`
/// and return the expansion.
fn expand(
    evaluator: &Evaluator,
    builder: &Builder,
    wrapper: &Tree,
    companion: &Tree,
    receiver: Tree,
    args: Vec<Tree>,
) -> Tree {
    let TreeKind::ClassDef(class) = &wrapper.kind else {
        panic!("wrapper class expected");
    };
    let generator = only_method(companion);

    // The implicit conversion puts the receiver into the prefix.
    let prefix = Tree::apply(
        Tree::ident(class.name, Span::DUMMY),
        vec![receiver],
        Span::DUMMY,
    );
    let mut env = Env::default();
    let context = &generator.vparamss[0][0];
    env.bind(context.name, Value::Context { prefix });
    for (param, arg) in generator.vparamss[1].iter().zip(args) {
        env.bind(param.name, Value::Tree(arg));
    }

    match evaluator.eval(&generator.rhs, &mut env).unwrap() {
        Value::Tree(expansion) => expansion,
        other => panic!(
            "generator returned {other:?} for {}",
            TreePrinter::print(&builder.interner, &generator.rhs)
        ),
    }
}

fn run(evaluator: &Evaluator, tree: &Tree) -> Value {
    evaluator.compile(tree).unwrap()()
}

#[test]
fn staged_extension_end_to_end() {
    let (session, b, evaluator) = session();
    // @extend(Int) def str1(): String = self.toString
    let str1 = b.def(
        Some(b.annotation("extend", b.ident("Int"))),
        "str1",
        &[],
        Some("String"),
        b.select(b.ident("self"), "toString"),
    );
    let unit = b.package("p", vec![b.object("Exts", vec![str1])]);

    let outcome = session.rewrite(unit);
    assert!(!outcome.is_failed(), "{:?}", outcome.diagnostics);
    assert!(outcome.diagnostics.is_empty());

    let exts = &members(&outcome.tree)[0];
    let [wrapper, companion] = members(exts) else {
        panic!("wrapper and companion expected");
    };
    assert!(only_method(wrapper).mods.has(ModFlags::MACRO));

    // 10.str1()
    let expansion = expand(&evaluator, &b, wrapper, companion, b.int(10), vec![]);
    assert_eq!(TreePrinter::print(&b.interner, &expansion), "10.toString");
    assert_eq!(run(&evaluator, &expansion), Value::Str("10".to_owned()));
}

#[test]
fn staged_parameters_are_spliced_into_the_expansion() {
    let (session, b, evaluator) = session();
    // @extend(Int) def plus2(n: Int): Int = self.plus(n)
    let plus2 = b.def(
        Some(b.annotation("extend", b.ident("Int"))),
        "plus2",
        &["n"],
        Some("Int"),
        b.method_call(b.ident("self"), "plus", vec![b.ident("n")]),
    );
    let outcome = session.rewrite(b.package("p", vec![plus2]));
    assert!(!outcome.is_failed());

    let [wrapper, companion] = members(&outcome.tree) else {
        panic!("wrapper and companion expected");
    };
    // 10.plus2(inc(4))
    let arg = b.call("inc", vec![b.int(4)]);
    let expansion = expand(&evaluator, &b, wrapper, companion, b.int(10), vec![arg]);
    assert_eq!(TreePrinter::print(&b.interner, &expansion), "10.plus(inc(4))");
    assert_eq!(run(&evaluator, &expansion), Value::Int(15));
}

#[test]
fn missing_result_type_yields_no_declarations() {
    let (session, b, _) = session();
    let broken = b.def(
        Some(b.annotation("extend", b.ident("Int"))),
        "str1",
        &[],
        None,
        b.select(b.ident("self"), "toString"),
    );
    let unit = b.package("p", vec![b.object("Exts", vec![broken])]);

    let outcome = session.rewrite(unit);
    assert!(outcome.is_failed());
    assert!(members(&members(&outcome.tree)[0]).is_empty());
    assert_eq!(outcome.errors().map(|d| d.code).collect::<Vec<_>>(), [ErrorCode::E2001]);
}

#[test]
fn runtime_extension_runs_its_copied_body() {
    let (session, b, evaluator) = session();
    // @runtimeExtend(Int) def twice(): Int = self.plus(self)
    let twice = b.def(
        Some(b.annotation("runtimeExtend", b.ident("Int"))),
        "twice",
        &[],
        Some("Int"),
        b.method_call(b.ident("self"), "plus", vec![b.ident("self")]),
    );
    let outcome = session.rewrite(b.package("p", vec![twice]));

    assert!(!outcome.is_failed());
    let warnings: Vec<_> = outcome.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].code, ErrorCode::E4001);

    let [wrapper] = members(&outcome.tree) else {
        panic!("a single wrapper class expected");
    };
    let TreeKind::ClassDef(class) = &wrapper.kind else {
        panic!("wrapper class expected");
    };
    let method = only_method(wrapper);
    assert!(!method.mods.has(ModFlags::MACRO));

    let mut env = Env::default();
    env.bind(class.ctor_params[0].name, Value::Int(21));
    assert_eq!(evaluator.eval(&method.rhs, &mut env).unwrap(), Value::Int(42));
}

#[test]
fn prefix_of_unexpected_shape_fails_at_expansion() {
    let (session, b, evaluator) = session();
    let str1 = b.def(
        Some(b.annotation("extend", b.ident("Int"))),
        "str1",
        &[],
        Some("String"),
        b.select(b.ident("self"), "toString"),
    );
    let outcome = session.rewrite(b.package("p", vec![str1]));
    let generator = only_method(&members(&outcome.tree)[1]);

    // A prefix that is not `wrapper(receiver)`.
    let mut env = Env::default();
    env.bind(
        generator.vparamss[0][0].name,
        Value::Context { prefix: b.int(10) },
    );
    let err = evaluator.eval(&generator.rhs, &mut env).unwrap_err();
    assert!(err.to_string().starts_with("no case matched"), "{err}");
}
