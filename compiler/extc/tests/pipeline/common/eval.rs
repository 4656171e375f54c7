//! A tree evaluator standing in for the host.
//!
//! Knows just enough to run generated generators (`c.prefix.tree`,
//! `c.Expr[T](..)`, the prefix extractor match, quotes with splices) and
//! the arithmetic the tests use.

use ext_ir::visitor::walk_fold_tree;
use ext_ir::{Folder, Literal, Name, TreeKind};
use extc::{Compiled, SharedInterner, Toolbox, Tree, TreePrinter};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    Unit,
    /// A staged expression.
    Tree(Tree),
    /// A generator's compilation context.
    Context { prefix: Tree },
}

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("unbound name `{0}`")]
    Unbound(String),
    #[error("no member `{member}` on {value}")]
    NoMember { member: String, value: String },
    #[error("cannot apply `{0}` to these arguments")]
    BadCall(String),
    #[error("no case matched {0}")]
    MatchError(String),
    #[error("spliced value is not a tree: {0}")]
    NotStaged(String),
    #[error("unsupported tree `{0}`")]
    Unsupported(String),
}

/// Lexically scoped bindings.
#[derive(Clone, Debug, Default)]
pub struct Env {
    bindings: Vec<(Name, Value)>,
}

impl Env {
    pub fn bind(&mut self, name: Name, value: Value) {
        self.bindings.push((name, value));
    }

    fn lookup(&self, name: Name) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

#[derive(Clone)]
pub struct Evaluator {
    interner: SharedInterner,
}

impl Evaluator {
    pub fn new(interner: SharedInterner) -> Self {
        Evaluator { interner }
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn print(&self, tree: &Tree) -> String {
        TreePrinter::print(&self.interner, tree)
    }

    /// Tree form of a runtime value, if it has one.
    pub fn lift(&self, value: &Value) -> Option<Tree> {
        let span = ext_ir::Span::DUMMY;
        match value {
            Value::Int(v) => Some(Tree::int(*v, span)),
            Value::Bool(b) => Some(Tree::lit(Literal::Bool(*b), span)),
            Value::Str(s) => Some(Tree::lit(Literal::Str(self.interner.intern(s)), span)),
            Value::Unit => Some(Tree::lit(Literal::Unit, span)),
            Value::Tree(_) | Value::Context { .. } => None,
        }
    }

    pub fn eval(&self, tree: &Tree, env: &mut Env) -> Result<Value, EvalError> {
        match &tree.kind {
            TreeKind::Literal(lit) => Ok(match lit {
                Literal::Int(v) => Value::Int(*v),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Str(s) => Value::Str(self.name(*s).to_owned()),
                Literal::Unit => Value::Unit,
            }),
            TreeKind::Ident(name) => env
                .lookup(*name)
                .cloned()
                .ok_or_else(|| EvalError::Unbound(self.name(*name).to_owned())),
            TreeKind::Block { stats, expr } => {
                let mark = env.bindings.len();
                let result = self.eval_block(stats, expr, env);
                env.bindings.truncate(mark);
                result
            }
            TreeKind::Select { qual, name } => {
                let qual = self.eval(qual, env)?;
                self.select(qual, self.name(*name))
            }
            TreeKind::Apply { fun, args } => self.apply(fun, args, env),
            TreeKind::Match { scrutinee, cases } => {
                let value = self.eval(scrutinee, env)?;
                for case in cases {
                    let mark = env.bindings.len();
                    if self.matches(&case.pat, &value, env) {
                        let result = self.eval(&case.body, env);
                        env.bindings.truncate(mark);
                        return result;
                    }
                    env.bindings.truncate(mark);
                }
                Err(EvalError::MatchError(format!("{value:?}")))
            }
            TreeKind::Quote(body) => {
                let mut unquote = Unquote {
                    evaluator: self,
                    env,
                    error: None,
                };
                let tree = unquote.fold_tree((**body).clone());
                match unquote.error {
                    Some(err) => Err(err),
                    None => Ok(Value::Tree(tree)),
                }
            }
            _ => Err(EvalError::Unsupported(self.print(tree))),
        }
    }

    fn eval_block(&self, stats: &[Tree], expr: &Tree, env: &mut Env) -> Result<Value, EvalError> {
        for stat in stats {
            if let TreeKind::ValDef(def) = &stat.kind {
                let value = match &def.rhs {
                    Some(rhs) => self.eval(rhs, env)?,
                    None => Value::Unit,
                };
                env.bind(def.name, value);
            } else {
                self.eval(stat, env)?;
            }
        }
        self.eval(expr, env)
    }

    fn select(&self, qual: Value, member: &str) -> Result<Value, EvalError> {
        match (qual, member) {
            (Value::Context { prefix }, "prefix") => Ok(Value::Tree(prefix)),
            (Value::Tree(tree), "tree") => Ok(Value::Tree(tree)),
            (Value::Int(v), "toString") => Ok(Value::Str(v.to_string())),
            (qual, member) => Err(EvalError::NoMember {
                member: member.to_owned(),
                value: format!("{qual:?}"),
            }),
        }
    }

    fn apply(&self, fun: &Tree, args: &[Tree], env: &mut Env) -> Result<Value, EvalError> {
        // c.Expr[T](tree): the staged value is the tree itself.
        if let TreeKind::TypeApply { fun: ctor, .. } = &fun.kind {
            if let TreeKind::Select { name, .. } = &ctor.kind {
                if self.name(*name) == "Expr" {
                    let [arg] = args else {
                        return Err(EvalError::BadCall(self.print(fun)));
                    };
                    return self.eval(arg, env);
                }
            }
        }

        let values = args
            .iter()
            .map(|arg| self.eval(arg, env))
            .collect::<Result<Vec<_>, _>>()?;
        let result = match (&fun.kind, values.as_slice()) {
            (TreeKind::Ident(name), [Value::Int(a), Value::Int(b)]) if self.name(*name) == "add" => {
                Some(Value::Int(a + b))
            }
            (TreeKind::Ident(name), [Value::Int(a)]) if self.name(*name) == "inc" => {
                Some(Value::Int(a + 1))
            }
            (TreeKind::Select { qual, name }, [Value::Int(b)]) if self.name(*name) == "plus" => {
                match self.eval(qual, env)? {
                    Value::Int(a) => Some(Value::Int(a + b)),
                    _ => None,
                }
            }
            (TreeKind::Select { qual, name }, []) => {
                let recv = self.eval(qual, env)?;
                Some(self.select(recv, self.name(*name))?)
            }
            _ => None,
        };
        result.ok_or_else(|| EvalError::BadCall(self.print(fun)))
    }

    /// Match `value` against a pattern, binding names into `env`.
    fn matches(&self, pat: &Tree, value: &Value, env: &mut Env) -> bool {
        match &pat.kind {
            TreeKind::Wildcard => true,
            TreeKind::Bind { name, pat } => {
                let matched = self.matches(pat, value, env);
                if matched {
                    env.bind(*name, value.clone());
                }
                matched
            }
            TreeKind::Literal(Literal::Int(v)) => *value == Value::Int(*v),
            // Apply(fun, args) extractor over a staged tree.
            TreeKind::Apply { fun, args } if self.is_extractor(fun, "Apply") => {
                let (Value::Tree(tree), [fun_pat, args_pat]) = (value, args.as_slice()) else {
                    return false;
                };
                let TreeKind::Apply { fun, args } = &tree.kind else {
                    return false;
                };
                self.matches(fun_pat, &Value::Tree((**fun).clone()), env)
                    && self.matches_list(args_pat, args, env)
            }
            _ => false,
        }
    }

    fn matches_list(&self, pat: &Tree, trees: &[Tree], env: &mut Env) -> bool {
        match &pat.kind {
            TreeKind::Wildcard => true,
            TreeKind::Apply { fun, args } if self.is_extractor(fun, "List") => {
                args.len() == trees.len()
                    && args
                        .iter()
                        .zip(trees)
                        .all(|(p, t)| self.matches(p, &Value::Tree(t.clone()), env))
            }
            _ => false,
        }
    }

    fn is_extractor(&self, fun: &Tree, name: &str) -> bool {
        matches!(fun.kind, TreeKind::Ident(n) if self.name(n) == name)
    }
}

/// Evaluates the splices of a quote.
struct Unquote<'e> {
    evaluator: &'e Evaluator,
    env: &'e mut Env,
    error: Option<EvalError>,
}

impl Unquote<'_> {
    /// Keep the first error only.
    fn fail(&mut self, err: EvalError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl Folder for Unquote<'_> {
    fn fold_tree(&mut self, tree: Tree) -> Tree {
        let TreeKind::Splice(inner) = &tree.kind else {
            return walk_fold_tree(self, tree);
        };
        match self.evaluator.eval(inner, self.env) {
            Ok(Value::Tree(staged)) => staged,
            Ok(other) => {
                self.fail(EvalError::NotStaged(format!("{other:?}")));
                tree
            }
            Err(err) => {
                self.fail(err);
                tree
            }
        }
    }
}

impl Toolbox<Value> for Evaluator {
    type Error = EvalError;

    fn compile(&self, tree: &Tree) -> Result<Compiled<Value>, EvalError> {
        // Evaluation is pure, so a tree that evaluates once always does.
        self.eval(tree, &mut Env::default())?;
        let evaluator = self.clone();
        let tree = tree.clone();
        Ok(Box::new(move || {
            evaluator
                .eval(&tree, &mut Env::default())
                .expect("evaluated at compile time")
        }))
    }
}
