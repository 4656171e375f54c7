//! Shared test utilities: a tree evaluator and tree builders.

mod builders;
mod eval;

pub use builders::Builder;
pub use eval::{Env, EvalError, Evaluator, Value};

use extc::{Session, SessionConfig};

/// A fresh session plus a builder and evaluator over its interner.
///
/// Set `EXT_LOG=debug` to see the rewriter's trace while a test runs.
pub fn session() -> (Session, Builder, Evaluator) {
    extc::init_tracing();
    let session = Session::new(SessionConfig::from_env());
    let builder = Builder::new(session.interner().clone());
    let evaluator = Evaluator::new(session.interner().clone());
    (session, builder, evaluator)
}
