//! Compilation of emitted trees through a host toolbox.

use ext_ir::{StringInterner, Tree, TreePrinter};

/// A compiled, repeatable evaluation of a generated tree.
pub type Compiled<V> = Box<dyn Fn() -> V>;

/// Host code generator.
pub trait Toolbox<V> {
    type Error: std::error::Error;

    /// Compile `tree` into a function that evaluates it.
    fn compile(&self, tree: &Tree) -> Result<Compiled<V>, Self::Error>;
}

/// Both compile attempts failed.
#[derive(Debug, thiserror::Error)]
#[error("could not compile generated tree `{tree}`: {first}; retry keeping attached types: {second}")]
pub struct CompileError<E: std::error::Error + 'static> {
    /// Printed form of the tree that was rejected.
    pub tree: String,
    /// Failure with attached types reset.
    pub first: E,
    /// Failure of the retry with attached types kept.
    #[source]
    pub second: E,
}

/// Compile `tree`, first with attached types dropped, then once more as is.
///
/// Dropping attached types lets the host retype a tree assembled from parts
/// typed in different scopes; some hosts need the original types, hence the
/// second attempt.
#[tracing::instrument(level = "debug", skip_all, fields(has_attrs = tree.has_attrs()))]
pub fn compile<V, T>(
    toolbox: &T,
    tree: &Tree,
    interner: &StringInterner,
) -> Result<Compiled<V>, CompileError<T::Error>>
where
    T: Toolbox<V> + ?Sized,
    T::Error: 'static,
{
    let reset = tree.clone().reset_attrs();
    let first = match toolbox.compile(&reset) {
        Ok(compiled) => return Ok(compiled),
        Err(err) => err,
    };
    tracing::warn!(error = %first, "compile with reset types failed; retrying with types kept");

    match toolbox.compile(tree) {
        Ok(compiled) => Ok(compiled),
        Err(second) => Err(CompileError {
            tree: TreePrinter::print(interner, tree),
            first,
            second,
        }),
    }
}

#[cfg(test)]
mod tests;
