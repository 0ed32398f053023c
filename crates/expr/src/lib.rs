//! A restricted, SQL-like expression evaluator. No external I/O, no
//! shelling, no general code evaluation — arithmetic, comparison, logical
//! operators, `CASE WHEN`, `LIKE`, `IS [NOT] NULL/EMPTY`, and a small function
//! set (`DATE`, `DATEADD`, `GETUTCDATE`) evaluated against a read-only,
//! per-application flattened context.

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

pub use ast::{BinaryOp, Expr};
pub use context::EvalContext;
pub use error::{ExpressionError, Result};
pub use eval::Evaluator;

/// Parses and evaluates `source` against `ctx` in one call. Returns `Err`
/// only when `source` violates the grammar; unknown identifiers and division
/// by zero resolve to `Value::Null`, not an error.
pub fn evaluate(source: &str, ctx: &EvalContext) -> Result<model::core::value::Value> {
    let expr = parser::parse(source)?;
    Ok(expr.evaluate(ctx).unwrap_or(model::core::value::Value::Null))
}
