pub mod binary;

use crate::{ast::Expr, context::EvalContext, functions::FunctionRegistry};
use model::core::value::Value;
use tracing::warn;

/// Evaluates a parsed expression against a context. Never returns an error —
/// unresolved identifiers, type mismatches, and division by zero all
/// propagate as `None` (the null value).
pub trait Evaluator {
    fn evaluate(&self, ctx: &EvalContext) -> Option<Value>;
}

impl Evaluator for Expr {
    fn evaluate(&self, ctx: &EvalContext) -> Option<Value> {
        match self {
            Expr::Identifier(name) => match ctx.resolve(name) {
                Value::Null => None,
                v => Some(v),
            },
            Expr::Literal(v) => Some(v.clone()),
            Expr::Binary { left, op, right } => {
                let l = left.evaluate(ctx)?;
                let r = right.evaluate(ctx)?;
                binary::eval_binary(&l, op, &r)
            }
            Expr::Not(inner) => match inner.evaluate(ctx) {
                Some(Value::Boolean(b)) => Some(Value::Boolean(!b)),
                _ => None,
            },
            Expr::FunctionCall { name, args } => {
                let evaluated: Vec<Value> = args.iter().filter_map(|a| a.evaluate(ctx)).collect();
                if evaluated.len() != args.len() {
                    // an argument resolved to null; functions in this grammar
                    // don't get a chance to special-case that, so the whole
                    // call yields null (consistent with null-propagation).
                    return None;
                }
                match FunctionRegistry::new().call(name, &evaluated) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        warn!(function = %name, error = %e, "function evaluation failed");
                        None
                    }
                }
            }
            Expr::Case {
                branches,
                else_expr,
            } => {
                for branch in branches {
                    if let Some(Value::Boolean(true)) = branch.condition.evaluate(ctx) {
                        return branch.value.evaluate(ctx);
                    }
                }
                else_expr.as_ref().and_then(|e| e.evaluate(ctx))
            }
            Expr::IsNull(inner) => Some(Value::Boolean(inner.evaluate(ctx).is_none())),
            Expr::IsNotNull(inner) => Some(Value::Boolean(inner.evaluate(ctx).is_some())),
            Expr::IsEmpty(inner) => Some(Value::Boolean(
                inner.evaluate(ctx).map(|v| v.is_empty_like()).unwrap_or(true),
            )),
            Expr::IsNotEmpty(inner) => Some(Value::Boolean(
                !inner.evaluate(ctx).map(|v| v.is_empty_like()).unwrap_or(true),
            )),
        }
    }
}
