use thiserror::Error;

/// Fails with `ExpressionParseError` only when the grammar is violated.
/// Evaluation itself never errors — unresolvable identifiers and division
/// by zero both produce `Value::Null`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("expression parse error at position {position}: {message}")]
    Parse { message: String, position: usize },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, ExpressionError>;
