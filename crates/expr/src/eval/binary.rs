use crate::ast::BinaryOp;
use model::core::value::Value;

/// Evaluates one binary operation. Division (and integer-division, modulo)
/// by zero yields `None` rather than propagating a panic or error.
pub struct BinaryOpEvaluator<'a> {
    left: &'a Value,
    op: &'a BinaryOp,
    right: &'a Value,
}

impl<'a> BinaryOpEvaluator<'a> {
    pub fn new(left: &'a Value, op: &'a BinaryOp, right: &'a Value) -> Self {
        Self { left, op, right }
    }

    pub fn evaluate(&self) -> Option<Value> {
        eval_binary(self.left, self.op, self.right)
    }
}

pub fn eval_binary(left: &Value, op: &BinaryOp, right: &Value) -> Option<Value> {
    use BinaryOp::*;
    match op {
        Add | Sub | Mul | Div | IntDiv | Mod | Pow => eval_arithmetic(left, op, right),
        Eq => Some(Value::Boolean(values_eq(left, right))),
        Ne => Some(Value::Boolean(!values_eq(left, right))),
        Lt | Gt | Le | Ge => eval_ordering(left, op, right),
        And => match (left.as_bool(), right.as_bool()) {
            (Some(a), Some(b)) => Some(Value::Boolean(a && b)),
            _ => None,
        },
        Or => match (left.as_bool(), right.as_bool()) {
            (Some(a), Some(b)) => Some(Value::Boolean(a || b)),
            _ => None,
        },
        Like => eval_like(left, right),
    }
}

fn values_eq(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return a == b;
    }
    left.as_string() == right.as_string()
}

fn eval_ordering(left: &Value, op: &BinaryOp, right: &Value) -> Option<Value> {
    let ordering = left.partial_cmp(right)?;
    use std::cmp::Ordering::*;
    let result = match op {
        BinaryOp::Lt => ordering == Less,
        BinaryOp::Gt => ordering == Greater,
        BinaryOp::Le => ordering != Greater,
        BinaryOp::Ge => ordering != Less,
        _ => unreachable!(),
    };
    Some(Value::Boolean(result))
}

fn eval_arithmetic(left: &Value, op: &BinaryOp, right: &Value) -> Option<Value> {
    let a = left.as_f64()?;
    let b = right.as_f64()?;

    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return None;
            }
            a / b
        }
        BinaryOp::IntDiv => {
            if b == 0.0 {
                return None;
            }
            (a / b).floor()
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return None;
            }
            a % b
        }
        BinaryOp::Pow => a.powf(b),
        _ => unreachable!(),
    };

    if result.fract() == 0.0 && result.abs() < i64::MAX as f64 {
        Some(Value::Int(result as i64))
    } else {
        Some(Value::Float(result))
    }
}

/// `LIKE` with SQL `%` wildcards. `_` is treated literally, only `%` is
/// recognized as a wildcard.
fn eval_like(left: &Value, pattern: &Value) -> Option<Value> {
    let text = left.as_string()?;
    let pattern = pattern.as_string()?;
    Some(Value::Boolean(like_match(&text, &pattern)))
}

fn like_match(text: &str, pattern: &str) -> bool {
    let segments: Vec<&str> = pattern.split('%').collect();
    if segments.len() == 1 {
        return text.eq_ignore_ascii_case(pattern);
    }

    let text_lower = text.to_ascii_lowercase();
    let mut cursor = 0usize;

    if let Some(first) = segments.first() {
        let first_lower = first.to_ascii_lowercase();
        if !first_lower.is_empty() {
            if !text_lower.starts_with(&first_lower) {
                return false;
            }
            cursor = first_lower.len();
        }
    }

    for (i, seg) in segments.iter().enumerate() {
        if i == 0 || seg.is_empty() {
            continue;
        }
        let seg_lower = seg.to_ascii_lowercase();
        let is_last = i == segments.len() - 1;
        if is_last {
            return text_lower[cursor..].ends_with(&seg_lower);
        }
        match text_lower[cursor..].find(&seg_lower) {
            Some(found) => cursor += found + seg_lower.len(),
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcard_prefix_and_suffix() {
        assert!(like_match("officer_code_6009", "officer_code_%"));
        assert!(like_match("open-door", "%door"));
        assert!(!like_match("closed-door", "%window"));
    }

    #[test]
    fn division_by_zero_is_none() {
        assert_eq!(
            eval_binary(&Value::Int(4), &BinaryOp::Div, &Value::Int(0)),
            None
        );
    }
}
