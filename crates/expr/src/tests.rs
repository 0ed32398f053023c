use crate::{context::EvalContext, evaluate};
use model::core::value::Value;

#[test]
fn case_when_picks_first_true_branch() {
    let mut ctx = EvalContext::new();
    ctx.set("status", Value::String("A".into()));
    let result = evaluate(
        "CASE WHEN status = 'A' THEN 1 WHEN status = 'B' THEN 2 ELSE 0 END",
        &ctx,
    )
    .unwrap();
    assert_eq!(result, Value::Int(1));
}

#[test]
fn unknown_identifier_is_null_not_error() {
    let ctx = EvalContext::new();
    let result = evaluate("missing_field IS NULL", &ctx).unwrap();
    assert_eq!(result, Value::Boolean(true));
}

#[test]
fn like_with_wildcard() {
    let mut ctx = EvalContext::new();
    ctx.set("email_domain", Value::String("noreply@example.com".into()));
    let result = evaluate("email_domain LIKE '%@example.com'", &ctx).unwrap();
    assert_eq!(result, Value::Boolean(true));
}

#[test]
fn malformed_expression_is_parse_error() {
    let ctx = EvalContext::new();
    let err = evaluate("CASE WHEN 1 = 1", &ctx).unwrap_err();
    assert!(matches!(err, crate::error::ExpressionError::Parse { .. }));
}

#[test]
fn arithmetic_and_date_functions() {
    let ctx = EvalContext::new();
    let result = evaluate("DATEADD(day, 5, DATE('2026-01-01'))", &ctx).unwrap();
    assert_eq!(
        result,
        Value::Date(chrono::NaiveDate::from_ymd_opt(2026, 1, 6).unwrap())
    );
}
