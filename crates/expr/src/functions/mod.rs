pub mod string;

use crate::error::{ExpressionError, Result};
use chrono::{NaiveDate, Utc};
use model::core::value::Value;

/// The supported function set: `DATE`, `DATEADD`, `GETUTCDATE`. Stateless and
/// side-effect free (no clock call for `DATE`, the only source of wall-clock
/// time is `GETUTCDATE`).
pub struct FunctionRegistry;

impl FunctionRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match name.to_ascii_uppercase().as_str() {
            "DATE" => {
                let [arg] = args else {
                    return Err(ExpressionError::Arity {
                        name: "DATE".into(),
                        expected: "1",
                        got: args.len(),
                    });
                };
                let raw = arg.as_string().unwrap_or_default();
                match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                    Ok(date) => Ok(Value::Date(date)),
                    Err(_) => Ok(Value::Null),
                }
            }
            "DATEADD" => {
                let [unit, amount, date] = args else {
                    return Err(ExpressionError::Arity {
                        name: "DATEADD".into(),
                        expected: "3",
                        got: args.len(),
                    });
                };
                let unit = unit.as_string().unwrap_or_default().to_ascii_lowercase();
                let amount = amount.as_i64().unwrap_or(0);
                let base = match date {
                    Value::Date(d) => *d,
                    other => {
                        let raw = other.as_string().unwrap_or_default();
                        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                            Ok(d) => d,
                            Err(_) => return Ok(Value::Null),
                        }
                    }
                };
                let days = match unit.as_str() {
                    "day" | "days" | "d" => amount,
                    "week" | "weeks" | "wk" => amount * 7,
                    "month" | "months" | "mm" => {
                        return Ok(add_months(base, amount)
                            .map(Value::Date)
                            .unwrap_or(Value::Null));
                    }
                    "year" | "years" | "yyyy" => {
                        return Ok(add_months(base, amount * 12)
                            .map(Value::Date)
                            .unwrap_or(Value::Null));
                    }
                    _ => return Ok(Value::Null),
                };
                Ok(base
                    .checked_add_signed(chrono::Duration::days(days))
                    .map(Value::Date)
                    .unwrap_or(Value::Null))
            }
            "GETUTCDATE" => Ok(Value::Timestamp(Utc::now())),
            other => Err(ExpressionError::UnknownFunction(other.to_string())),
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let total_months = date.month0() as i64 + months;
    let year = date.year() + (total_months.div_euclid(12)) as i32;
    let month0 = total_months.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .and_then(|first_of_month| {
            let last_day = last_day_of_month(year, month0 + 1);
            first_of_month.with_day(date.day().min(last_day))
        })
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month_first
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

use chrono::Datelike;
