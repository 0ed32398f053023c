//! Converts the mapping engine's [`model::core::value::Value`] into bound
//! parameters `tokio_postgres` can send over the wire, and the reverse
//! conversion for rows read back by the duplicate detector.

use model::core::value::Value;
use rust_decimal::Decimal as RustDecimal;
use std::str::FromStr;
use tokio_postgres::types::{Json as PgJson, ToSql};

/// One bound parameter, boxed so a `Vec` of mixed-typed values can be handed
/// to `tokio_postgres` as `&[&(dyn ToSql + Sync)]`.
pub struct SqlParam(Box<dyn ToSql + Sync>);

impl SqlParam {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Int(v) => SqlParam(Box::new(v)),
            Value::Float(v) => SqlParam(Box::new(v)),
            Value::Decimal(v) => {
                let decimal =
                    RustDecimal::from_str(&v.to_string()).unwrap_or(RustDecimal::ZERO);
                SqlParam(Box::new(decimal))
            }
            Value::String(v) => SqlParam(Box::new(v)),
            Value::Boolean(v) => SqlParam(Box::new(v)),
            Value::Json(v) => SqlParam(Box::new(PgJson(v))),
            Value::Date(v) => SqlParam(Box::new(v)),
            Value::Timestamp(v) => SqlParam(Box::new(v)),
            Value::Null => SqlParam(Box::new(Option::<String>::None)),
        }
    }

    pub fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0
    }
}

/// Builds a `&[&(dyn ToSql + Sync)]` slice of references from owned params,
/// the shape every `tokio_postgres` bind call expects.
pub fn as_refs(params: &[SqlParam]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(SqlParam::as_to_sql).collect()
}

pub fn bind(values: Vec<Value>) -> Vec<SqlParam> {
    values.into_iter().map(SqlParam::from_value).collect()
}

/// Reads one column back out of a `tokio_postgres::Row` into a [`Value`],
/// trying types in the order the destination schema is expected to use them.
pub fn column_value(row: &tokio_postgres::Row, index: usize) -> Value {
    if let Ok(v) = row.try_get::<_, Option<i64>>(index) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<f64>>(index) {
        return v.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<bool>>(index) {
        return v.map(Value::Boolean).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<chrono::NaiveDate>>(index) {
        return v.map(Value::Date).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(index) {
        return v.map(Value::Timestamp).unwrap_or(Value::Null);
    }
    row.try_get::<_, Option<String>>(index)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_converts_without_panicking() {
        let value = Value::Decimal(bigdecimal::BigDecimal::from_str("12.50").unwrap());
        let _param = SqlParam::from_value(value);
    }

    #[test]
    fn binds_preserve_order() {
        let values = vec![Value::Int(1), Value::String("a".to_string())];
        let bound = bind(values);
        assert_eq!(bound.len(), 2);
        let refs = as_refs(&bound);
        assert_eq!(refs.len(), 2);
    }
}
