//! Pre-filters rows against the destination before insert, without taking
//! locks. Supports both single-column keys (the primary contact table) and
//! composite keys (`(con_id, address_type_enum)` on contact-address,
//! `(con_id, employment_type_enum)` on contact-employment).

use crate::{error::DbError, value};
use model::{core::value::Value, records::row::RowData};
use std::collections::HashSet;
use tokio_postgres::GenericClient;

/// The outcome of filtering one table's candidate rows against the
/// destination: the rows that still need inserting, plus how many were
/// skipped because their key already exists.
pub struct FilterResult {
    pub rows: Vec<RowData>,
    pub skipped: usize,
}

/// Builds the non-locking existence-check SQL and its bound parameters: one
/// `(col = $n AND col = $n ...)` group per candidate key, OR'd together, so
/// a single round trip covers the whole batch.
fn build_existence_sql(
    table: &str,
    key_columns: &[String],
    keys: &[Vec<Value>],
) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT {} FROM {table} WHERE ", key_columns.join(", "));
    let mut params = Vec::with_capacity(keys.len() * key_columns.len());

    for (row_idx, key) in keys.iter().enumerate() {
        if row_idx > 0 {
            sql.push_str(" OR ");
        }
        sql.push('(');
        for (col_idx, col) in key_columns.iter().enumerate() {
            if col_idx > 0 {
                sql.push_str(" AND ");
            }
            params.push(key[col_idx].clone());
            sql.push_str(&format!("{col} = ${}", params.len()));
        }
        sql.push(')');
    }

    (sql, params)
}

/// Projects one row's declared key columns into an ordered `Vec<Value>`,
/// the shape both the SQL builder and the existing-keys set compare against.
fn project_key(row: &RowData, key_columns: &[String]) -> Vec<Value> {
    key_columns.iter().map(|col| row.get_value(col)).collect()
}

/// Reads the key columns already present in `table` for the given batch of
/// candidate rows. Issues a plain `SELECT`, which under Postgres's default
/// read-committed isolation takes no locks that would block concurrent
/// writers — the non-locking read the detector requires.
async fn fetch_existing_keys<C: GenericClient + Sync>(
    client: &C,
    table: &str,
    key_columns: &[String],
    keys: &[Vec<Value>],
) -> Result<HashSet<Vec<String>>, DbError> {
    if keys.is_empty() {
        return Ok(HashSet::new());
    }

    let width = key_columns.len();
    let (sql, params) = build_existence_sql(table, key_columns, keys);
    let bound = value::bind(params);
    let refs = value::as_refs(&bound);
    let rows = client.query(&sql, &refs).await?;

    Ok(rows
        .iter()
        .map(|row| {
            (0..width)
                .map(|i| value::column_value(row, i).to_string())
                .collect::<Vec<_>>()
        })
        .collect())
}

/// Filters `rows` down to those whose key does not already exist in `table`.
/// Never mutates the destination.
pub async fn filter_new_rows<C: GenericClient + Sync>(
    client: &C,
    table: &str,
    key_columns: &[String],
    rows: Vec<RowData>,
) -> Result<FilterResult, DbError> {
    if key_columns.is_empty() || rows.is_empty() {
        return Ok(FilterResult { rows, skipped: 0 });
    }

    let keys: Vec<Vec<Value>> = rows.iter().map(|row| project_key(row, key_columns)).collect();

    let existing = fetch_existing_keys(client, table, key_columns, &keys).await?;

    let mut survivors = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for (row, key) in rows.into_iter().zip(keys.into_iter()) {
        let key_repr: Vec<String> = key.iter().map(|v| v.to_string()).collect();
        if existing.contains(&key_repr) {
            skipped += 1;
        } else {
            survivors.push(row);
        }
    }

    Ok(FilterResult {
        rows: survivors,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::{data_type::DataType, value::FieldValue};

    fn row(con_id: i64) -> RowData {
        let mut r = RowData::new("contacts");
        r.set(
            "con_id",
            FieldValue::new("con_id", Value::Int(con_id), DataType::Int),
        );
        r
    }

    #[test]
    fn single_column_key_projects_one_value() {
        let key = project_key(&row(42), &["con_id".to_string()]);
        assert_eq!(key, vec![Value::Int(42)]);
    }

    #[test]
    fn composite_key_existence_sql_ors_each_candidate() {
        let keys = vec![
            vec![Value::Int(1), Value::String("home".to_string())],
            vec![Value::Int(2), Value::String("work".to_string())],
        ];
        let columns = vec!["con_id".to_string(), "address_type_enum".to_string()];
        let (sql, params) = build_existence_sql("contact_address", &columns, &keys);
        assert_eq!(params.len(), 4);
        assert!(sql.contains(" OR "));
        assert!(sql.contains("con_id = $1 AND address_type_enum = $2"));
        assert!(sql.contains("con_id = $3 AND address_type_enum = $4"));
    }
}
