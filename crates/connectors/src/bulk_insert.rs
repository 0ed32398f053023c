//! Fast-path/fallback bulk insert: one bound multi-row `INSERT` per table
//! when possible, falling back to per-row inserts (with duplicate
//! tolerance for designated tables) when the bulk call hits a
//! type-conversion-shaped error rather than a constraint violation.

use crate::{
    error::{classify, BulkInsertError, DatabaseConstraintError, ErrorCategory},
    value,
};
use model::records::row::RowData;
use std::collections::BTreeSet;
use tokio_postgres::GenericClient;
use tracing::{info, warn};

/// Tables where a primary-key violation during the per-row fallback is
/// tolerated (logged and skipped) rather than failing the batch — e.g. the
/// primary contact table when re-inserting after a crash mid-application.
#[derive(Debug, Clone, Default)]
pub struct BulkInsertOptions {
    pub enable_identity_insert: bool,
    pub tolerate_duplicate_key: bool,
}

/// The column union across `rows`, respecting the mapping engine's omission
/// semantics (a column absent from every row's `field_values` never appears
/// in the generated statement, so the destination's default/NULL applies).
fn column_union(rows: &[RowData]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for fv in &row.field_values {
            if seen.insert(fv.name.to_ascii_lowercase()) {
                columns.push(fv.name.clone());
            }
        }
    }
    columns
}

fn build_insert_sql(table: &str, columns: &[String], row_count: usize, identity_insert: bool) -> String {
    let column_list = columns.join(", ");
    let mut sql = format!("INSERT INTO {table} ({column_list})");
    if identity_insert {
        sql.push_str(" OVERRIDING SYSTEM VALUE");
    }
    sql.push_str(" VALUES ");

    let mut placeholder = 1usize;
    for row_idx in 0..row_count {
        if row_idx > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col_idx in 0..columns.len() {
            if col_idx > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&format!("${placeholder}"));
            placeholder += 1;
        }
        sql.push(')');
    }
    sql
}

fn row_values(row: &RowData, columns: &[String]) -> Vec<model::core::value::Value> {
    columns.iter().map(|c| row.get_value(c)).collect()
}

/// Runs the Bulk Insert Strategy end to end: fast path first, falling back
/// to per-row inserts on a non-constraint error. `enable_identity_insert`
/// maps to Postgres's per-statement `OVERRIDING SYSTEM VALUE`, which needs
/// no separate disable step — unlike a session-level toggle, it only
/// affects the statement it's attached to.
pub async fn insert<C: GenericClient + Sync>(
    client: &C,
    table: &str,
    rows: &[RowData],
    options: &BulkInsertOptions,
) -> Result<usize, BulkInsertError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let columns = column_union(rows);
    let sql = build_insert_sql(table, &columns, rows.len(), options.enable_identity_insert);
    let mut params = Vec::with_capacity(rows.len() * columns.len());
    for row in rows {
        params.extend(row_values(row, &columns));
    }

    let bound = value::bind(params);
    let refs = value::as_refs(&bound);

    match client.execute(&sql, &refs).await {
        Ok(affected) => {
            info!(table, rows = rows.len(), "bulk insert fast path succeeded");
            Ok(affected as usize)
        }
        Err(fast_path_err) => {
            let category = classify(&fast_path_err);
            if category != ErrorCategory::Other {
                return Err(to_bulk_insert_error(table, rows.len(), fast_path_err));
            }
            warn!(table, error = %fast_path_err, "bulk insert fast path failed, falling back to per-row insert");
            insert_row_by_row(client, table, &columns, rows, options).await
        }
    }
}

async fn insert_row_by_row<C: GenericClient + Sync>(
    client: &C,
    table: &str,
    columns: &[String],
    rows: &[RowData],
    options: &BulkInsertOptions,
) -> Result<usize, BulkInsertError> {
    let sql = build_insert_sql(table, columns, 1, options.enable_identity_insert);
    let mut inserted = 0;

    for row in rows {
        let params = row_values(row, columns);
        let bound = value::bind(params);
        let refs = value::as_refs(&bound);

        match client.execute(&sql, &refs).await {
            Ok(_) => inserted += 1,
            Err(e) => {
                let category = classify(&e);
                if category == ErrorCategory::PrimaryKeyViolation && options.tolerate_duplicate_key {
                    warn!(table, "duplicate key on fallback insert, skipping row");
                    continue;
                }
                return Err(to_bulk_insert_error(table, inserted, e));
            }
        }
    }

    Ok(inserted)
}

fn to_bulk_insert_error(table: &str, attempted: usize, source: tokio_postgres::Error) -> BulkInsertError {
    BulkInsertError {
        table: table.to_string(),
        attempted,
        source,
    }
}

/// Wraps a categorized constraint violation for callers (the Migration
/// Engine) that need to branch on `category` rather than just fail.
pub fn as_constraint_error(table: &str, error: tokio_postgres::Error) -> DatabaseConstraintError {
    DatabaseConstraintError {
        category: classify(&error),
        table: table.to_string(),
        source: error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::{data_type::DataType, value::{FieldValue, Value}};

    fn row(fields: &[(&str, Value)]) -> RowData {
        let mut r = RowData::new("t");
        for (name, value) in fields {
            r.set(*name, FieldValue::new(*name, value.clone(), DataType::VarChar));
        }
        r
    }

    #[test]
    fn column_union_covers_partial_rows_without_duplicates() {
        let rows = vec![
            row(&[("a", Value::Int(1)), ("b", Value::Int(2))]),
            row(&[("a", Value::Int(3))]),
        ];
        let columns = column_union(&rows);
        assert_eq!(columns, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn insert_sql_numbers_placeholders_across_rows() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let sql = build_insert_sql("t", &columns, 2, false);
        assert_eq!(sql, "INSERT INTO t (a, b) VALUES ($1, $2), ($3, $4)");
    }

    #[test]
    fn identity_insert_adds_overriding_clause() {
        let columns = vec!["id".to_string()];
        let sql = build_insert_sql("t", &columns, 1, true);
        assert!(sql.contains("OVERRIDING SYSTEM VALUE"));
    }
}
