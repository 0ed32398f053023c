//! Reads `(app_id, xml)` pairs from the staging table. The cursor, partition,
//! and exclude-failed filtering live here as plain SQL generation; the
//! `runtime` crate's Processor owns deciding *which* `StagingQuery` to issue
//! on each loop iteration.

use crate::{error::DbError, value};
use model::core::identifiers::AppId;
use tokio_postgres::Client;

/// One `get_work` call's parameters, mirroring the staging-read semantics:
/// cursor-based paging, optional modulo partitioning, and an
/// already-processed exclusion that's either "exclude success only" or
/// "exclude success and failed" depending on `exclude_failed`.
#[derive(Debug, Clone)]
pub struct StagingQuery {
    pub cursor_app_id: i64,
    pub limit: i64,
    pub partition_mod: u32,
    pub partition_rem: u32,
    pub exclude_failed: bool,
    pub range_start: Option<i64>,
    pub range_end: Option<i64>,
}

impl StagingQuery {
    pub fn new(cursor_app_id: i64, limit: i64) -> Self {
        Self {
            cursor_app_id,
            limit,
            partition_mod: 1,
            partition_rem: 0,
            exclude_failed: false,
            range_start: None,
            range_end: None,
        }
    }
}

/// Builds the `get_work` SQL and its bound parameters. Never uses `OFFSET` —
/// paging is entirely by `app_id > cursor_app_id`, per the cursor-based
/// paging requirement.
fn build_get_work_sql(query: &StagingQuery) -> (String, Vec<model::core::value::Value>) {
    use model::core::value::Value;

    let mut sql = String::from(
        "SELECT app_id, xml FROM app_xml \
         WHERE app_id > $1 AND xml IS NOT NULL AND octet_length(xml) > 100",
    );
    let mut params = vec![Value::Int(query.cursor_app_id)];

    if query.partition_mod > 1 {
        params.push(Value::Int(query.partition_mod as i64));
        sql.push_str(&format!(" AND app_id % ${} = ", params.len()));
        params.push(Value::Int(query.partition_rem as i64));
        sql.push_str(&format!("${}", params.len()));
    }

    let excluded_statuses = if query.exclude_failed {
        "('success', 'failed')"
    } else {
        "('success')"
    };
    sql.push_str(&format!(
        " AND NOT EXISTS (SELECT 1 FROM processing_log pl \
           WHERE pl.app_id = app_xml.app_id AND pl.status IN {excluded_statuses})"
    ));

    if let Some(start) = query.range_start {
        params.push(Value::Int(start));
        sql.push_str(&format!(" AND app_id >= ${}", params.len()));
    }
    if let Some(end) = query.range_end {
        params.push(Value::Int(end));
        sql.push_str(&format!(" AND app_id <= ${}", params.len()));
    }

    sql.push_str(" ORDER BY app_id ASC FETCH FIRST ");
    sql.push_str(&query.limit.to_string());
    sql.push_str(" ROWS ONLY");

    (sql, params)
}

/// Executes a `get_work` read, returning validated application identifiers
/// paired with their raw XML. Rows whose `app_id` fails [`AppId`] validation
/// are dropped with a warning rather than failing the whole batch — that
/// judgment belongs to the Pre-Processing Validator downstream, but an
/// out-of-range id here indicates corrupt staging data, not a normal
/// rejection case.
pub async fn get_work(
    client: &Client,
    query: &StagingQuery,
) -> Result<Vec<(AppId, String)>, DbError> {
    let (sql, params) = build_get_work_sql(query);
    let bound = value::bind(params);
    let refs = value::as_refs(&bound);

    let rows = client.query(&sql, &refs).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_id: i64 = row.try_get("app_id").map_err(DbError::Driver)?;
        let xml: String = row.try_get("xml").map_err(DbError::Driver)?;
        if let Ok(app_id) = AppId::new(raw_id) {
            out.push((app_id, xml));
        } else {
            tracing::warn!(app_id = raw_id, "staging row has an out-of-range app_id");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpartitioned_query_has_no_modulo_clause() {
        let query = StagingQuery::new(100, 500);
        let (sql, params) = build_get_work_sql(&query);
        assert!(!sql.contains('%'));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn partitioned_query_binds_mod_and_rem() {
        let mut query = StagingQuery::new(100, 500);
        query.partition_mod = 4;
        query.partition_rem = 2;
        let (sql, params) = build_get_work_sql(&query);
        assert!(sql.contains("app_id %"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn exclude_failed_widens_the_status_set() {
        let mut query = StagingQuery::new(100, 500);
        query.exclude_failed = true;
        let (sql, _) = build_get_work_sql(&query);
        assert!(sql.contains("'success', 'failed'"));
    }

    #[test]
    fn range_bounds_append_extra_predicates() {
        let mut query = StagingQuery::new(100, 500);
        query.range_start = Some(1000);
        query.range_end = Some(2000);
        let (sql, params) = build_get_work_sql(&query);
        assert!(sql.contains(">= $2"));
        assert!(sql.contains("<= $3"));
        assert_eq!(params.len(), 3);
    }
}
