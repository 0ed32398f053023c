//! Appends rows to the destination's `processing_log` table — the single
//! source of truth resumption reads against via `staging::get_work`'s
//! `NOT EXISTS` clause.

use crate::{error::DbError, value};
use model::log::{LogStatus, ProcessingLogRecord};
use tokio_postgres::Client;

/// Writes one outcome row. Concurrent instances writing for the same
/// `app_id` race by design — the table's primary key on `app_id` decides
/// the winner, and a unique-violation here is "someone else won," not a
/// failure worth propagating.
pub async fn write_log(client: &Client, record: &ProcessingLogRecord) -> Result<(), DbError> {
    let sql = "INSERT INTO processing_log \
        (app_id, status, failure_reason, session_id, app_id_start, app_id_end, processed_at) \
        VALUES ($1, $2, $3, $4, $5, $6, $7) \
        ON CONFLICT (app_id) DO NOTHING";

    let status = record.status.as_str();
    let params = value::bind(vec![
        model::core::value::Value::Int(record.app_id.get()),
        model::core::value::Value::String(status.to_string()),
        record
            .failure_reason
            .clone()
            .map(model::core::value::Value::String)
            .unwrap_or(model::core::value::Value::Null),
        model::core::value::Value::String(record.session_id.clone()),
        record
            .app_id_start
            .map(model::core::value::Value::Int)
            .unwrap_or(model::core::value::Value::Null),
        record
            .app_id_end
            .map(model::core::value::Value::Int)
            .unwrap_or(model::core::value::Value::Null),
        model::core::value::Value::Timestamp(record.processed_at),
    ]);
    let refs = value::as_refs(&params);

    client.execute(sql, &refs).await?;
    Ok(())
}

/// Whether `status` represents a terminal success, used by callers deciding
/// whether to advance an in-memory "last successful app_id" counter.
pub fn is_success(status: LogStatus) -> bool {
    matches!(status, LogStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_is_success() {
        assert!(is_success(LogStatus::Success));
        assert!(!is_success(LogStatus::Failed));
    }
}
