use crate::core::identifiers::AppId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the append-only `{schema}.processing_log` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingLogRecord {
    pub app_id: AppId,
    pub status: LogStatus,
    pub failure_reason: Option<String>,
    pub session_id: String,
    pub app_id_start: Option<i64>,
    pub app_id_end: Option<i64>,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    Success,
    Failed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Failed => "failed",
        }
    }
}

impl ProcessingLogRecord {
    pub fn success(app_id: AppId, session_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            app_id,
            status: LogStatus::Success,
            failure_reason: None,
            session_id: session_id.into(),
            app_id_start: None,
            app_id_end: None,
            processed_at: now,
        }
    }

    pub fn failed(
        app_id: AppId,
        reason: impl Into<String>,
        session_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            app_id,
            status: LogStatus::Failed,
            failure_reason: Some(reason.into()),
            session_id: session_id.into(),
            app_id_start: None,
            app_id_end: None,
            processed_at: now,
        }
    }
}
