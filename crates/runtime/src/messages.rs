use model::core::identifiers::AppId;
use std::collections::HashMap;

/// The one message a worker actor understands: process one application.
#[derive(Debug)]
pub enum WorkerMsg {
    Process { app_id: AppId, xml: String },
}

/// What a worker reports back to the coordinator after a `Process` message,
/// regardless of whether it succeeded: `{app_id, status, inserted_per_table,
/// reason?}`.
#[derive(Debug, Clone)]
pub struct WorkResult {
    pub app_id: AppId,
    pub status: WorkStatus,
}

#[derive(Debug, Clone)]
pub enum WorkStatus {
    Success {
        inserted_per_table: HashMap<String, usize>,
        skipped_duplicate: usize,
    },
    Failed {
        reason: String,
    },
}

impl WorkResult {
    pub fn success(app_id: AppId, counts: &engine_core::TableCounts) -> Self {
        Self {
            app_id,
            status: WorkStatus::Success {
                inserted_per_table: counts.inserted.clone(),
                skipped_duplicate: counts.total_skipped(),
            },
        }
    }

    pub fn failed(app_id: AppId, reason: impl Into<String>) -> Self {
        Self {
            app_id,
            status: WorkStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn total_inserted(&self) -> usize {
        match &self.status {
            WorkStatus::Success { inserted_per_table, .. } => inserted_per_table.values().sum(),
            WorkStatus::Failed { .. } => 0,
        }
    }
}
