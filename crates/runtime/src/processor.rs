//! Processor (top-level driver): drives the pipeline end-to-end from the
//! staging table, feeding batches to the [`Coordinator`] and recording each
//! outcome in the processing log.

use crate::{
    coordinator::Coordinator,
    error::RunError,
    messages::{WorkResult, WorkStatus},
    summary::RunSummary,
};
use chrono::Utc;
use connectors::{Destination, StagingQuery};
use engine_core::{Checkpoint, Metrics, Stage};
use model::{contract::Contract, log::ProcessingLogRecord};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_BATCH_SIZE: i64 = 500;
const DEFAULT_WORKER_COUNT: usize = 4;

/// Everything needed to drive one run, mirroring the CLI flags in shape.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub session_id: String,
    pub batch_size: i64,
    pub worker_count: usize,
    pub limit: Option<u64>,
    pub app_id_start: Option<i64>,
    pub app_id_end: Option<i64>,
    pub partition_mod: u32,
    pub partition_rem: u32,
    /// `true` (the default) skips previously-failed applications like
    /// already-succeeded ones; `false` re-fetches and retries them.
    pub exclude_failed: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            session_id: "default-session".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            limit: None,
            app_id_start: None,
            app_id_end: None,
            partition_mod: 1,
            partition_rem: 0,
            exclude_failed: true,
        }
    }
}

pub struct Processor {
    conn_str: String,
    contract: Arc<Contract>,
    config: ProcessorConfig,
    state_store: Option<Arc<dyn engine_core::StateStore>>,
    metrics: Metrics,
    cancel_token: CancellationToken,
}

impl Processor {
    pub fn new(
        conn_str: impl Into<String>,
        contract: Arc<Contract>,
        config: ProcessorConfig,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            conn_str: conn_str.into(),
            contract,
            config,
            state_store: None,
            metrics: Metrics::new(),
            cancel_token,
        }
    }

    pub fn with_state_store(mut self, store: Arc<dyn engine_core::StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    async fn starting_cursor(&self) -> i64 {
        if let Some(store) = &self.state_store {
            if let Ok(Some(cp)) = store
                .load_checkpoint(&self.config.session_id, self.config.partition_rem)
                .await
            {
                if cp.stage == Stage::Committed {
                    return cp.last_app_id;
                }
            }
        }
        self.config.app_id_start.map(|s| s - 1).unwrap_or(0)
    }

    async fn save_progress(&self, last_app_id: i64) {
        let Some(store) = &self.state_store else { return };
        let cp = Checkpoint {
            session_id: self.config.session_id.clone(),
            partition_rem: self.config.partition_rem,
            stage: Stage::Committed,
            last_app_id,
            updated_at: Utc::now(),
        };
        if let Err(e) = store.save_checkpoint(&cp).await {
            tracing::warn!(error = %e, "failed to persist local resumption checkpoint");
        }
    }

    /// Drives the full run: fetch batch, distribute, log outcomes, advance
    /// the cursor, repeat until a fetch returns empty, the overall `limit`
    /// is reached, or cancellation drains the in-flight batch.
    pub async fn run(mut self) -> Result<RunSummary, RunError> {
        let started = Instant::now();
        let log_destination = Destination::connect(&self.conn_str).await?;

        let mut coordinator = Coordinator::connect(
            &self.conn_str,
            self.config.worker_count,
            self.contract.clone(),
            self.cancel_token.clone(),
        )
        .await?;

        let mut cursor = self.starting_cursor().await;
        let mut processed: u64 = 0;
        let mut table_row_counts: HashMap<String, u64> = HashMap::new();
        let mut cancelled = false;

        loop {
            if self.cancel_token.is_cancelled() {
                cancelled = true;
                break;
            }
            if let Some(limit) = self.config.limit {
                if processed >= limit {
                    break;
                }
            }

            let mut batch_limit = self.config.batch_size;
            if let Some(limit) = self.config.limit {
                batch_limit = batch_limit.min((limit - processed) as i64);
            }

            let query = StagingQuery {
                cursor_app_id: cursor,
                limit: batch_limit,
                partition_mod: self.config.partition_mod,
                partition_rem: self.config.partition_rem,
                exclude_failed: self.config.exclude_failed,
                range_start: self.config.app_id_start,
                range_end: self.config.app_id_end,
            };

            let items = connectors::get_work(log_destination.client(), &query).await?;
            if items.is_empty() {
                break;
            }

            let results = coordinator.run_batch(items).await?;
            processed += results.len() as u64;
            self.metrics.increment_batches();

            for result in &results {
                cursor = cursor.max(result.app_id.get());
                record_result(
                    &log_destination,
                    &self.config.session_id,
                    result,
                    &self.metrics,
                    &mut table_row_counts,
                )
                .await?;
            }

            self.save_progress(cursor).await;

            if coordinator.is_cancelled() {
                cancelled = true;
                break;
            }
        }

        coordinator.shutdown().await;
        info!(processed, cancelled, "run loop finished");

        Ok(RunSummary::build(
            self.metrics.snapshot(),
            table_row_counts,
            started.elapsed(),
            cancelled,
        ))
    }
}

async fn record_result(
    destination: &Destination,
    session_id: &str,
    result: &WorkResult,
    metrics: &Metrics,
    table_row_counts: &mut HashMap<String, u64>,
) -> Result<(), RunError> {
    let now = Utc::now();
    let record = match &result.status {
        WorkStatus::Success {
            inserted_per_table,
            skipped_duplicate,
        } => {
            for (table, count) in inserted_per_table {
                *table_row_counts.entry(table.clone()).or_insert(0) += *count as u64;
            }
            metrics.record_success(result.total_inserted() as u64);
            metrics.record_skipped_duplicates(*skipped_duplicate as u64);
            ProcessingLogRecord::success(result.app_id, session_id, now)
        }
        WorkStatus::Failed { reason } => {
            metrics.record_failure();
            ProcessingLogRecord::failed(result.app_id, reason.clone(), session_id, now)
        }
    };

    connectors::write_log(destination.client(), &record)
        .await
        .map_err(RunError::LogWrite)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.worker_count, 4);
        assert!(config.limit.is_none());
    }

    #[test]
    fn starting_cursor_offsets_app_id_start_by_one() {
        let config = ProcessorConfig {
            app_id_start: Some(1000),
            ..ProcessorConfig::default()
        };
        assert_eq!(config.app_id_start.map(|s| s - 1).unwrap_or(0), 999);
    }
}
