//! The per-run JSON metrics document the CLI writes out after `run()`
//! returns — not part of the core, but the shape the driver reports in.

use engine_core::MetricsSnapshot;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub applications_succeeded: u64,
    pub applications_failed: u64,
    pub rows_inserted: u64,
    pub rows_skipped_duplicate: u64,
    pub batches_processed: u64,
    pub success_rate: f64,
    pub table_row_counts: HashMap<String, u64>,
    pub duration_secs: f64,
    pub throughput_per_minute: f64,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn build(
        snapshot: MetricsSnapshot,
        table_row_counts: HashMap<String, u64>,
        duration: Duration,
        cancelled: bool,
    ) -> Self {
        let duration_secs = duration.as_secs_f64();
        let throughput_per_minute = if duration_secs > 0.0 {
            (snapshot.applications_total() as f64) * 60.0 / duration_secs
        } else {
            0.0
        };

        Self {
            applications_succeeded: snapshot.applications_succeeded,
            applications_failed: snapshot.applications_failed,
            rows_inserted: snapshot.rows_inserted,
            rows_skipped_duplicate: snapshot.rows_skipped_duplicate,
            batches_processed: snapshot.batches_processed,
            success_rate: snapshot.success_rate(),
            table_row_counts,
            duration_secs,
            throughput_per_minute,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_is_zero_for_zero_duration() {
        let summary = RunSummary::build(
            MetricsSnapshot::default(),
            HashMap::new(),
            Duration::from_secs(0),
            false,
        );
        assert_eq!(summary.throughput_per_minute, 0.0);
    }

    #[test]
    fn throughput_scales_to_per_minute() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.applications_succeeded = 30;
        let summary = RunSummary::build(snapshot, HashMap::new(), Duration::from_secs(30), false);
        assert!((summary.throughput_per_minute - 60.0).abs() < 1e-9);
    }
}
