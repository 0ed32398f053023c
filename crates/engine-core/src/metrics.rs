//! Per-run accumulator, read continuously by the coordinator and read once
//! at the end by the CLI to build the JSON run summary.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Debug, Default)]
struct InnerMetrics {
    applications_succeeded: AtomicU64,
    applications_failed: AtomicU64,
    rows_inserted: AtomicU64,
    rows_skipped_duplicate: AtomicU64,
    batches_processed: AtomicU64,
    retry_count: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub applications_succeeded: u64,
    pub applications_failed: u64,
    pub rows_inserted: u64,
    pub rows_skipped_duplicate: u64,
    pub batches_processed: u64,
    pub retry_count: u64,
}

impl MetricsSnapshot {
    pub fn applications_total(&self) -> u64 {
        self.applications_succeeded + self.applications_failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.applications_total();
        if total == 0 {
            return 1.0;
        }
        self.applications_succeeded as f64 / total as f64
    }
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn record_success(&self, rows_inserted: u64) {
        self.inner
            .applications_succeeded
            .fetch_add(1, Ordering::Relaxed);
        self.inner
            .rows_inserted
            .fetch_add(rows_inserted, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.inner.applications_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_duplicates(&self, count: u64) {
        self.inner
            .rows_skipped_duplicate
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_batches(&self) {
        self.inner.batches_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retries(&self, count: u64) {
        self.inner.retry_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            applications_succeeded: self.inner.applications_succeeded.load(Ordering::Relaxed),
            applications_failed: self.inner.applications_failed.load(Ordering::Relaxed),
            rows_inserted: self.inner.rows_inserted.load(Ordering::Relaxed),
            rows_skipped_duplicate: self.inner.rows_skipped_duplicate.load(Ordering::Relaxed),
            batches_processed: self.inner.batches_processed.load(Ordering::Relaxed),
            retry_count: self.inner.retry_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_is_one_with_no_applications() {
        let snap = MetricsSnapshot::default();
        assert_eq!(snap.success_rate(), 1.0);
    }

    #[test]
    fn snapshot_reflects_recorded_outcomes() {
        let metrics = Metrics::new();
        metrics.record_success(10);
        metrics.record_success(5);
        metrics.record_failure();
        metrics.record_skipped_duplicates(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.applications_total(), 3);
        assert_eq!(snap.rows_inserted, 15);
        assert_eq!(snap.rows_skipped_duplicate, 3);
        assert!((snap.success_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}
