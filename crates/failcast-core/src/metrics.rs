//! Global atomic counters for pipeline observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a run).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations, no locking.
pub struct Metrics {
    records_scored: AtomicU64,
    predictions_surfaced: AtomicU64,
    models_trained: AtomicU64,
    models_loaded: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            records_scored: AtomicU64::new(0),
            predictions_surfaced: AtomicU64::new(0),
            models_trained: AtomicU64::new(0),
            models_loaded: AtomicU64::new(0),
        }
    }

    /// Add `n` to the records-scored counter.
    pub fn add_records_scored(&self, n: u64) {
        self.records_scored.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "records_scored", n, "counter incremented");
    }

    /// Add `n` to the predictions-surfaced counter.
    pub fn add_predictions_surfaced(&self, n: u64) {
        self.predictions_surfaced.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "predictions_surfaced", n, "counter incremented");
    }

    pub fn inc_models_trained(&self) {
        self.models_trained.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "models_trained", "counter incremented");
    }

    pub fn inc_models_loaded(&self) {
        self.models_loaded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "models_loaded", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            records_scored = self.records_scored(),
            predictions_surfaced = self.predictions_surfaced(),
            models_trained = self.models_trained(),
            models_loaded = self.models_loaded(),
        );
    }

    pub fn records_scored(&self) -> u64 {
        self.records_scored.load(Ordering::Relaxed)
    }

    pub fn predictions_surfaced(&self) -> u64 {
        self.predictions_surfaced.load(Ordering::Relaxed)
    }

    pub fn models_trained(&self) -> u64 {
        self.models_trained.load(Ordering::Relaxed)
    }

    pub fn models_loaded(&self) -> u64 {
        self.models_loaded.load(Ordering::Relaxed)
    }
}
