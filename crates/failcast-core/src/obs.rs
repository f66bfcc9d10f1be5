//! Structured observability hooks for the prediction pipeline.
//!
//! Each helper emits one named event (`event = "..."`) so log pipelines can
//! filter on lifecycle stages. Verbosity follows `RUST_LOG`; use `--json` on
//! the CLI for newline-delimited JSON.

use std::path::Path;

use tracing::{info, warn};

use crate::lifecycle::TrainingReport;

/// Emit event: history table loaded.
pub fn emit_history_loaded(path: &Path, records: usize, failures: usize) {
    info!(
        event = "history.loaded",
        path = %path.display(),
        records = records,
        failures = failures,
    );
}

/// Emit event: persisted model loaded instead of training.
pub fn emit_model_loaded(path: &Path, trees: usize) {
    info!(event = "model.loaded", path = %path.display(), trees = trees);
}

/// Emit event: model trained, with held-out accuracy when available.
pub fn emit_model_trained(report: &TrainingReport) {
    match &report.holdout {
        Some(m) => info!(
            event = "model.trained",
            train_size = report.train_size,
            test_size = report.test_size,
            accuracy = m.accuracy,
            precision = m.precision,
            recall = m.recall,
            "Model accuracy: {:.2}",
            m.accuracy
        ),
        None => info!(
            event = "model.trained",
            train_size = report.train_size,
            test_size = report.test_size,
            "Model trained without a held-out partition"
        ),
    }
}

/// Emit event: no model, not enough history (warning level).
pub fn emit_model_absent(available: usize, required: usize) {
    warn!(
        event = "model.absent",
        available = available,
        required = required,
        "Not enough historical data to train a reliable model"
    );
}

/// Emit event: artifact written.
pub fn emit_model_persisted(path: &Path, digest: &str, bytes: usize) {
    info!(
        event = "model.persisted",
        path = %path.display(),
        digest = %digest,
        bytes = bytes,
    );
}

/// Emit event: batch scored.
pub fn emit_predict_completed(scored: usize, surfaced: usize, threshold: f64) {
    info!(
        event = "predict.completed",
        scored = scored,
        surfaced = surfaced,
        threshold = threshold,
    );
}
