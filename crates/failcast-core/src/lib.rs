//! failcast core library
//!
//! Predicts which tests are likely to fail for a proposed set of changes,
//! from a table of past test outcomes. The pipeline is:
//!
//! 1. [`HistoryStore::load`] the historical table (missing file → empty table)
//! 2. [`ModelLifecycleManager::obtain`] a classifier: load, train, or none
//! 3. [`load_changes`] the candidate batch
//! 4. [`PredictionEngine::predict`] the tests at or above the threshold,
//!    each with rule-based recommendations

pub mod artifact;
pub mod changes;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod history;
pub mod lifecycle;
pub mod metrics;
pub mod obs;
pub mod predict;
pub mod recommend;
pub mod reporting;
pub mod telemetry;

pub use artifact::ModelArtifact;
pub use changes::{load_changes, parse_changes};
pub use classifier::{Classifier, DecisionTree, EvaluationMetrics, RandomForest};
pub use config::{ForestParams, PredictorConfig};
pub use domain::{ChangeRecord, HistoricalRecord, PredictionResult};
pub use error::{FailcastError, RecordSource, Result};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use history::{HistoryStore, HistoryTable};
pub use lifecycle::{ModelLifecycleManager, ModelOutcome, TrainingReport};
pub use metrics::METRICS;
pub use predict::PredictionEngine;
pub use recommend::recommend;
pub use reporting::{render_predictions_json, write_predictions};
pub use telemetry::init_tracing;

/// failcast version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
