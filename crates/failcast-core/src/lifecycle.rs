//! Model lifecycle: load a persisted model or train a fresh one.
//!
//! [`ModelLifecycleManager::obtain`] resolves to exactly one of three
//! outcomes, checked in order:
//!
//! 1. an artifact path was given and a file exists there → [`ModelOutcome::Loaded`]
//! 2. the history has fewer than `min_training_records` rows → [`ModelOutcome::Absent`]
//! 3. otherwise → [`ModelOutcome::Trained`], persisted if a path was given
//!
//! A loaded model is never checked against the history, and a corrupt
//! artifact is an error rather than a reason to retrain.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::artifact::ModelArtifact;
use crate::classifier::{Classifier, EvaluationMetrics, RandomForest};
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::features::{training_matrix, FeatureVector};
use crate::history::HistoryTable;
use crate::metrics::METRICS;
use crate::obs;

/// Summary of a training pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_size: usize,
    pub test_size: usize,

    /// Held-out metrics. Informational only; never used to reject a model.
    pub holdout: Option<EvaluationMetrics>,

    /// SHA-256 of the persisted artifact, when one was written.
    pub artifact_digest: Option<String>,
}

/// Which path [`ModelLifecycleManager::obtain`] took.
#[derive(Debug, Clone)]
pub enum ModelOutcome {
    Loaded {
        model: RandomForest,
        path: PathBuf,
    },
    Trained {
        model: RandomForest,
        report: TrainingReport,
    },
    Absent {
        available: usize,
        required: usize,
    },
}

impl ModelOutcome {
    pub fn classifier(&self) -> Option<&RandomForest> {
        match self {
            ModelOutcome::Loaded { model, .. } | ModelOutcome::Trained { model, .. } => Some(model),
            ModelOutcome::Absent { .. } => None,
        }
    }

    pub fn into_classifier(self) -> Option<RandomForest> {
        match self {
            ModelOutcome::Loaded { model, .. } | ModelOutcome::Trained { model, .. } => Some(model),
            ModelOutcome::Absent { .. } => None,
        }
    }

    /// Short label for logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelOutcome::Loaded { .. } => "loaded",
            ModelOutcome::Trained { .. } => "trained",
            ModelOutcome::Absent { .. } => "absent",
        }
    }
}

/// Owns the load-or-train decision and the persisted artifact.
pub struct ModelLifecycleManager {
    config: PredictorConfig,
}

impl ModelLifecycleManager {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Resolve a classifier for this run.
    pub fn obtain(&self, history: &HistoryTable, artifact_path: Option<&Path>) -> Result<ModelOutcome> {
        if let Some(path) = artifact_path.filter(|p| p.exists()) {
            let artifact = ModelArtifact::load(path)?;
            obs::emit_model_loaded(path, artifact.model.trees().len());
            METRICS.inc_models_loaded();
            return Ok(ModelOutcome::Loaded {
                model: artifact.model,
                path: path.to_path_buf(),
            });
        }

        let required = self.config.min_training_records;
        if history.len() < required {
            obs::emit_model_absent(history.len(), required);
            return Ok(ModelOutcome::Absent {
                available: history.len(),
                required,
            });
        }

        let (model, mut report) = self.train(history)?;
        if let Some(path) = artifact_path {
            let digest = ModelArtifact::new(model.clone()).persist(path)?;
            report.artifact_digest = Some(digest);
        }
        Ok(ModelOutcome::Trained { model, report })
    }

    /// Fit a fresh forest on a shuffled split of `history`.
    pub fn train(&self, history: &HistoryTable) -> Result<(RandomForest, TrainingReport)> {
        let (x, y) = training_matrix(history.records());
        let (train_idx, test_idx) = self.split_indices(x.len());

        let train_x: Vec<FeatureVector> = train_idx.iter().map(|&i| x[i]).collect();
        let train_y: Vec<bool> = train_idx.iter().map(|&i| y[i]).collect();

        let mut model = RandomForest::new(self.config.forest.clone());
        model.fit(&train_x, &train_y)?;

        let holdout = (!test_idx.is_empty()).then(|| {
            let predicted: Vec<bool> = test_idx.iter().map(|&i| model.predict_class(&x[i])).collect();
            let actual: Vec<bool> = test_idx.iter().map(|&i| y[i]).collect();
            EvaluationMetrics::compute(&predicted, &actual)
        });

        let report = TrainingReport {
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            holdout,
            artifact_digest: None,
        };
        obs::emit_model_trained(&report);
        METRICS.inc_models_trained();
        Ok((model, report))
    }

    /// Seeded shuffle, then hold out `ceil(n * (1 - train_split))` rows.
    ///
    /// At least one row always stays in the training partition.
    fn split_indices(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.forest.seed);
        indices.shuffle(&mut rng);

        let holdout = (n as f64 * (1.0 - self.config.train_split) - 1e-9).ceil().max(0.0) as usize;
        let holdout = holdout.min(n.saturating_sub(1));
        let test = indices.split_off(n - holdout);
        (indices, test)
    }
}
