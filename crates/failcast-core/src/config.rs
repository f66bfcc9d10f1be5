//! Pipeline configuration.
//!
//! [`PredictorConfig`] is passed explicitly to the lifecycle manager and the
//! prediction engine. The defaults reproduce the reference policy: train only
//! with at least 10 records, hold out 20%, surface tests at or above 0.70.

use serde::{Deserialize, Serialize};

use crate::error::{FailcastError, Result};

/// Random-forest hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_trees: usize,

    /// Maximum tree depth (`None` grows until leaves are pure).
    pub max_depth: Option<usize>,

    /// Minimum samples a node needs before it is considered for a split.
    pub min_samples_split: usize,

    /// Seed for bootstrap sampling, feature sampling and the train/test shuffle.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// Configuration shared by training and prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictorConfig {
    /// Fewer historical records than this and no model is trained.
    pub min_training_records: usize,

    /// Fraction of the history used for fitting; the rest is held out.
    pub train_split: f64,

    /// Minimum failure probability (inclusive) for a test to be reported.
    pub probability_threshold: f64,

    /// Ensemble hyperparameters.
    pub forest: ForestParams,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_training_records: 10,
            train_split: 0.8,
            probability_threshold: 0.70,
            forest: ForestParams::default(),
        }
    }
}

impl PredictorConfig {
    /// Override the probability threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.probability_threshold = threshold;
        self
    }

    /// Override the forest seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.forest.seed = seed;
        self
    }

    /// Override the number of trees.
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.forest.n_trees = n_trees;
        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.train_split > 0.0 && self.train_split < 1.0) {
            return Err(FailcastError::InvalidConfig(format!(
                "train_split must be in (0, 1), got {}",
                self.train_split
            )));
        }
        if !(0.0..=1.0).contains(&self.probability_threshold) {
            return Err(FailcastError::InvalidConfig(format!(
                "probability_threshold must be in [0, 1], got {}",
                self.probability_threshold
            )));
        }
        if self.min_training_records < 2 {
            return Err(FailcastError::InvalidConfig(
                "min_training_records must be at least 2".to_string(),
            ));
        }
        if self.forest.n_trees == 0 {
            return Err(FailcastError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.forest.min_samples_split < 2 {
            return Err(FailcastError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
