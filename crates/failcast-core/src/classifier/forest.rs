//! Bagged random forest.
//!
//! Each tree is fit on a bootstrap resample of the training rows and looks at
//! `floor(sqrt(FEATURE_COUNT))` candidate features per split. The forest
//! probability is the mean of the per-tree leaf probabilities.
//!
//! Every tree draws from its own RNG seeded from the forest seed and the tree
//! index, so trees can be grown in parallel and the result is still fully
//! determined by the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeParams};
use super::Classifier;
use crate::config::ForestParams;
use crate::error::{FailcastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};

/// Random forest over the failcast feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Unfitted forest with the given hyperparameters.
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            max_features: ((FEATURE_COUNT as f64).sqrt().floor() as usize).max(1),
        }
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

/// Per-tree seed; spreads tree indices across the seed space.
fn tree_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

impl Classifier for RandomForest {
    fn fit(&mut self, features: &[FeatureVector], labels: &[bool]) -> Result<()> {
        if features.is_empty() {
            return Err(FailcastError::InvalidTrainingData(
                "cannot fit on an empty training set".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(FailcastError::InvalidTrainingData(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if self.params.n_trees == 0 {
            return Err(FailcastError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }

        let n = features.len();
        let tree_params = self.tree_params();
        let seed = self.params.seed;

        let trees: Vec<DecisionTree> = (0..self.params.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(tree_seed(seed, i));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::grow(features, labels, sample, &tree_params, &mut rng)
            })
            .collect();

        tracing::debug!(
            trees = trees.len(),
            samples = n,
            nodes = trees.iter().map(DecisionTree::node_count).sum::<usize>(),
            max_features = tree_params.max_features,
            "random forest fitted"
        );
        self.trees = trees;
        Ok(())
    }

    fn predict_class(&self, features: &FeatureVector) -> bool {
        self.predict_probability(features) > 0.5
    }

    /// Mean leaf probability across trees; `0.0` for an unfitted forest.
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_probability(features))
            .sum();
        (sum / self.trees.len() as f64).clamp(0.0, 1.0)
    }
}
