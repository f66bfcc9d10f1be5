//! Feature extraction.
//!
//! This module is the only place that knows the order of the model inputs.
//! Training and scoring both go through [`FeatureVector`], so the order used
//! to fit a model is the order used to query it.

use serde::{Deserialize, Serialize};

use crate::domain::{ChangeRecord, HistoricalRecord};

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 5;

/// Model input names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "code_churn",
    "author_experience",
    "time_since_last_change",
    "coverage_percentage",
    "complexity",
];

/// Ordered numeric inputs for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_history(record: &HistoricalRecord) -> Self {
        Self([
            record.code_churn,
            record.author_experience,
            record.time_since_last_change,
            record.coverage_percentage,
            record.complexity,
        ])
    }

    pub fn from_change(record: &ChangeRecord) -> Self {
        Self([
            record.code_churn,
            record.author_experience,
            record.time_since_last_change,
            record.coverage_percentage,
            record.complexity,
        ])
    }

    /// Value of feature `index` (see [`FEATURE_NAMES`]).
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Feature matrix and label vector for a set of historical records.
pub fn training_matrix(records: &[HistoricalRecord]) -> (Vec<FeatureVector>, Vec<bool>) {
    records
        .iter()
        .map(|r| (FeatureVector::from_history(r), r.failed))
        .unzip()
}
