//! Batch scoring of candidate changes.

use rayon::prelude::*;

use crate::classifier::Classifier;
use crate::config::PredictorConfig;
use crate::domain::{ChangeRecord, PredictionResult};
use crate::features::FeatureVector;
use crate::metrics::METRICS;
use crate::obs;
use crate::recommend::recommend;

/// Scores change batches and keeps the ones at or above the threshold.
pub struct PredictionEngine {
    config: PredictorConfig,
}

impl PredictionEngine {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.probability_threshold
    }

    /// Score `changes` and return the likely failures in input order.
    ///
    /// With no classifier the result is empty. Recommendations are only
    /// generated for changes that clear the threshold.
    pub fn predict(
        &self,
        changes: &[ChangeRecord],
        classifier: Option<&dyn Classifier>,
    ) -> Vec<PredictionResult> {
        let Some(classifier) = classifier else {
            tracing::warn!(changes = changes.len(), "no trained model available");
            return Vec::new();
        };

        let threshold = self.threshold();
        let results: Vec<PredictionResult> = changes
            .par_iter()
            .filter_map(|change| {
                let probability = classifier.predict_probability(&FeatureVector::from_change(change));
                tracing::debug!(test_name = %change.test_name, probability, "change scored");
                (probability >= threshold).then(|| PredictionResult {
                    test_name: change.test_name.clone(),
                    failure_probability: probability,
                    recommendations: recommend(change),
                })
            })
            .collect();

        METRICS.add_records_scored(changes.len() as u64);
        METRICS.add_predictions_surfaced(results.len() as u64);
        obs::emit_predict_completed(changes.len(), results.len(), threshold);
        results
    }
}
