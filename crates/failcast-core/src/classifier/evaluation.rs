//! Held-out evaluation metrics.

use serde::{Deserialize, Serialize};

/// Confusion counts and derived scores for a set of predictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// (TP + TN) / total
    pub accuracy: f64,
    /// TP / (TP + FP)
    pub precision: f64,
    /// TP / (TP + FN)
    pub recall: f64,
}

impl EvaluationMetrics {
    /// Compare `predictions` against `truth` pairwise (`true` = failed).
    pub fn compute(predictions: &[bool], truth: &[bool]) -> Self {
        let mut m = Self::default();
        for (&pred, &actual) in predictions.iter().zip(truth) {
            match (pred, actual) {
                (true, true) => m.true_positives += 1,
                (false, false) => m.true_negatives += 1,
                (true, false) => m.false_positives += 1,
                (false, true) => m.false_negatives += 1,
            }
        }

        let total = m.total();
        m.accuracy = ratio(m.true_positives + m.true_negatives, total);
        m.precision = ratio(m.true_positives, m.true_positives + m.false_positives);
        m.recall = ratio(m.true_positives, m.true_positives + m.false_negatives);
        m
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
