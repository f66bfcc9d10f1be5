//! Output records.

use serde::{Deserialize, Serialize};

/// A test predicted to fail, with advisories for the change that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub test_name: String,

    /// Estimated probability of failure, in [0, 1].
    pub failure_probability: f64,

    /// Advisories in rule order; may be empty.
    pub recommendations: Vec<String>,
}
