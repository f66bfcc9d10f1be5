//! Binary failure classifiers.
//!
//! [`Classifier`] is the seam between the pipeline and the model: the
//! lifecycle manager fits one, the prediction engine queries one. The
//! shipped implementation is [`RandomForest`].

pub mod evaluation;
pub mod forest;
pub mod tree;

pub use evaluation::EvaluationMetrics;
pub use forest::RandomForest;
pub use tree::DecisionTree;

use crate::error::Result;
use crate::features::FeatureVector;

/// Capabilities every failure classifier provides.
pub trait Classifier: Send + Sync {
    /// Fit on `features` with `labels` (`true` = failed). Replaces any earlier fit.
    fn fit(&mut self, features: &[FeatureVector], labels: &[bool]) -> Result<()>;

    /// Predicted outcome (`true` = failed).
    fn predict_class(&self, features: &FeatureVector) -> bool;

    /// Probability of the failed class, in [0, 1].
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn fit(&mut self, features: &[FeatureVector], labels: &[bool]) -> Result<()> {
        (**self).fit(features, labels)
    }

    fn predict_class(&self, features: &FeatureVector) -> bool {
        (**self).predict_class(features)
    }

    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        (**self).predict_probability(features)
    }
}
