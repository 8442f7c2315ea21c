//! Classifier model capability traits and concrete models.
//!
//! Each trait names one scoring capability a trained classifier can expose.
//! The ensemble never probes capabilities at request time; the capability a
//! classifier is scored through is fixed when it is registered (see
//! [`ScoringStrategy`](crate::ensemble::ScoringStrategy)).

pub(crate) mod linear;
pub(crate) mod naive_bayes;

pub use linear::{LinearSvm, LogisticRegression};
pub use naive_bayes::MultinomialNb;

use crate::error::Result;
use crate::features::FeatureVector;

/// Label paired with its probability, as returned by probability-capable models.
pub type LabelProbs = Vec<(String, f32)>;

/// Minimum capability: predict a sentiment label for a feature vector.
///
/// Every model implements this; the ensemble treats labels as opaque values
/// and never interprets their meaning.
pub trait LabelClassifier: Send + Sync {
    /// Predict the sentiment label for one input.
    fn predict(&self, features: &FeatureVector) -> Result<String>;
}

/// Capability: produce a full class-probability vector.
pub trait ProbabilityClassifier: Send + Sync {
    /// Probability for every class, in the model's class order.
    ///
    /// Values are expected to sum to 1; the ensemble only relies on each
    /// value lying in `[0, 1]`.
    fn predict_proba(&self, features: &FeatureVector) -> Result<LabelProbs>;
}

/// Capability: expose a decision margin but no probability output.
pub trait MarginClassifier: Send + Sync {
    /// The predicted label and the decision margin of that predicted class.
    ///
    /// The margin is the signed distance of the input from the decision
    /// boundary; for binary models the margin of the predicted class is
    /// non-negative, for one-vs-rest multiclass it may be negative.
    fn decision(&self, features: &FeatureVector) -> Result<(String, f32)>;
}
