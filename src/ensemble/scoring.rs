//! The scored-classifier adapter: one uniform scoring operation over three
//! distinct classifier capabilities.

use std::sync::Arc;

use crate::error::{EnsembleError, Result};
use crate::features::FeatureTransformer;
use crate::models::{LabelClassifier, MarginClassifier, ProbabilityClassifier};

/// One classifier's normalized output for one input.
///
/// `confidence` is always on a common `[0, 1]` scale regardless of the
/// underlying scoring mechanism; that normalization is the whole point of
/// the adapter. It is a comparison convention, not a calibrated probability.
#[derive(Debug, Clone)]
pub struct ScoredPrediction {
    /// Identity of the classifier that produced this prediction.
    pub identity: String,
    /// The predicted sentiment label.
    pub label: String,
    /// Normalized confidence in `[0, 1]`.
    pub confidence: f32,
}

/// How a classifier's native output maps onto the common confidence scale.
///
/// Assigned once at registration; never re-probed per request. Exactly three
/// variants are defined.
pub enum ScoringStrategy {
    /// Confidence is the maximum of the class-probability vector; the label
    /// is the argmax class.
    Probability(Arc<dyn ProbabilityClassifier>),
    /// Confidence is the logistic transform `1 / (1 + exp(-margin))` of the
    /// decision margin of the predicted class.
    Margin(Arc<dyn MarginClassifier>),
    /// Confidence is a constant `1.0`. By convention label-only classifiers
    /// win ties against anything that is not fully confident.
    LabelOnly(Arc<dyn LabelClassifier>),
}

impl std::fmt::Debug for ScoringStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Probability(_) => "Probability",
            Self::Margin(_) => "Margin",
            Self::LabelOnly(_) => "LabelOnly",
        };
        f.write_str(name)
    }
}

/// Logistic transform mapping a decision margin onto `[0, 1]`.
///
/// A margin of 0 maps to 0.5 exactly.
pub(crate) fn logistic(margin: f32) -> f32 {
    1.0 / (1.0 + (-margin).exp())
}

/// Wraps one classifier and its feature transformer behind a single
/// normalized scoring operation.
///
/// Safe to invoke concurrently; the wrapped model and transformer are
/// required to be read-only during inference.
pub struct ScoredClassifier {
    identity: String,
    transformer: Arc<dyn FeatureTransformer>,
    strategy: ScoringStrategy,
}

impl ScoredClassifier {
    /// Create an adapter from an identity, a transformer, and a statically
    /// assigned scoring strategy.
    pub fn new(
        identity: impl Into<String>,
        transformer: Arc<dyn FeatureTransformer>,
        strategy: ScoringStrategy,
    ) -> Self {
        Self {
            identity: identity.into(),
            transformer,
            strategy,
        }
    }

    /// The stable identity of the wrapped classifier.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Score one cleaned text: transform, then normalize through the
    /// assigned strategy.
    ///
    /// Any failure inside the transformer or the model surfaces as
    /// [`EnsembleError::ClassifierFailure`] carrying this adapter's identity.
    pub fn score(&self, cleaned_text: &str) -> Result<ScoredPrediction> {
        let span = tracing::span!(
            tracing::Level::TRACE,
            "score",
            classifier = self.identity.as_str()
        );
        let _guard = span.enter();

        let (label, confidence) = self
            .score_inner(cleaned_text)
            .map_err(|e| EnsembleError::ClassifierFailure {
                identity: self.identity.clone(),
                message: e.to_string(),
            })?;

        Ok(ScoredPrediction {
            identity: self.identity.clone(),
            label,
            confidence,
        })
    }

    fn score_inner(&self, cleaned_text: &str) -> Result<(String, f32)> {
        let features = self.transformer.transform(cleaned_text)?;
        match &self.strategy {
            ScoringStrategy::Probability(model) => {
                let probs = model.predict_proba(&features)?;
                let mut best: Option<(String, f32)> = None;
                for (label, p) in probs {
                    match &best {
                        Some((_, current)) if p <= *current => {}
                        _ => best = Some((label, p)),
                    }
                }
                best.ok_or_else(|| {
                    EnsembleError::Unexpected("probability classifier returned no classes".into())
                })
            }
            ScoringStrategy::Margin(model) => {
                let (label, margin) = model.decision(&features)?;
                Ok((label, logistic(margin)))
            }
            ScoringStrategy::LabelOnly(model) => Ok((model.predict(&features)?, 1.0)),
        }
    }
}
