//! Multinomial naive Bayes over non-negative feature vectors.

use candle_core::{Device, Tensor, D};
use candle_nn::ops::softmax;

use crate::error::{EnsembleError, Result};
use crate::features::FeatureVector;
use crate::models::{LabelClassifier, LabelProbs, ProbabilityClassifier};

/// A trained multinomial naive Bayes model. Probability-capable.
///
/// Holds per-class log priors and per-class feature log probabilities; the
/// posterior is the softmax of the joint log-likelihood
/// `feature_log_prob · x + class_log_prior`.
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    feature_log_prob: Tensor,
    class_log_prior: Tensor,
    classes: Vec<String>,
}

impl MultinomialNb {
    /// Create a model from trained parameters.
    ///
    /// `feature_log_prob` has one row per class; `class_log_prior` one entry
    /// per class.
    pub fn new(
        feature_log_prob: Vec<Vec<f32>>,
        class_log_prior: Vec<f32>,
        classes: Vec<String>,
        device: &Device,
    ) -> Result<Self> {
        if classes.is_empty()
            || feature_log_prob.len() != classes.len()
            || class_log_prior.len() != classes.len()
        {
            return Err(EnsembleError::ModelFormat(format!(
                "naive Bayes expects one log-probability row and one prior per class; \
                 got {} rows and {} priors for {} classes",
                feature_log_prob.len(),
                class_log_prior.len(),
                classes.len()
            )));
        }
        let dim = feature_log_prob.first().map(Vec::len).unwrap_or(0);
        if feature_log_prob.iter().any(|row| row.len() != dim) {
            return Err(EnsembleError::ModelFormat(
                "feature log-probability rows have inconsistent dimensions".into(),
            ));
        }

        let rows = feature_log_prob.len();
        let flat: Vec<f32> = feature_log_prob.into_iter().flatten().collect();
        let feature_log_prob = Tensor::from_vec(flat, (rows, dim), device)?;
        let class_log_prior = Tensor::from_vec(class_log_prior, (rows,), device)?;
        Ok(Self {
            feature_log_prob,
            class_log_prior,
            classes,
        })
    }

    /// The input dimension this model was trained on.
    pub fn input_dimension(&self) -> usize {
        self.feature_log_prob.dims()[1]
    }

    fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<Tensor> {
        let x = features.as_tensor().unsqueeze(1)?;
        let jll = self.feature_log_prob.matmul(&x)?.squeeze(1)?;
        Ok((jll + &self.class_log_prior)?)
    }
}

impl LabelClassifier for MultinomialNb {
    fn predict(&self, features: &FeatureVector) -> Result<String> {
        let jll = self.joint_log_likelihood(features)?.to_vec1::<f32>()?;
        let mut best = 0usize;
        for (i, &v) in jll.iter().enumerate() {
            if v > jll[best] {
                best = i;
            }
        }
        Ok(self.classes[best].clone())
    }
}

impl ProbabilityClassifier for MultinomialNb {
    fn predict_proba(&self, features: &FeatureVector) -> Result<LabelProbs> {
        let jll = self.joint_log_likelihood(features)?;
        let probs = softmax(&jll, D::Minus1)?.to_vec1::<f32>()?;
        Ok(self.classes.iter().cloned().zip(probs).collect())
    }
}
