//! Linear classifier models over dense feature vectors.
//!
//! Both models share the same decision core (`w · x + b`); they differ only
//! in what they expose on top of it. [`LogisticRegression`] turns decision
//! values into probabilities, [`LinearSvm`] exposes the raw margin.

use candle_core::{Device, Tensor, D};
use candle_nn::ops::softmax;

use crate::error::{EnsembleError, Result};
use crate::features::FeatureVector;
use crate::models::{LabelClassifier, LabelProbs, MarginClassifier, ProbabilityClassifier};

/// Shared linear decision core: a weight matrix and bias per class.
///
/// For binary models the weight matrix has one row and the sign of the single
/// decision value picks between `classes[0]` (non-positive) and `classes[1]`
/// (positive), matching the convention the models were trained under.
#[derive(Debug, Clone)]
struct LinearCore {
    weights: Tensor,
    bias: Tensor,
    classes: Vec<String>,
}

impl LinearCore {
    fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>, classes: Vec<String>, device: &Device) -> Result<Self> {
        if classes.len() < 2 {
            return Err(EnsembleError::ModelFormat(format!(
                "linear model needs at least 2 classes, got {}",
                classes.len()
            )));
        }
        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if weights.len() != expected_rows || bias.len() != expected_rows {
            return Err(EnsembleError::ModelFormat(format!(
                "expected {} weight rows and bias entries for {} classes, got {} and {}",
                expected_rows,
                classes.len(),
                weights.len(),
                bias.len()
            )));
        }
        let dim = weights.first().map(Vec::len).unwrap_or(0);
        if weights.iter().any(|row| row.len() != dim) {
            return Err(EnsembleError::ModelFormat(
                "weight rows have inconsistent dimensions".into(),
            ));
        }

        let rows = weights.len();
        let flat: Vec<f32> = weights.into_iter().flatten().collect();
        let weights = Tensor::from_vec(flat, (rows, dim), device)?;
        let bias = Tensor::from_vec(bias, (rows,), device)?;
        Ok(Self {
            weights,
            bias,
            classes,
        })
    }

    fn input_dimension(&self) -> usize {
        self.weights.dims()[1]
    }

    /// Decision values as a tensor, one per weight row.
    fn decision_tensor(&self, features: &FeatureVector) -> Result<Tensor> {
        let x = features.as_tensor().unsqueeze(1)?;
        let scores = self.weights.matmul(&x)?.squeeze(1)?;
        Ok((scores + &self.bias)?)
    }

    fn decision_values(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        Ok(self.decision_tensor(features)?.to_vec1::<f32>()?)
    }

    fn is_binary(&self) -> bool {
        self.classes.len() == 2
    }

    /// Predicted label and the margin of that predicted class.
    fn predicted(&self, features: &FeatureVector) -> Result<(String, f32)> {
        let values = self.decision_values(features)?;
        if self.is_binary() {
            let d = values[0];
            let (index, margin) = if d > 0.0 { (1, d) } else { (0, -d) };
            return Ok((self.classes[index].clone(), margin));
        }
        let mut best = 0usize;
        for (i, &v) in values.iter().enumerate() {
            if v > values[best] {
                best = i;
            }
        }
        Ok((self.classes[best].clone(), values[best]))
    }
}

// ============ Logistic regression ============

/// A trained logistic regression model. Probability-capable.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    core: LinearCore,
}

impl LogisticRegression {
    /// Create a model from trained coefficients.
    ///
    /// Binary models take one weight row; multiclass models take one row per
    /// class (one-vs-rest, softmax posterior).
    pub fn new(
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
        classes: Vec<String>,
        device: &Device,
    ) -> Result<Self> {
        Ok(Self {
            core: LinearCore::new(weights, bias, classes, device)?,
        })
    }

    /// The input dimension this model was trained on.
    pub fn input_dimension(&self) -> usize {
        self.core.input_dimension()
    }
}

impl LabelClassifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Result<String> {
        Ok(self.core.predicted(features)?.0)
    }
}

impl ProbabilityClassifier for LogisticRegression {
    fn predict_proba(&self, features: &FeatureVector) -> Result<LabelProbs> {
        if self.core.is_binary() {
            let d = self.core.decision_values(features)?[0];
            let p = 1.0 / (1.0 + (-d).exp());
            return Ok(vec![
                (self.core.classes[0].clone(), 1.0 - p),
                (self.core.classes[1].clone(), p),
            ]);
        }
        let scores = self.core.decision_tensor(features)?;
        let probs = softmax(&scores, D::Minus1)?.to_vec1::<f32>()?;
        Ok(self.core.classes.iter().cloned().zip(probs).collect())
    }
}

// ============ Linear SVM ============

/// A trained linear support vector machine. Margin-capable, no probabilities.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    core: LinearCore,
}

impl LinearSvm {
    /// Create a model from trained coefficients.
    pub fn new(
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
        classes: Vec<String>,
        device: &Device,
    ) -> Result<Self> {
        Ok(Self {
            core: LinearCore::new(weights, bias, classes, device)?,
        })
    }

    /// The input dimension this model was trained on.
    pub fn input_dimension(&self) -> usize {
        self.core.input_dimension()
    }
}

impl LabelClassifier for LinearSvm {
    fn predict(&self, features: &FeatureVector) -> Result<String> {
        Ok(self.core.predicted(features)?.0)
    }
}

impl MarginClassifier for LinearSvm {
    fn decision(&self, features: &FeatureVector) -> Result<(String, f32)> {
        self.core.predicted(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(values: Vec<f32>) -> FeatureVector {
        FeatureVector::from_values(values, &Device::Cpu).unwrap()
    }

    fn binary_classes() -> Vec<String> {
        vec!["negative".to_string(), "positive".to_string()]
    }

    #[test]
    fn binary_logistic_probabilities_sum_to_one() {
        let model = LogisticRegression::new(
            vec![vec![2.0, -2.0]],
            vec![0.0],
            binary_classes(),
            &Device::Cpu,
        )
        .unwrap();
        let probs = model.predict_proba(&features(vec![1.0, 0.0])).unwrap();
        assert_eq!(probs.len(), 2);
        let total: f32 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-6);
        // positive decision value favors classes[1]
        assert_eq!(probs[1].0, "positive");
        assert!(probs[1].1 > 0.5);
    }

    #[test]
    fn binary_prediction_follows_decision_sign() {
        let model = LogisticRegression::new(
            vec![vec![2.0, -2.0]],
            vec![0.0],
            binary_classes(),
            &Device::Cpu,
        )
        .unwrap();
        assert_eq!(model.predict(&features(vec![1.0, 0.0])).unwrap(), "positive");
        assert_eq!(model.predict(&features(vec![0.0, 1.0])).unwrap(), "negative");
    }

    #[test]
    fn zero_decision_predicts_first_class_with_zero_margin() {
        let model =
            LinearSvm::new(vec![vec![1.0, -1.0]], vec![0.0], binary_classes(), &Device::Cpu)
                .unwrap();
        let (label, margin) = model.decision(&features(vec![0.0, 0.0])).unwrap();
        assert_eq!(label, "negative");
        assert_eq!(margin, 0.0);
    }

    #[test]
    fn binary_margin_of_predicted_class_is_non_negative() {
        let model =
            LinearSvm::new(vec![vec![1.0, -1.0]], vec![0.0], binary_classes(), &Device::Cpu)
                .unwrap();
        let (label, margin) = model.decision(&features(vec![0.0, 3.0])).unwrap();
        assert_eq!(label, "negative");
        assert_eq!(margin, 3.0);
    }

    #[test]
    fn multiclass_argmax_picks_highest_decision_value() {
        let classes = vec![
            "negative".to_string(),
            "neutral".to_string(),
            "positive".to_string(),
        ];
        let model = LogisticRegression::new(
            vec![vec![1.0, 0.0], vec![0.0, 0.0], vec![0.0, 1.0]],
            vec![0.0, 0.0, 0.0],
            classes,
            &Device::Cpu,
        )
        .unwrap();
        assert_eq!(model.predict(&features(vec![0.0, 2.0])).unwrap(), "positive");
        let probs = model.predict_proba(&features(vec![0.0, 2.0])).unwrap();
        let total: f32 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn mismatched_weight_rows_are_rejected() {
        let err = LogisticRegression::new(
            vec![vec![1.0], vec![2.0]],
            vec![0.0, 0.0],
            binary_classes(),
            &Device::Cpu,
        )
        .unwrap_err();
        assert!(matches!(err, EnsembleError::ModelFormat(_)));
    }
}
