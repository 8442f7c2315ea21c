//! Feature extraction: turning one cleaned text into one numeric vector.
//!
//! Each registered classifier owns its own transformer; dimensions are
//! transformer-specific and fixed once the transformer is loaded.

use candle_core::{Device, Tensor};
use std::collections::HashMap;

use crate::error::{EnsembleError, Result};

// ============ Feature vector ============

/// A fixed-dimension numeric feature vector (rank-1, f32).
///
/// Produced by a [`FeatureTransformer`] from cleaned text and consumed by the
/// classifier models. Dimensions are not shared across transformers.
#[derive(Debug, Clone)]
pub struct FeatureVector(Tensor);

impl FeatureVector {
    /// Wrap a rank-1 tensor as a feature vector.
    pub fn new(tensor: Tensor) -> Result<Self> {
        if tensor.dims().len() != 1 {
            return Err(EnsembleError::Unexpected(format!(
                "feature vector must be rank 1, got shape {:?}",
                tensor.dims()
            )));
        }
        Ok(Self(tensor))
    }

    /// Build a feature vector from raw values.
    pub fn from_values(values: Vec<f32>, device: &Device) -> Result<Self> {
        let dim = values.len();
        let tensor = Tensor::from_vec(values, (dim,), device)?;
        Ok(Self(tensor))
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.dims()[0]
    }

    /// Whether the vector has zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying tensor.
    pub fn as_tensor(&self) -> &Tensor {
        &self.0
    }
}

// ============ Transformer seam ============

/// Turns one cleaned text into one feature vector. No side effects.
///
/// Implementations must be safe to invoke concurrently; inference is
/// read-only once the transformer is loaded.
pub trait FeatureTransformer: Send + Sync {
    /// Transform already-cleaned text into a feature vector.
    ///
    /// Empty input is legal and yields a valid (all-zero) vector.
    fn transform(&self, cleaned_text: &str) -> Result<FeatureVector>;

    /// The fixed output dimension of this transformer.
    fn dimension(&self) -> usize;
}

// ============ TF-IDF ============

/// A TF-IDF vectorizer with a fixed vocabulary and per-term IDF weights.
///
/// Matches the semantics of the trained vectorizers the ensemble was built
/// with: raw term counts over whitespace tokens, scaled by IDF, then
/// L2-normalized. Terms outside the vocabulary are ignored.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    device: Device,
}

impl TfidfVectorizer {
    /// Create a vectorizer from a vocabulary and IDF weights.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::ModelFormat`] if any vocabulary index falls
    /// outside the IDF table.
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f32>,
        lowercase: bool,
        device: Device,
    ) -> Result<Self> {
        for (term, &index) in &vocabulary {
            if index >= idf.len() {
                return Err(EnsembleError::ModelFormat(format!(
                    "vocabulary term '{}' maps to column {} but the IDF table has {} entries",
                    term,
                    index,
                    idf.len()
                )));
            }
        }
        Ok(Self {
            vocabulary,
            idf,
            lowercase,
            device,
        })
    }
}

impl FeatureTransformer for TfidfVectorizer {
    fn transform(&self, cleaned_text: &str) -> Result<FeatureVector> {
        let mut values = vec![0.0f32; self.idf.len()];

        for token in cleaned_text.split_whitespace() {
            let lowered;
            let term = if self.lowercase {
                lowered = token.to_lowercase();
                lowered.as_str()
            } else {
                token
            };
            if let Some(&index) = self.vocabulary.get(term) {
                values[index] += 1.0;
            }
        }

        for (value, idf) in values.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        // L2 normalize; an all-zero vector (empty or fully out-of-vocabulary
        // text) stays all-zero.
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        FeatureVector::from_values(values, &self.device)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }
}
