//! On-disk model and vectorizer loading.
//!
//! Models and vectorizers are stored as JSON descriptors exported from the
//! training environment. Loading happens once at startup; failures here are
//! fatal to initialization and never surface mid-request. The classifier
//! `kind` string maps statically onto a scoring strategy, so an unrecognized
//! kind is rejected here rather than falling back at request time.

use candle_core::Device;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ensemble::{ClassifierRegistry, ScoredClassifier, ScoringStrategy};
use crate::error::{EnsembleError, Result};
use crate::features::{FeatureTransformer, TfidfVectorizer};
use crate::models::{LinearSvm, LogisticRegression, MultinomialNb};

// ============ Vectorizer ============

#[derive(Deserialize)]
struct RawVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
}

fn default_lowercase() -> bool {
    true
}

/// Loads a [`TfidfVectorizer`] from a JSON descriptor on disk.
#[derive(Debug, Clone)]
pub struct VectorizerLoader {
    path: PathBuf,
}

impl VectorizerLoader {
    /// Point the loader at a descriptor file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the vectorizer.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::Transform`] if the descriptor cannot be read
    /// or parsed; the transformer is unusable and startup should abort.
    pub fn load(&self, device: &Device) -> Result<TfidfVectorizer> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            EnsembleError::Transform(format!(
                "failed to read vectorizer '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        let raw: RawVectorizer = serde_json::from_str(&content).map_err(|e| {
            EnsembleError::Transform(format!(
                "failed to parse vectorizer '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        TfidfVectorizer::new(raw.vocabulary, raw.idf, raw.lowercase, device.clone())
    }
}

// ============ Classifier ============

#[derive(Deserialize)]
struct KindProbe {
    kind: String,
}

#[derive(Deserialize)]
struct RawLinear {
    classes: Vec<String>,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

#[derive(Deserialize)]
struct RawNaiveBayes {
    classes: Vec<String>,
    feature_log_prob: Vec<Vec<f32>>,
    class_log_prior: Vec<f32>,
}

/// Loads a trained classifier from a JSON descriptor on disk.
///
/// The descriptor's `kind` field selects both the concrete model and its
/// scoring strategy:
///
/// | `kind` | Model | Strategy |
/// |--------|-------|----------|
/// | `logistic_regression` | [`LogisticRegression`] | Probability |
/// | `naive_bayes` | [`MultinomialNb`] | Probability |
/// | `svm`, `linear_svm` | [`LinearSvm`] | Margin |
#[derive(Debug, Clone)]
pub struct ClassifierLoader {
    path: PathBuf,
}

impl ClassifierLoader {
    /// Point the loader at a descriptor file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the classifier and its statically assigned scoring strategy.
    ///
    /// Returns the strategy together with the input dimension the model was
    /// trained on, so callers can cross-check it against the paired
    /// vectorizer.
    ///
    /// # Errors
    ///
    /// [`EnsembleError::UnsupportedClassifier`] for an unrecognized `kind`;
    /// [`EnsembleError::ModelFormat`] for a malformed descriptor.
    pub fn load(&self, device: &Device) -> Result<(ScoringStrategy, usize)> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            EnsembleError::ModelFormat(format!(
                "failed to read classifier '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        let probe: KindProbe = serde_json::from_str(&content).map_err(|e| {
            EnsembleError::ModelFormat(format!(
                "classifier '{}' has no readable 'kind' field: {}",
                self.path.display(),
                e
            ))
        })?;

        match probe.kind.as_str() {
            "logistic_regression" => {
                let raw: RawLinear = self.parse(&content)?;
                let model = LogisticRegression::new(raw.weights, raw.bias, raw.classes, device)?;
                let dim = model.input_dimension();
                Ok((ScoringStrategy::Probability(Arc::new(model)), dim))
            }
            "naive_bayes" => {
                let raw: RawNaiveBayes = self.parse(&content)?;
                let model = MultinomialNb::new(
                    raw.feature_log_prob,
                    raw.class_log_prior,
                    raw.classes,
                    device,
                )?;
                let dim = model.input_dimension();
                Ok((ScoringStrategy::Probability(Arc::new(model)), dim))
            }
            "svm" | "linear_svm" => {
                let raw: RawLinear = self.parse(&content)?;
                let model = LinearSvm::new(raw.weights, raw.bias, raw.classes, device)?;
                let dim = model.input_dimension();
                Ok((ScoringStrategy::Margin(Arc::new(model)), dim))
            }
            other => Err(EnsembleError::UnsupportedClassifier(other.to_string())),
        }
    }

    fn parse<'de, T: Deserialize<'de>>(&self, content: &'de str) -> Result<T> {
        serde_json::from_str(content).map_err(|e| {
            EnsembleError::ModelFormat(format!(
                "failed to parse classifier '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

// ============ Ensemble assembly ============

struct EnsembleEntry {
    identity: String,
    model: PathBuf,
    vectorizer: PathBuf,
}

/// Assembles a [`ClassifierRegistry`] from descriptor files at startup.
///
/// Order of [`classifier`](Self::classifier) calls becomes registry order,
/// which is the order the arbitration tie-break is defined over.
///
/// # Examples
///
/// ```rust,no_run
/// use sentiment_ensemble::loaders::EnsembleLoader;
///
/// # fn main() -> sentiment_ensemble::error::Result<()> {
/// let registry = EnsembleLoader::new()
///     .classifier("svm", "models/svm.json", "models/svm_vectorizer.json")
///     .classifier("naive_bayes", "models/nb.json", "models/nb_vectorizer.json")
///     .load()?;
/// # Ok(())
/// # }
/// ```
pub struct EnsembleLoader {
    entries: Vec<EnsembleEntry>,
    device: Device,
}

impl EnsembleLoader {
    /// Start an empty loader targeting the CPU.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            device: Device::Cpu,
        }
    }

    /// Run the loaded models on a specific device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Add one classifier by identity, model descriptor, and vectorizer
    /// descriptor.
    pub fn classifier(
        mut self,
        identity: impl Into<String>,
        model_path: impl Into<PathBuf>,
        vectorizer_path: impl Into<PathBuf>,
    ) -> Self {
        self.entries.push(EnsembleEntry {
            identity: identity.into(),
            model: model_path.into(),
            vectorizer: vectorizer_path.into(),
        });
        self
    }

    /// Load every configured classifier and build the registry.
    ///
    /// Any load failure aborts the whole assembly; a partially loaded
    /// ensemble is never returned.
    pub fn load(self) -> Result<ClassifierRegistry> {
        let mut builder = ClassifierRegistry::builder();
        for entry in self.entries {
            let vectorizer = VectorizerLoader::new(&entry.vectorizer).load(&self.device)?;
            let (strategy, input_dim) = ClassifierLoader::new(&entry.model).load(&self.device)?;
            if vectorizer.dimension() != input_dim {
                return Err(EnsembleError::ModelFormat(format!(
                    "classifier '{}' expects {}-dimensional input but its vectorizer produces {}",
                    entry.identity,
                    input_dim,
                    vectorizer.dimension()
                )));
            }
            tracing::info!(
                classifier = entry.identity.as_str(),
                strategy = ?strategy,
                "model and vectorizer loaded"
            );
            builder = builder.register(ScoredClassifier::new(
                entry.identity,
                Arc::new(vectorizer),
                strategy,
            ));
        }
        builder.build()
    }
}

impl Default for EnsembleLoader {
    fn default() -> Self {
        Self::new()
    }
}
