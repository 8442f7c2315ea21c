//! Ensemble arbitration: one cleaned text in, one most-confident verdict out.
//!
//! Every registered classifier scores the input through a uniform `[0, 1]`
//! confidence convention, whatever its native scoring API (probability
//! vector, decision margin, or label only). The winner is the strictly
//! highest confidence; ties go to the classifier registered first.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentiment_ensemble::ensemble::EnsemblePipeline;
//! use sentiment_ensemble::loaders::EnsembleLoader;
//!
//! # fn main() -> sentiment_ensemble::error::Result<()> {
//! let registry = EnsembleLoader::new()
//!     .classifier("svm", "models/svm.json", "models/svm_vectorizer.json")
//!     .classifier("naive_bayes", "models/nb.json", "models/nb_vectorizer.json")
//!     .classifier("logistic_regression", "models/lr.json", "models/lr_vectorizer.json")
//!     .load()?;
//!
//! let pipeline = EnsemblePipeline::new(registry);
//!
//! // Single text - direct access
//! let output = pipeline.predict("absolutely loved this film")?;
//! println!(
//!     "sentiment: {} (confidence: {:.2}, winner: {})",
//!     output.result.label, output.result.confidence, output.result.winner
//! );
//!
//! // Batch - results include input text
//! let output = pipeline.predict(&["great movie", "terrible plot"])?;
//! for r in output.results {
//!     println!("{} → {}", r.text, r.result?.label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Registering classifiers by hand
//!
//! [`ClassifierRegistry::builder`] accepts any [`ScoredClassifier`], so test
//! doubles or models not covered by the loaders plug in directly. The scoring
//! strategy is fixed per classifier at registration and never re-probed.

// ============ Internal API ============

pub(crate) mod pipeline;
pub(crate) mod registry;
pub(crate) mod scoring;
pub(crate) mod stats;

// ============ Public API ============

pub use pipeline::{BatchOutput, BatchResult, EnsemblePipeline, EnsembleResult, Output};
pub use registry::{ClassifierRegistry, RegistryBuilder};
pub use scoring::{ScoredClassifier, ScoredPrediction, ScoringStrategy};
pub use stats::PipelineStats;

#[doc(hidden)]
pub use pipeline::EnsembleInput;
