//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`EnsembleError`]
//! as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`EnsembleError`] as the error type.
pub type Result<T> = std::result::Result<T, EnsembleError>;

/// The unified error type for all crate errors.
///
/// Errors are never converted into a default sentiment; every failure
/// surfaces to the caller of [`predict`](crate::ensemble::EnsemblePipeline::predict)
/// and the surrounding service decides user-visible behavior.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EnsembleError {
    /// A feature transformer could not be loaded or is unusable.
    /// Startup-fatal: never raised mid-request in a correctly initialized system.
    #[error("transformer error: {0}")]
    Transform(String),

    /// A classifier exposes none of the recognized scoring capabilities.
    /// Raised at load/registration time, rejecting the classifier.
    #[error("unsupported classifier kind: {0}")]
    UnsupportedClassifier(String),

    /// Two classifiers were registered under the same identity.
    #[error("duplicate classifier identity: {0}")]
    DuplicateClassifier(String),

    /// One classifier failed while scoring a request. The whole predict
    /// call fails; partial ensemble results are never returned.
    #[error("classifier '{identity}' failed during scoring: {message}")]
    ClassifierFailure {
        /// Identity of the classifier that failed.
        identity: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// `predict` was invoked against a registry with zero classifiers.
    #[error("ensemble registry is empty; no prediction possible")]
    EmptyEnsemble,

    /// A model or vectorizer descriptor is malformed.
    #[error("invalid model format: {0}")]
    ModelFormat(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),

    /// Pass-through from the tensor backend.
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    /// Pass-through from the filesystem.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Pass-through from descriptor parsing.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}
