//! Ensemble sentiment classification for review text.
//!
//! Several independently-trained classifiers score one cleaned review; the
//! single most confident verdict wins under a uniform, deterministic
//! arbitration rule, even though the classifiers expose different native
//! scoring APIs (probability vectors, decision margins, or labels only).
//!
//! Start at the [`ensemble`] module for the pipeline, or at [`loaders`] to
//! assemble a registry from trained model descriptors.

#![deny(missing_docs)]

pub mod ensemble;
pub mod error;
pub mod features;
pub mod loaders;
pub mod models;
pub mod sink;
pub mod text;

pub use ensemble::{ClassifierRegistry, EnsemblePipeline, EnsembleResult};
pub use error::{EnsembleError, Result};
pub use loaders::EnsembleLoader;
