//! Persistence boundary for prediction results.
//!
//! The core never reads stored history; it only hands finished results to a
//! sink chosen by the surrounding service. [`MemorySink`] exists for tests
//! and examples; real deployments implement [`PredictionSink`] over their own
//! storage.

use serde::Serialize;
use std::sync::Mutex;

use crate::ensemble::EnsembleResult;
use crate::error::Result;

/// One stored prediction together with its request metadata.
#[derive(Debug, Clone, Serialize)]
pub struct StoredPrediction {
    /// Title the caller filed the review under.
    pub title: String,
    /// The raw review text as submitted.
    pub review: String,
    /// Winning sentiment label.
    pub label: String,
    /// Winning confidence.
    pub confidence: f32,
    /// Identity of the winning classifier.
    pub winner: String,
}

/// Stores finished ensemble results keyed by request metadata.
pub trait PredictionSink: Send + Sync {
    /// Persist one result.
    fn record(&self, title: &str, review: &str, result: &EnsembleResult) -> Result<()>;

    /// List stored predictions in insertion order.
    fn list(&self) -> Result<Vec<StoredPrediction>>;
}

/// An in-memory sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<StoredPrediction>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PredictionSink for MemorySink {
    fn record(&self, title: &str, review: &str, result: &EnsembleResult) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(StoredPrediction {
            title: title.to_string(),
            review: review.to_string(),
            label: result.label.clone(),
            confidence: result.confidence,
            winner: result.winner.clone(),
        });
        Ok(())
    }

    fn list(&self) -> Result<Vec<StoredPrediction>> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.clone())
    }
}
