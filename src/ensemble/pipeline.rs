use crate::ensemble::registry::ClassifierRegistry;
use crate::ensemble::scoring::ScoredPrediction;
use crate::ensemble::stats::PipelineStats;
use crate::error::{EnsembleError, Result};
use serde::Serialize;

// ============ Output types ============

/// The immutable outcome of one arbitration pass.
///
/// Created once per input text and never mutated afterwards; the core holds
/// no state across requests other than the registry itself.
#[derive(Debug, Clone, Serialize)]
pub struct EnsembleResult {
    /// The winning sentiment label.
    pub label: String,
    /// The winning confidence (0.0 to 1.0).
    pub confidence: f32,
    /// Identity of the classifier that won.
    pub winner: String,
    /// Every classifier's confidence, in registry order, winner or not.
    pub breakdown: Vec<(String, f32)>,
}

impl EnsembleResult {
    /// Look up one classifier's confidence in the breakdown.
    pub fn confidence_for(&self, identity: &str) -> Option<f32> {
        self.breakdown
            .iter()
            .find(|(id, _)| id == identity)
            .map(|&(_, confidence)| confidence)
    }
}

/// Single-text output from `predict()`.
#[derive(Debug)]
pub struct Output {
    /// Arbitration result.
    pub result: EnsembleResult,
    /// Execution statistics.
    pub stats: PipelineStats,
}

/// Single result in batch output.
#[derive(Debug)]
pub struct BatchResult {
    /// Input text.
    pub text: String,
    /// Arbitration result or error for this input.
    pub result: Result<EnsembleResult>,
}

/// Batch output from `predict()`.
#[derive(Debug)]
pub struct BatchOutput {
    /// Results for each input.
    pub results: Vec<BatchResult>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Input trait for type-based dispatch ============

#[doc(hidden)]
pub trait EnsembleInput<'a> {
    /// Output type for `.predict()`.
    type Output;

    #[doc(hidden)]
    fn into_texts(self) -> Vec<&'a str>;
    #[doc(hidden)]
    fn convert_output(
        texts: Vec<&'a str>,
        results: Vec<Result<EnsembleResult>>,
        stats: PipelineStats,
    ) -> Result<Self::Output>;
}

impl<'a> EnsembleInput<'a> for &'a str {
    type Output = Output;

    fn into_texts(self) -> Vec<&'a str> {
        vec![self]
    }

    fn convert_output(
        _texts: Vec<&'a str>,
        mut results: Vec<Result<EnsembleResult>>,
        stats: PipelineStats,
    ) -> Result<Self::Output> {
        let result = results
            .pop()
            .ok_or_else(|| EnsembleError::Unexpected("No results returned".into()))??;
        Ok(Output { result, stats })
    }
}

impl<'a> EnsembleInput<'a> for &'a [&'a str] {
    type Output = BatchOutput;

    fn into_texts(self) -> Vec<&'a str> {
        self.to_vec()
    }

    fn convert_output(
        texts: Vec<&'a str>,
        results: Vec<Result<EnsembleResult>>,
        stats: PipelineStats,
    ) -> Result<Self::Output> {
        let results = texts
            .into_iter()
            .zip(results)
            .map(|(text, result)| BatchResult {
                text: text.to_string(),
                result,
            })
            .collect();
        Ok(BatchOutput { results, stats })
    }
}

impl<'a, const N: usize> EnsembleInput<'a> for &'a [&'a str; N] {
    type Output = BatchOutput;

    fn into_texts(self) -> Vec<&'a str> {
        self.as_slice().to_vec()
    }

    fn convert_output(
        texts: Vec<&'a str>,
        results: Vec<Result<EnsembleResult>>,
        stats: PipelineStats,
    ) -> Result<Self::Output> {
        let results = texts
            .into_iter()
            .zip(results)
            .map(|(text, result)| BatchResult {
                text: text.to_string(),
                result,
            })
            .collect();
        Ok(BatchOutput { results, stats })
    }
}

// ============ Pipeline ============

/// Runs every registered classifier against one cleaned text and selects the
/// single most confident verdict.
///
/// The arbitration rule is deterministic: a prediction replaces the running
/// best only when its confidence is strictly greater, so equal confidence
/// keeps the classifier that appears earlier in registry order
/// (first-seen-wins). The registry is immutable, `predict` takes `&self`,
/// and concurrent calls need no locking.
///
/// # Examples
///
/// ```rust,no_run
/// use sentiment_ensemble::ensemble::EnsemblePipeline;
/// use sentiment_ensemble::loaders::EnsembleLoader;
///
/// # fn main() -> sentiment_ensemble::error::Result<()> {
/// let registry = EnsembleLoader::new()
///     .classifier("svm", "models/svm.json", "models/svm_vectorizer.json")
///     .classifier("naive_bayes", "models/nb.json", "models/nb_vectorizer.json")
///     .load()?;
/// let pipeline = EnsemblePipeline::new(registry);
///
/// let output = pipeline.predict("great movie loved it")?;
/// println!(
///     "{} ({:.2}) via {}",
///     output.result.label, output.result.confidence, output.result.winner
/// );
/// # Ok(())
/// # }
/// ```
pub struct EnsemblePipeline {
    registry: ClassifierRegistry,
}

impl EnsemblePipeline {
    /// Create a pipeline over a finalized registry.
    pub fn new(registry: ClassifierRegistry) -> Self {
        Self { registry }
    }

    /// The registry this pipeline arbitrates over.
    pub fn registry(&self) -> &ClassifierRegistry {
        &self.registry
    }

    /// Classify cleaned text through every registered classifier and return
    /// the most confident verdict.
    ///
    /// Single input → [`Output`], batch → [`BatchOutput`]. Per-text semantics
    /// are identical in both paths.
    ///
    /// # Errors
    ///
    /// [`EnsembleError::EmptyEnsemble`] when the registry has no classifiers;
    /// [`EnsembleError::ClassifierFailure`] when any single classifier fails,
    /// in which case no partial result is returned for that text.
    pub fn predict<'a, I: EnsembleInput<'a>>(&self, input: I) -> Result<I::Output> {
        if self.registry.is_empty() {
            return Err(EnsembleError::EmptyEnsemble);
        }

        let stats_builder = PipelineStats::start();
        let texts = input.into_texts();
        let item_count = texts.len();

        let results = texts.iter().map(|text| self.arbitrate(text)).collect();

        I::convert_output(texts, results, stats_builder.finish(item_count))
    }

    /// One arbitration pass over one cleaned text, in registry order.
    fn arbitrate(&self, cleaned_text: &str) -> Result<EnsembleResult> {
        let mut best: Option<ScoredPrediction> = None;
        let mut breakdown = Vec::with_capacity(self.registry.len());

        for entry in self.registry.entries() {
            let scored = entry.score(cleaned_text)?;
            tracing::trace!(
                classifier = scored.identity.as_str(),
                label = scored.label.as_str(),
                confidence = scored.confidence,
                "classifier scored"
            );
            breakdown.push((scored.identity.clone(), scored.confidence));

            // Strictly greater only: ties keep the earlier registry entry.
            match &best {
                Some(current) if scored.confidence <= current.confidence => {}
                _ => best = Some(scored),
            }
        }

        let best = best.ok_or(EnsembleError::EmptyEnsemble)?;
        Ok(EnsembleResult {
            label: best.label,
            confidence: best.confidence,
            winner: best.identity,
            breakdown,
        })
    }
}
