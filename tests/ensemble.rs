use std::sync::Arc;

use candle_core::Device;
use sentiment_ensemble::ensemble::{
    ClassifierRegistry, EnsemblePipeline, ScoredClassifier, ScoringStrategy,
};
use sentiment_ensemble::error::{EnsembleError, Result};
use sentiment_ensemble::features::{FeatureTransformer, FeatureVector};
use sentiment_ensemble::models::{
    LabelClassifier, LabelProbs, MarginClassifier, ProbabilityClassifier,
};
use sentiment_ensemble::sink::{MemorySink, PredictionSink};

// ============ Test doubles ============

struct ZeroTransform;

impl FeatureTransformer for ZeroTransform {
    fn transform(&self, _cleaned_text: &str) -> Result<FeatureVector> {
        FeatureVector::from_values(vec![0.0, 0.0], &Device::Cpu)
    }

    fn dimension(&self) -> usize {
        2
    }
}

struct FixedProb {
    label: &'static str,
    confidence: f32,
}

impl ProbabilityClassifier for FixedProb {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<LabelProbs> {
        Ok(vec![(self.label.to_string(), self.confidence)])
    }
}

struct FixedMargin {
    label: &'static str,
    margin: f32,
}

impl MarginClassifier for FixedMargin {
    fn decision(&self, _features: &FeatureVector) -> Result<(String, f32)> {
        Ok((self.label.to_string(), self.margin))
    }
}

struct FixedLabel(&'static str);

impl LabelClassifier for FixedLabel {
    fn predict(&self, _features: &FeatureVector) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct Failing;

impl ProbabilityClassifier for Failing {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<LabelProbs> {
        Err(EnsembleError::Unexpected("model exploded".into()))
    }
}

fn prob(identity: &str, label: &'static str, confidence: f32) -> ScoredClassifier {
    ScoredClassifier::new(
        identity,
        Arc::new(ZeroTransform),
        ScoringStrategy::Probability(Arc::new(FixedProb { label, confidence })),
    )
}

fn margin(identity: &str, label: &'static str, margin: f32) -> ScoredClassifier {
    ScoredClassifier::new(
        identity,
        Arc::new(ZeroTransform),
        ScoringStrategy::Margin(Arc::new(FixedMargin { label, margin })),
    )
}

fn label_only(identity: &str, label: &'static str) -> ScoredClassifier {
    ScoredClassifier::new(
        identity,
        Arc::new(ZeroTransform),
        ScoringStrategy::LabelOnly(Arc::new(FixedLabel(label))),
    )
}

fn pipeline(classifiers: Vec<ScoredClassifier>) -> Result<EnsemblePipeline> {
    let mut builder = ClassifierRegistry::builder();
    for classifier in classifiers {
        builder = builder.register(classifier);
    }
    Ok(EnsemblePipeline::new(builder.build()?))
}

// ============ Arbitration properties ============

#[test]
fn equal_confidence_keeps_earlier_registry_entry() -> Result<()> {
    let pipeline = pipeline(vec![
        prob("a", "positive", 0.80),
        prob("b", "negative", 0.80),
    ])?;

    let output = pipeline.predict("some review")?;
    assert_eq!(output.result.winner, "a");
    assert_eq!(output.result.label, "positive");
    assert_eq!(output.result.confidence, 0.80);
    Ok(())
}

#[test]
fn only_strict_improvement_replaces_the_best() -> Result<()> {
    let pipeline = pipeline(vec![
        prob("a", "negative", 0.40),
        prob("b", "positive", 0.90),
        prob("c", "negative", 0.90),
    ])?;

    let output = pipeline.predict("some review")?;
    assert_eq!(output.result.winner, "b");
    assert_eq!(output.result.label, "positive");
    Ok(())
}

#[test]
fn breakdown_has_exactly_one_entry_per_classifier_in_registry_order() -> Result<()> {
    let pipeline = pipeline(vec![
        prob("a", "positive", 0.40),
        margin("b", "negative", 0.0),
        label_only("c", "positive"),
    ])?;

    let output = pipeline.predict("some review")?;
    let breakdown = &output.result.breakdown;
    assert_eq!(breakdown.len(), 3);
    let ids: Vec<_> = breakdown.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert!(breakdown
        .iter()
        .all(|&(_, c)| (0.0..=1.0).contains(&c)));
    assert_eq!(output.result.confidence_for("b"), Some(0.5));
    assert_eq!(output.result.confidence_for("missing"), None);
    Ok(())
}

#[test]
fn repeated_calls_are_deterministic() -> Result<()> {
    let pipeline = pipeline(vec![
        margin("a", "negative", 1.3),
        prob("b", "positive", 0.72),
        label_only("c", "neutral"),
    ])?;

    let first = pipeline.predict("the same review")?;
    let second = pipeline.predict("the same review")?;
    assert_eq!(first.result.label, second.result.label);
    assert_eq!(first.result.confidence, second.result.confidence);
    assert_eq!(first.result.winner, second.result.winner);
    assert_eq!(first.result.breakdown, second.result.breakdown);
    Ok(())
}

#[test]
fn margin_of_zero_scores_exactly_half() -> Result<()> {
    let pipeline = pipeline(vec![margin("svm", "positive", 0.0)])?;

    let output = pipeline.predict("anything")?;
    assert_eq!(output.result.confidence, 0.5);
    Ok(())
}

#[test]
fn label_only_classifier_always_reports_full_confidence() -> Result<()> {
    let pipeline = pipeline(vec![label_only("rules", "negative")])?;

    for text in ["", "short", "a much longer review about a movie"] {
        let output = pipeline.predict(text)?;
        assert_eq!(output.result.confidence, 1.0);
        assert_eq!(output.result.label, "negative");
    }
    Ok(())
}

#[test]
fn label_only_wins_ties_against_later_certain_classifiers() -> Result<()> {
    let pipeline = pipeline(vec![
        label_only("rules", "negative"),
        prob("lr", "positive", 1.0),
    ])?;

    let output = pipeline.predict("anything")?;
    assert_eq!(output.result.winner, "rules");
    Ok(())
}

#[test]
fn empty_registry_is_an_error() -> Result<()> {
    let pipeline = EnsemblePipeline::new(ClassifierRegistry::builder().build()?);

    let err = pipeline.predict("some review").unwrap_err();
    assert!(matches!(err, EnsembleError::EmptyEnsemble));
    Ok(())
}

#[test]
fn one_failing_classifier_fails_the_whole_call() -> Result<()> {
    let failing = ScoredClassifier::new(
        "b",
        Arc::new(ZeroTransform),
        ScoringStrategy::Probability(Arc::new(Failing)),
    );
    let pipeline = pipeline(vec![prob("a", "positive", 0.99), failing])?;

    let err = pipeline.predict("some review").unwrap_err();
    match err {
        EnsembleError::ClassifierFailure { identity, message } => {
            assert_eq!(identity, "b");
            assert!(message.contains("model exploded"));
        }
        other => panic!("expected ClassifierFailure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn batch_results_match_single_text_results() -> Result<()> {
    let pipeline = pipeline(vec![
        prob("a", "positive", 0.60),
        margin("b", "negative", 2.0),
    ])?;

    let texts: &[&str] = &["first review", "second review", "third review"];
    let batch = pipeline.predict(texts)?;
    assert_eq!(batch.stats.items_processed, 3);

    for entry in batch.results {
        let single = pipeline.predict(entry.text.as_str())?;
        let batched = entry.result?;
        assert_eq!(batched.label, single.result.label);
        assert_eq!(batched.confidence, single.result.confidence);
        assert_eq!(batched.winner, single.result.winner);
    }
    Ok(())
}

#[test]
fn results_flow_into_a_sink_unchanged() -> Result<()> {
    let pipeline = pipeline(vec![prob("lr", "positive", 0.87)])?;
    let sink = MemorySink::new();

    let output = pipeline.predict("loved every minute")?;
    sink.record("my review", "Loved every minute!", &output.result)?;

    let records = sink.list()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "my review");
    assert_eq!(records[0].review, "Loved every minute!");
    assert_eq!(records[0].label, "positive");
    assert_eq!(records[0].winner, "lr");
    Ok(())
}
