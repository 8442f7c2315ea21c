//! The classifier registry: fixed at startup, read-only afterwards.

use crate::ensemble::scoring::ScoredClassifier;
use crate::error::{EnsembleError, Result};

/// An ordered, immutable collection of scored-classifier adapters.
///
/// Built once during process initialization and shared by all concurrent
/// requests without locking; nothing mutates it after [`build`] returns.
/// Iteration order is the registration order, and that order is what the
/// arbitration tie-break is defined over.
///
/// [`build`]: RegistryBuilder::build
pub struct ClassifierRegistry {
    entries: Vec<ScoredClassifier>,
}

impl std::fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.identities()).finish()
    }
}

impl ClassifierRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            entries: Vec::new(),
        }
    }

    /// Number of registered classifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no classifiers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classifier identities in registry order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ScoredClassifier::identity)
    }

    pub(crate) fn entries(&self) -> &[ScoredClassifier] {
        &self.entries
    }
}

/// Builder for [`ClassifierRegistry`].
///
/// Registration order becomes registry order.
pub struct RegistryBuilder {
    entries: Vec<ScoredClassifier>,
}

impl RegistryBuilder {
    /// Append a classifier. Order of registration is preserved.
    pub fn register(mut self, classifier: ScoredClassifier) -> Self {
        tracing::debug!(classifier = classifier.identity(), "registering classifier");
        self.entries.push(classifier);
        self
    }

    /// Finalize the registry.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::DuplicateClassifier`] if two entries share an
    /// identity; identities must be unique within a registry.
    pub fn build(self) -> Result<ClassifierRegistry> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i]
                .iter()
                .any(|earlier| earlier.identity() == entry.identity())
            {
                return Err(EnsembleError::DuplicateClassifier(
                    entry.identity().to_string(),
                ));
            }
        }
        tracing::debug!(classifiers = self.entries.len(), "registry built");
        Ok(ClassifierRegistry {
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::scoring::ScoringStrategy;
    use crate::error::Result as CrateResult;
    use crate::features::{FeatureTransformer, FeatureVector};
    use crate::models::LabelClassifier;
    use candle_core::Device;
    use std::sync::Arc;

    struct ZeroTransform;

    impl FeatureTransformer for ZeroTransform {
        fn transform(&self, _cleaned_text: &str) -> CrateResult<FeatureVector> {
            FeatureVector::from_values(vec![0.0], &Device::Cpu)
        }

        fn dimension(&self) -> usize {
            1
        }
    }

    struct Constant;

    impl LabelClassifier for Constant {
        fn predict(&self, _features: &FeatureVector) -> CrateResult<String> {
            Ok("positive".to_string())
        }
    }

    fn adapter(identity: &str) -> ScoredClassifier {
        ScoredClassifier::new(
            identity,
            Arc::new(ZeroTransform),
            ScoringStrategy::LabelOnly(Arc::new(Constant)),
        )
    }

    #[test]
    fn identities_preserve_registration_order() {
        let registry = ClassifierRegistry::builder()
            .register(adapter("svm"))
            .register(adapter("naive_bayes"))
            .register(adapter("logistic_regression"))
            .build()
            .unwrap();
        let ids: Vec<_> = registry.identities().collect();
        assert_eq!(ids, ["svm", "naive_bayes", "logistic_regression"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_identity_is_rejected_at_build() {
        let err = ClassifierRegistry::builder()
            .register(adapter("svm"))
            .register(adapter("svm"))
            .build()
            .unwrap_err();
        assert!(matches!(err, EnsembleError::DuplicateClassifier(id) if id == "svm"));
    }

    #[test]
    fn debug_lists_identities() {
        let registry = ClassifierRegistry::builder()
            .register(adapter("svm"))
            .register(adapter("naive_bayes"))
            .build()
            .unwrap();
        assert_eq!(format!("{registry:?}"), r#"["svm", "naive_bayes"]"#);
    }

    #[test]
    fn empty_registry_builds() {
        let registry = ClassifierRegistry::builder().build().unwrap();
        assert!(registry.is_empty());
    }
}
