//! Model context initialization
//!
//! Everything inference needs (normalizer, vectorizer, classifiers) is
//! loaded once into an immutable [`ModelContext`] before any request is
//! served, and shared read-only afterwards.

use crate::classifier::LoadedClassifier;
use crate::config::{FailurePolicy, SentimentConfig};
use crate::model_loader::{load_model, load_vectorizer, VECTORIZER_ARTIFACT};
use crate::normalizer::TextNormalizer;
use crate::stopwords::StopwordSet;
use crate::vectorizer::Vectorizer;
use sentilyze_core::{ModelHandle, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handle to a loaded context
pub type SharedContext = Arc<ModelContext>;

/// Immutable resources for normalization and inference
pub struct ModelContext {
    normalizer: TextNormalizer,
    vectorizer: Arc<dyn Vectorizer>,
    models: BTreeMap<ModelHandle, LoadedClassifier>,
    positive_class: i64,
    failure_policy: FailurePolicy,
}

impl ModelContext {
    /// Assemble a context from already constructed parts
    pub fn new(
        normalizer: TextNormalizer,
        vectorizer: Arc<dyn Vectorizer>,
        models: impl IntoIterator<Item = (ModelHandle, LoadedClassifier)>,
    ) -> Self {
        Self {
            normalizer,
            vectorizer,
            models: models.into_iter().collect(),
            positive_class: 1,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_positive_class(mut self, class: i64) -> Self {
        self.positive_class = class;
        self
    }

    /// Load the vectorizer and every model from the configured directory.
    /// Any missing or corrupt artifact fails the whole load.
    pub fn load(config: &SentimentConfig, stopwords: StopwordSet) -> Result<Self> {
        let model_dir = config.resolved_model_dir();
        info!("Loading model artifacts from {}", model_dir.display());

        let normalizer = TextNormalizer::new(Arc::new(stopwords))?;
        let vectorizer = load_vectorizer(&config.artifact_path(VECTORIZER_ARTIFACT))?;
        let num_features = vectorizer.num_features();

        let mut models = BTreeMap::new();
        for handle in ModelHandle::ALL {
            let model = load_model(handle, &config.artifact_path(handle.artifact_name()))?;
            if model.num_features() != num_features {
                // reported per request by the inference error boundary
                warn!(
                    "{} expects {} features but the vectorizer produces {}",
                    handle,
                    model.num_features(),
                    num_features
                );
            }
            models.insert(handle, model);
        }

        info!("Model context initialized with {} models", models.len());

        Ok(Self::new(normalizer, Arc::new(vectorizer), models)
            .with_failure_policy(config.failure_policy)
            .with_positive_class(config.positive_class))
    }

    /// Resolve the configured stopword source, then load all artifacts
    pub async fn initialize(config: &SentimentConfig) -> Result<Self> {
        let stopwords = StopwordSet::load(&config.stopwords).await?;
        Self::load(config, stopwords)
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn model(&self, handle: ModelHandle) -> Option<&LoadedClassifier> {
        self.models.get(&handle)
    }

    pub fn models(&self) -> &BTreeMap<ModelHandle, LoadedClassifier> {
        &self.models
    }

    pub fn positive_class(&self) -> i64 {
        self.positive_class
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}
