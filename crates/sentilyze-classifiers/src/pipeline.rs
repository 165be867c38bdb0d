//! Multi-model inference
//!
//! One input is normalized and vectorized once, then each selected model
//! predicts from the shared feature row. Every model runs inside its own
//! error boundary unless the context uses [`FailurePolicy::FailFast`].

use crate::classifier::LoadedClassifier;
use crate::config::FailurePolicy;
use crate::registry::SharedContext;
use crate::vectorizer::Vectorizer;
use sentilyze_core::{
    Error, ModelHandle, ModelSelection, NormalizedText, PredictionResult, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Outcome of one model on one input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Success(PredictionResult),
    Failed { reason: String },
}

impl ModelOutcome {
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            Self::Success(prediction) => Some(prediction),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Per-model outcomes, in handle order
pub type Outcomes = BTreeMap<ModelHandle, ModelOutcome>;

/// Result of analyzing one input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Text after normalization
    pub normalized: NormalizedText,

    /// Outcome for every selected model
    pub outcomes: Outcomes,

    /// Time spent normalizing, vectorizing and predicting
    pub latency_us: u64,
}

/// Run the selected models over one normalized text.
///
/// The text is vectorized exactly once. A model missing from `models` or
/// failing at prediction time is recorded as [`ModelOutcome::Failed`] under
/// [`FailurePolicy::Isolate`], and aborts the call under
/// [`FailurePolicy::FailFast`]. A vectorizer failure always aborts.
pub fn infer(
    text: &NormalizedText,
    selected: &ModelSelection,
    vectorizer: &dyn Vectorizer,
    models: &BTreeMap<ModelHandle, LoadedClassifier>,
    positive_class: i64,
    policy: FailurePolicy,
) -> Result<Outcomes> {
    let features = vectorizer.transform(text)?;
    debug!(
        "Vectorized {} tokens into {} non-zero features",
        text.tokens().count(),
        features.nnz()
    );

    let mut outcomes = Outcomes::new();
    for handle in selected.iter() {
        let prediction = models
            .get(&handle)
            .ok_or_else(|| Error::inference(handle.artifact_name(), "model is not loaded"))
            .and_then(|model| model.predict(&features, positive_class));

        let outcome = match prediction {
            Ok(prediction) => {
                metrics::counter!(
                    "sentilyze_model_predictions_total",
                    "model" => handle.key(),
                    "outcome" => "success"
                )
                .increment(1);
                ModelOutcome::Success(prediction)
            }
            Err(e) => {
                metrics::counter!(
                    "sentilyze_model_predictions_total",
                    "model" => handle.key(),
                    "outcome" => "failed"
                )
                .increment(1);
                if policy == FailurePolicy::FailFast {
                    return Err(e);
                }
                warn!("{} failed: {}", handle, e);
                ModelOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        outcomes.insert(handle, outcome);
    }

    Ok(outcomes)
}

/// Validates requests and runs them against a loaded [`ModelContext`].
///
/// [`ModelContext`]: crate::registry::ModelContext
#[derive(Clone)]
pub struct InferenceOrchestrator {
    context: SharedContext,
}

impl InferenceOrchestrator {
    pub fn new(context: SharedContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Normalize text without running any model
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        self.context.normalizer().normalize(raw)
    }

    /// Analyze `raw` with the given models.
    ///
    /// Empty input is rejected first, then an empty model list; both checks
    /// happen before any normalization or vectorization.
    pub fn analyze(
        &self,
        raw: &str,
        models: impl IntoIterator<Item = ModelHandle>,
    ) -> Result<InferenceReport> {
        if raw.is_empty() {
            return Err(Error::EmptyInput);
        }
        let selection = ModelSelection::new(models)?;
        self.run(raw, &selection)
    }

    /// Analyze `raw` with an already validated selection
    pub fn analyze_selection(&self, raw: &str, selection: &ModelSelection) -> Result<InferenceReport> {
        if raw.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.run(raw, selection)
    }

    fn run(&self, raw: &str, selection: &ModelSelection) -> Result<InferenceReport> {
        let start = Instant::now();
        metrics::counter!("sentilyze_requests_total").increment(1);

        let normalized = self.normalize(raw);
        let outcomes = infer(
            &normalized,
            selection,
            self.context.vectorizer(),
            self.context.models(),
            self.context.positive_class(),
            self.context.failure_policy(),
        )?;

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::histogram!("sentilyze_inference_latency_us").record(latency_us as f64);

        Ok(InferenceReport {
            normalized,
            outcomes,
            latency_us,
        })
    }
}
