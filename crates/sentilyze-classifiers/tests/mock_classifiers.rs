//! Mock models and vectorizers for testing
//!
//! Provides configurable implementations of the model and vectorizer traits
//! for exercising the orchestrator without trained artifacts.

use sentilyze_classifiers::{
    FailurePolicy, FeatureVector, InferenceOrchestrator, LabelModel, LoadedClassifier,
    ModelContext, ModelOutcome, ProbabilisticModel, TextNormalizer, Vectorizer,
};
use sentilyze_core::{Error, ModelHandle, NormalizedText, Result, Sentiment};
use sprs::CsVec;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A configurable mock model
pub struct MockModel {
    name: String,
    class: i64,
    probabilities: Vec<f64>,
    num_features: usize,
    call_count: AtomicU32,
}

impl MockModel {
    /// Create a mock that predicts class 1 over 4 features
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            class: 1,
            probabilities: vec![0.25, 0.75],
            num_features: 4,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the class this model will predict
    pub fn with_class(mut self, class: i64) -> Self {
        self.class = class;
        self
    }

    /// Set the probabilities for classes `[0, 1]`
    pub fn with_probabilities(mut self, probabilities: &[f64]) -> Self {
        self.probabilities = probabilities.to_vec();
        self
    }

    pub fn with_num_features(mut self, num_features: usize) -> Self {
        self.num_features = num_features;
        self
    }

    /// Number of times predict was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl LabelModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if features.dim() != self.num_features {
            return Err(Error::inference(&self.name, "dimension mismatch"));
        }
        Ok(self.class)
    }
}

impl ProbabilisticModel for MockModel {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>> {
        Ok(self.probabilities.clone())
    }
}

/// A model that always fails
pub struct FailingModel {
    name: String,
    error_message: String,
}

impl FailingModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            error_message: "Simulated model failure".to_string(),
        }
    }

    /// Set a custom error message
    pub fn with_error(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }
}

impl LabelModel for FailingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn num_features(&self) -> usize {
        4
    }

    fn predict(&self, _features: &FeatureVector) -> Result<i64> {
        Err(Error::inference(&self.name, &self.error_message))
    }
}

/// A vectorizer that counts its calls and emits one fixed row
pub struct MockVectorizer {
    num_features: usize,
    call_count: AtomicU32,
}

impl MockVectorizer {
    pub fn new(num_features: usize) -> Self {
        Self {
            num_features,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Vectorizer for MockVectorizer {
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let tokens = text.tokens().count().min(self.num_features);
        Ok(CsVec::new(
            self.num_features,
            (0..tokens).collect(),
            vec![1.0; tokens],
        ))
    }

    fn num_features(&self) -> usize {
        self.num_features
    }
}

fn orchestrator_with(
    vectorizer: Arc<MockVectorizer>,
    models: Vec<(ModelHandle, LoadedClassifier)>,
    policy: FailurePolicy,
) -> InferenceOrchestrator {
    let context = ModelContext::new(TextNormalizer::english().unwrap(), vectorizer, models)
        .with_failure_policy(policy);
    InferenceOrchestrator::new(Arc::new(context))
}

#[test]
fn test_each_selected_model_runs_once() {
    let vectorizer = Arc::new(MockVectorizer::new(4));
    let nb = Arc::new(MockModel::new("nb").with_class(0).with_probabilities(&[0.9, 0.1]));
    let svm = Arc::new(MockModel::new("svm"));
    let lr = Arc::new(MockModel::new("lr"));

    let orchestrator = orchestrator_with(
        vectorizer.clone(),
        vec![
            (ModelHandle::NaiveBayes, LoadedClassifier::Probabilistic(nb.clone())),
            (ModelHandle::Svm, LoadedClassifier::LabelOnly(svm.clone())),
            (ModelHandle::LogisticRegression, LoadedClassifier::Probabilistic(lr.clone())),
        ],
        FailurePolicy::Isolate,
    );

    let report = orchestrator
        .analyze("Loved every minute", [ModelHandle::NaiveBayes, ModelHandle::Svm])
        .unwrap();

    assert_eq!(vectorizer.call_count(), 1);
    assert_eq!(nb.call_count(), 1);
    assert_eq!(svm.call_count(), 1);
    assert_eq!(lr.call_count(), 0);
    assert_eq!(report.outcomes.len(), 2);

    let nb_result = report.outcomes[&ModelHandle::NaiveBayes].prediction().unwrap();
    assert_eq!(nb_result.label, Sentiment::Negative);
    assert_eq!(nb_result.confidence, Some(0.9));

    let svm_result = report.outcomes[&ModelHandle::Svm].prediction().unwrap();
    assert_eq!(svm_result.label, Sentiment::Positive);
    assert_eq!(svm_result.confidence, None);
}

#[test]
fn test_repeated_analysis_is_deterministic() {
    let orchestrator = orchestrator_with(
        Arc::new(MockVectorizer::new(4)),
        vec![(
            ModelHandle::LogisticRegression,
            LoadedClassifier::probabilistic(MockModel::new("lr")),
        )],
        FailurePolicy::Isolate,
    );

    let first = orchestrator
        .analyze("Not bad at all", [ModelHandle::LogisticRegression])
        .unwrap();
    let second = orchestrator
        .analyze("Not bad at all", [ModelHandle::LogisticRegression])
        .unwrap();

    assert_eq!(first.normalized, second.normalized);
    assert_eq!(first.outcomes, second.outcomes);
}

#[test]
fn test_empty_input_skips_vectorizer() {
    let vectorizer = Arc::new(MockVectorizer::new(4));
    let orchestrator = orchestrator_with(
        vectorizer.clone(),
        vec![(ModelHandle::Svm, LoadedClassifier::label_only(MockModel::new("svm")))],
        FailurePolicy::Isolate,
    );

    for selection in [vec![ModelHandle::Svm], vec![], ModelHandle::ALL.to_vec()] {
        assert!(matches!(
            orchestrator.analyze("", selection),
            Err(Error::EmptyInput)
        ));
    }
    assert!(matches!(
        orchestrator.analyze("some text", Vec::<ModelHandle>::new()),
        Err(Error::NoModelSelected)
    ));
    assert_eq!(vectorizer.call_count(), 0);
}

#[test]
fn test_failing_model_is_isolated() {
    let orchestrator = orchestrator_with(
        Arc::new(MockVectorizer::new(4)),
        vec![
            (
                ModelHandle::NaiveBayes,
                LoadedClassifier::probabilistic(MockModel::new("nb")),
            ),
            (
                ModelHandle::Svm,
                LoadedClassifier::label_only(FailingModel::new("svm").with_error("weights corrupted")),
            ),
        ],
        FailurePolicy::Isolate,
    );

    let report = orchestrator.analyze("Fine film", ModelHandle::ALL).unwrap();

    assert!(report.outcomes[&ModelHandle::NaiveBayes].is_success());
    assert!(matches!(
        &report.outcomes[&ModelHandle::Svm],
        ModelOutcome::Failed { reason } if reason.contains("weights corrupted")
    ));
    // not loaded at all
    assert!(!report.outcomes[&ModelHandle::LogisticRegression].is_success());
}

#[test]
fn test_failing_model_fails_fast() {
    let nb = Arc::new(MockModel::new("nb"));
    let orchestrator = orchestrator_with(
        Arc::new(MockVectorizer::new(4)),
        vec![
            (ModelHandle::NaiveBayes, LoadedClassifier::Probabilistic(nb.clone())),
            (ModelHandle::Svm, LoadedClassifier::label_only(FailingModel::new("svm"))),
        ],
        FailurePolicy::FailFast,
    );

    let err = orchestrator
        .analyze("Fine film", [ModelHandle::NaiveBayes, ModelHandle::Svm])
        .unwrap_err();
    assert!(matches!(err, Error::Inference { .. }));
    assert!(!err.is_validation());
    assert_eq!(nb.call_count(), 1);
}

#[test]
fn test_dimension_mismatch_is_inference_error() {
    let orchestrator = orchestrator_with(
        Arc::new(MockVectorizer::new(4)),
        vec![(
            ModelHandle::Svm,
            LoadedClassifier::label_only(MockModel::new("svm").with_num_features(10)),
        )],
        FailurePolicy::FailFast,
    );

    assert!(matches!(
        orchestrator.analyze("Fine film", [ModelHandle::Svm]),
        Err(Error::Inference { .. })
    ));
}
