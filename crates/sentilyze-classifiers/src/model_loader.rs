//! Loading of exported model artifacts
//!
//! Each artifact is a JSON document stored as `<logical name>.json` in the
//! model directory. Classifier artifacts carry a `kind` tag naming the
//! estimator they were exported from.

use crate::classifier::{LinearWeights, LoadedClassifier};
use crate::linear_svm::LinearSvm;
use crate::logistic_regression::LogisticRegression;
use crate::naive_bayes::{MultinomialNb, NaiveBayesParams};
use crate::vectorizer::{TfidfArtifact, TfidfVectorizer};
use sentilyze_core::{Error, ModelHandle, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Logical name of the vectorizer artifact
pub const VECTORIZER_ARTIFACT: &str = "tfidf_vectorizer";

/// Exported parameters of a fitted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    MultinomialNb(NaiveBayesParams),
    LinearSvm(LinearWeights),
    LogisticRegression(LinearWeights),
}

impl ModelArtifact {
    /// Build the classifier described by this artifact
    pub fn into_classifier(self, name: &str) -> Result<LoadedClassifier> {
        Ok(match self {
            Self::MultinomialNb(params) => {
                LoadedClassifier::probabilistic(MultinomialNb::new(name, params)?)
            }
            Self::LinearSvm(weights) => LoadedClassifier::label_only(LinearSvm::new(name, weights)?),
            Self::LogisticRegression(weights) => {
                LoadedClassifier::probabilistic(LogisticRegression::new(name, weights)?)
            }
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MultinomialNb(_) => "multinomial_nb",
            Self::LinearSvm(_) => "linear_svm",
            Self::LogisticRegression(_) => "logistic_regression",
        }
    }
}

/// Artifact kind each model handle must be exported from
fn expected_kind(handle: ModelHandle) -> &'static str {
    match handle {
        ModelHandle::NaiveBayes => "multinomial_nb",
        ModelHandle::Svm => "linear_svm",
        ModelHandle::LogisticRegression => "logistic_regression",
    }
}

/// Read and parse a JSON artifact; any failure is a resource load error
fn read_artifact<T: DeserializeOwned>(name: &str, path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::resource_load(name, format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::resource_load(name, format!("{}: {e}", path.display())))
}

/// Load the TF-IDF vectorizer artifact
pub fn load_vectorizer(path: &Path) -> Result<TfidfVectorizer> {
    let artifact: TfidfArtifact = read_artifact(VECTORIZER_ARTIFACT, path)?;
    let vectorizer = TfidfVectorizer::from_artifact(artifact)?;
    info!(
        "Loaded {} from {} ({} features)",
        VECTORIZER_ARTIFACT,
        path.display(),
        crate::vectorizer::Vectorizer::num_features(&vectorizer)
    );
    Ok(vectorizer)
}

/// Load the classifier artifact for one model handle
pub fn load_model(handle: ModelHandle, path: &Path) -> Result<LoadedClassifier> {
    let name = handle.artifact_name();
    let artifact: ModelArtifact = read_artifact(name, path)?;
    let kind = artifact.kind();
    if kind != expected_kind(handle) {
        return Err(Error::resource_load(
            name,
            format!(
                "{}: expected a {} artifact, found {}",
                path.display(),
                expected_kind(handle),
                kind
            ),
        ));
    }
    let classifier = artifact.into_classifier(name)?;
    info!(
        "Loaded {} ({}) from {} ({} features, confidence: {})",
        name,
        kind,
        path.display(),
        classifier.num_features(),
        classifier.reports_confidence()
    );
    Ok(classifier)
}
