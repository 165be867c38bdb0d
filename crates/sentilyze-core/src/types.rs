//! Core types for Sentilyze

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Sentiment label predicted by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Map a numeric class to a label: the positive class is `Positive`,
    /// every other class is `Negative`.
    pub fn from_class(class: i64, positive_class: i64) -> Self {
        if class == positive_class {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one of the pretrained sentiment models
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelHandle {
    NaiveBayes,
    Svm,
    LogisticRegression,
}

impl ModelHandle {
    /// All handles, in presentation order
    pub const ALL: [ModelHandle; 3] = [Self::NaiveBayes, Self::Svm, Self::LogisticRegression];

    /// Logical artifact name the model is stored under
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "naive_bayes_model",
            Self::Svm => "svm_model",
            Self::LogisticRegression => "logistic_regression_model",
        }
    }

    /// Human readable model name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "Naive Bayes",
            Self::Svm => "SVM",
            Self::LogisticRegression => "Logistic Regression",
        }
    }

    /// Stable key used in configuration and metrics labels
    pub fn key(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "naive_bayes",
            Self::Svm => "svm",
            Self::LogisticRegression => "logistic_regression",
        }
    }
}

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelHandle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "nb" | "naive_bayes" | "naivebayes" => Ok(Self::NaiveBayes),
            "svm" => Ok(Self::Svm),
            "lr" | "logistic_regression" | "logisticregression" => Ok(Self::LogisticRegression),
            other => Err(format!(
                "unknown model '{other}', expected one of: naive_bayes, svm, logistic_regression"
            )),
        }
    }
}

/// Prediction made by a single model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted sentiment
    pub label: Sentiment,

    /// Probability of the predicted class, for models that estimate one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PredictionResult {
    /// Result from a model without probability estimates
    pub fn label_only(label: Sentiment) -> Self {
        Self {
            label,
            confidence: None,
        }
    }

    /// Result carrying the probability of the predicted class
    pub fn with_confidence(label: Sentiment, confidence: f64) -> Self {
        Self {
            label,
            confidence: Some(confidence),
        }
    }
}

/// Text that has been through the normalization pipeline: lowercase stems
/// joined by single spaces, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Wrap text that is already in normalized form.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Join normalized tokens with single spaces.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(token);
        }
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the space separated tokens
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A non-empty set of models selected for one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelSelection(BTreeSet<ModelHandle>);

impl ModelSelection {
    /// Build a selection, rejecting an empty one
    pub fn new(handles: impl IntoIterator<Item = ModelHandle>) -> Result<Self> {
        let set: BTreeSet<_> = handles.into_iter().collect();
        if set.is_empty() {
            return Err(Error::NoModelSelected);
        }
        Ok(Self(set))
    }

    /// Build a selection from the three independent model toggles
    pub fn from_flags(naive_bayes: bool, svm: bool, logistic_regression: bool) -> Result<Self> {
        let flags = [naive_bayes, svm, logistic_regression];
        Self::new(
            ModelHandle::ALL
                .into_iter()
                .zip(flags)
                .filter_map(|(handle, on)| on.then_some(handle)),
        )
    }

    /// Every known model
    pub fn all() -> Self {
        Self(ModelHandle::ALL.into_iter().collect())
    }

    pub fn contains(&self, handle: ModelHandle) -> bool {
        self.0.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A constructed selection always holds at least one model
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected handles in presentation order
    pub fn iter(&self) -> impl Iterator<Item = ModelHandle> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_from_class() {
        assert_eq!(Sentiment::from_class(1, 1), Sentiment::Positive);
        assert_eq!(Sentiment::from_class(0, 1), Sentiment::Negative);
        assert_eq!(Sentiment::from_class(4, 1), Sentiment::Negative);
        assert_eq!(Sentiment::from_class(4, 4), Sentiment::Positive);
    }

    #[test]
    fn test_model_handle_parse() {
        assert_eq!("nb".parse::<ModelHandle>().unwrap(), ModelHandle::NaiveBayes);
        assert_eq!("SVM".parse::<ModelHandle>().unwrap(), ModelHandle::Svm);
        assert_eq!(
            "logistic-regression".parse::<ModelHandle>().unwrap(),
            ModelHandle::LogisticRegression
        );
        assert!("forest".parse::<ModelHandle>().is_err());
    }

    #[test]
    fn test_model_selection_rejects_empty() {
        assert!(matches!(
            ModelSelection::new(Vec::new()),
            Err(Error::NoModelSelected)
        ));
        assert!(matches!(
            ModelSelection::from_flags(false, false, false),
            Err(Error::NoModelSelected)
        ));
    }

    #[test]
    fn test_model_selection_order() {
        let selection = ModelSelection::new([
            ModelHandle::LogisticRegression,
            ModelHandle::NaiveBayes,
            ModelHandle::LogisticRegression,
        ])
        .unwrap();

        assert_eq!(selection.len(), 2);
        assert!(!selection.is_empty());
        let handles: Vec<_> = selection.iter().collect();
        assert_eq!(
            handles,
            vec![ModelHandle::NaiveBayes, ModelHandle::LogisticRegression]
        );
    }

    #[test]
    fn test_normalized_text_from_tokens() {
        let text = NormalizedText::from_tokens(["movi", "", "terribl"]);
        assert_eq!(text.as_str(), "movi terribl");
        assert_eq!(text.tokens().count(), 2);

        assert!(NormalizedText::from_tokens(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_prediction_result_serialization() {
        let json = serde_json::to_value(PredictionResult::label_only(Sentiment::Positive)).unwrap();
        assert_eq!(json, serde_json::json!({ "label": "positive" }));

        let json =
            serde_json::to_value(PredictionResult::with_confidence(Sentiment::Negative, 0.75))
                .unwrap();
        assert_eq!(json, serde_json::json!({ "label": "negative", "confidence": 0.75 }));
    }
}
