//! Classifier traits and common types
//!
//! Models come in two capability variants: label-only models implement
//! [`LabelModel`], models that also estimate class probabilities implement
//! [`ProbabilisticModel`]. A loaded model is wrapped in [`LoadedClassifier`],
//! whose variant fixes the shape of its [`PredictionResult`].

use crate::vectorizer::FeatureVector;
use sentilyze_core::{Error, PredictionResult, Result, Sentiment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A model that predicts a class label
pub trait LabelModel: Send + Sync {
    /// Model name, used in error messages and logs
    fn name(&self) -> &str;

    /// Class values, in the order probabilities are reported
    fn classes(&self) -> &[i64];

    /// Number of features the model was trained on
    fn num_features(&self) -> usize;

    /// Predict the class value for one feature row
    fn predict(&self, features: &FeatureVector) -> Result<i64>;
}

/// A model that also estimates class probabilities
pub trait ProbabilisticModel: LabelModel {
    /// Probability per class, aligned with [`LabelModel::classes`]
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;
}

/// A pretrained classifier, tagged by capability
#[derive(Clone)]
pub enum LoadedClassifier {
    /// Reports a label only
    LabelOnly(Arc<dyn LabelModel>),

    /// Reports a label and the probability of that label
    Probabilistic(Arc<dyn ProbabilisticModel>),
}

impl LoadedClassifier {
    pub fn label_only(model: impl LabelModel + 'static) -> Self {
        Self::LabelOnly(Arc::new(model))
    }

    pub fn probabilistic(model: impl ProbabilisticModel + 'static) -> Self {
        Self::Probabilistic(Arc::new(model))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::LabelOnly(model) => model.name(),
            Self::Probabilistic(model) => model.name(),
        }
    }

    pub fn num_features(&self) -> usize {
        match self {
            Self::LabelOnly(model) => model.num_features(),
            Self::Probabilistic(model) => model.num_features(),
        }
    }

    /// Whether predictions carry a confidence
    pub fn reports_confidence(&self) -> bool {
        matches!(self, Self::Probabilistic(_))
    }

    /// Predict a label, plus the probability of the predicted class for
    /// probabilistic models. The probability is read at the predicted
    /// class's index, not taken as the maximum.
    pub fn predict(&self, features: &FeatureVector, positive_class: i64) -> Result<PredictionResult> {
        match self {
            Self::LabelOnly(model) => {
                let class = model.predict(features)?;
                Ok(PredictionResult::label_only(Sentiment::from_class(
                    class,
                    positive_class,
                )))
            }
            Self::Probabilistic(model) => {
                let class = model.predict(features)?;
                let probabilities = model.predict_proba(features)?;

                let index = model
                    .classes()
                    .iter()
                    .position(|&c| c == class)
                    .ok_or_else(|| {
                        Error::inference(model.name(), format!("predicted unknown class {class}"))
                    })?;
                let confidence = *probabilities.get(index).ok_or_else(|| {
                    Error::inference(
                        model.name(),
                        format!(
                            "{} probabilities for {} classes",
                            probabilities.len(),
                            model.classes().len()
                        ),
                    )
                })?;

                Ok(PredictionResult::with_confidence(
                    Sentiment::from_class(class, positive_class),
                    confidence,
                ))
            }
        }
    }
}

impl std::fmt::Debug for LoadedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Self::LabelOnly(_) => "LabelOnly",
            Self::Probabilistic(_) => "Probabilistic",
        };
        f.debug_struct("LoadedClassifier")
            .field("variant", &variant)
            .field("name", &self.name())
            .field("num_features", &self.num_features())
            .finish()
    }
}

/// Weights of a linear model: one coefficient row per decision function.
/// Binary models have a single row; the positive side selects `classes[1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearWeights {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearWeights {
    /// Check shapes and values, returning the feature count
    pub fn validate(&self, name: &str) -> Result<usize> {
        let invalid = |reason: String| Error::resource_load(name, reason);
        let k = self.classes.len();

        if k < 2 {
            return Err(invalid(format!("expected at least 2 classes, got {k}")));
        }
        let rows = if k == 2 { 1 } else { k };
        if self.coef.len() != rows {
            return Err(invalid(format!(
                "expected {rows} coefficient rows for {k} classes, got {}",
                self.coef.len()
            )));
        }
        if self.intercept.len() != rows {
            return Err(invalid(format!(
                "expected {rows} intercepts, got {}",
                self.intercept.len()
            )));
        }

        validate_matrix(name, &self.coef)?;
        if !all_finite(&self.intercept) {
            return Err(invalid("intercept contains non-finite values".to_string()));
        }

        Ok(self.coef[0].len())
    }

    pub fn num_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    /// One score per coefficient row
    pub fn decision_function(&self, features: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| sparse_dot(features, row) + b)
            .collect()
    }

    /// Class selected by the decision scores
    pub fn class_for_scores(&self, scores: &[f64]) -> i64 {
        if scores.len() == 1 {
            if scores[0] > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            }
        } else {
            self.classes[argmax(scores)]
        }
    }
}

/// Fail with an inference error unless the row width matches the model.
pub(crate) fn check_dimension(name: &str, expected: usize, features: &FeatureVector) -> Result<()> {
    if features.dim() != expected {
        return Err(Error::inference(
            name,
            format!(
                "dimension mismatch: model expects {expected} features, got {}",
                features.dim()
            ),
        ));
    }
    Ok(())
}

/// Check that a matrix is non-empty, rectangular and finite.
pub(crate) fn validate_matrix(name: &str, rows: &[Vec<f64>]) -> Result<usize> {
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(Error::resource_load(name, "weight matrix is empty"));
    }
    if rows.iter().any(|row| row.len() != width) {
        return Err(Error::resource_load(name, "weight rows have different lengths"));
    }
    if rows.iter().any(|row| !all_finite(row)) {
        return Err(Error::resource_load(name, "weights contain non-finite values"));
    }
    Ok(width)
}

pub(crate) fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

pub(crate) fn sparse_dot(features: &FeatureVector, dense: &[f64]) -> f64 {
    features.iter().map(|(i, &x)| x * dense[i]).sum()
}

/// Index of the first maximum
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

pub(crate) fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
