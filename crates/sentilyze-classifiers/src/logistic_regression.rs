//! Logistic regression

use crate::classifier::{
    check_dimension, sigmoid, softmax, LabelModel, LinearWeights, ProbabilisticModel,
};
use crate::vectorizer::FeatureVector;
use sentilyze_core::Result;

/// Logistic regression classifier. Binary models use the logistic
/// function, multi-class models a softmax over the decision scores.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    name: String,
    weights: LinearWeights,
}

impl LogisticRegression {
    pub fn new(name: impl Into<String>, weights: LinearWeights) -> Result<Self> {
        let name = name.into();
        weights.validate(&name)?;
        Ok(Self { name, weights })
    }

    fn scores(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        check_dimension(&self.name, self.num_features(), features)?;
        Ok(self.weights.decision_function(features))
    }
}

impl LabelModel for LogisticRegression {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[i64] {
        &self.weights.classes
    }

    fn num_features(&self) -> usize {
        self.weights.num_features()
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64> {
        let scores = self.scores(features)?;
        Ok(self.weights.class_for_scores(&scores))
    }
}

impl ProbabilisticModel for LogisticRegression {
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let scores = self.scores(features)?;
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            Ok(vec![1.0 - p, p])
        } else {
            Ok(softmax(&scores))
        }
    }
}
