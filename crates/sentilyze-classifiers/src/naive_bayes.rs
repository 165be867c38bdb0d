//! Multinomial Naive Bayes

use crate::classifier::{
    all_finite, argmax, check_dimension, softmax, sparse_dot, validate_matrix, LabelModel,
    ProbabilisticModel,
};
use crate::vectorizer::FeatureVector;
use sentilyze_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Exported parameters of a fitted multinomial Naive Bayes model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    pub classes: Vec<i64>,
    pub class_log_prior: Vec<f64>,
    /// One row of per-feature log probabilities per class
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Multinomial Naive Bayes classifier
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    name: String,
    params: NaiveBayesParams,
}

impl MultinomialNb {
    pub fn new(name: impl Into<String>, params: NaiveBayesParams) -> Result<Self> {
        let name = name.into();
        let k = params.classes.len();

        if k < 2 {
            return Err(Error::resource_load(
                &name,
                format!("expected at least 2 classes, got {k}"),
            ));
        }
        if params.class_log_prior.len() != k || params.feature_log_prob.len() != k {
            return Err(Error::resource_load(
                &name,
                format!(
                    "{k} classes but {} priors and {} feature rows",
                    params.class_log_prior.len(),
                    params.feature_log_prob.len()
                ),
            ));
        }
        if !all_finite(&params.class_log_prior) {
            return Err(Error::resource_load(&name, "class_log_prior contains non-finite values"));
        }
        validate_matrix(&name, &params.feature_log_prob)?;

        Ok(Self { name, params })
    }

    /// Unnormalized log posterior per class
    fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        check_dimension(&self.name, self.num_features(), features)?;
        Ok(self
            .params
            .feature_log_prob
            .iter()
            .zip(&self.params.class_log_prior)
            .map(|(row, prior)| prior + sparse_dot(features, row))
            .collect())
    }
}

impl LabelModel for MultinomialNb {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[i64] {
        &self.params.classes
    }

    fn num_features(&self) -> usize {
        self.params.feature_log_prob[0].len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64> {
        let jll = self.joint_log_likelihood(features)?;
        Ok(self.params.classes[argmax(&jll)])
    }
}

impl ProbabilisticModel for MultinomialNb {
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let jll = self.joint_log_likelihood(features)?;
        Ok(softmax(&jll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::CsVec;

    fn model() -> MultinomialNb {
        // feature 0 is "terribl", feature 1 is "love"
        MultinomialNb::new(
            "naive_bayes_model",
            NaiveBayesParams {
                classes: vec![0, 1],
                class_log_prior: vec![0.5f64.ln(), 0.5f64.ln()],
                feature_log_prob: vec![
                    vec![0.8f64.ln(), 0.2f64.ln()],
                    vec![0.2f64.ln(), 0.8f64.ln()],
                ],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_predicts_most_likely_class() {
        let m = model();
        let negative = CsVec::new(2, vec![0], vec![1.0]);
        let positive = CsVec::new(2, vec![1], vec![1.0]);

        assert_eq!(m.predict(&negative).unwrap(), 0);
        assert_eq!(m.predict(&positive).unwrap(), 1);
    }

    #[test]
    fn test_probabilities() {
        let m = model();
        let negative = CsVec::new(2, vec![0], vec![1.0]);

        let p = m.predict_proba(&negative).unwrap();
        assert!((p[0] - 0.8).abs() < 1e-12);
        assert!((p[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_row_falls_back_to_prior() {
        let m = model();
        let empty = CsVec::new(2, vec![], vec![]);
        let p = m.predict_proba(&empty).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-12);
        // ties resolve to the first class
        assert_eq!(m.predict(&empty).unwrap(), 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let m = model();
        let wide = CsVec::new(3, vec![2], vec![1.0]);
        assert!(matches!(m.predict(&wide), Err(Error::Inference { .. })));
    }

    #[test]
    fn test_rejects_inconsistent_params() {
        let params = NaiveBayesParams {
            classes: vec![0, 1],
            class_log_prior: vec![0.0],
            feature_log_prob: vec![vec![0.0], vec![0.0]],
        };
        assert!(matches!(
            MultinomialNb::new("naive_bayes_model", params),
            Err(Error::ResourceLoad { .. })
        ));
    }
}
