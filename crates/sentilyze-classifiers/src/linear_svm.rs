//! Linear support vector machine (label only)

use crate::classifier::{check_dimension, LabelModel, LinearWeights};
use crate::vectorizer::FeatureVector;
use sentilyze_core::Result;

/// Linear SVM without probability calibration
#[derive(Debug, Clone)]
pub struct LinearSvm {
    name: String,
    weights: LinearWeights,
}

impl LinearSvm {
    pub fn new(name: impl Into<String>, weights: LinearWeights) -> Result<Self> {
        let name = name.into();
        weights.validate(&name)?;
        Ok(Self { name, weights })
    }
}

impl LabelModel for LinearSvm {
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
        check_dimension(&self.name, self.num_features(), features)?;
        let scores = self.weights.decision_function(features);
        Ok(self.weights.class_for_scores(&scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentilyze_core::Error;
    use sprs::CsVec;

    #[test]
    fn test_binary_decision() {
        let svm = LinearSvm::new(
            "svm_model",
            LinearWeights {
                classes: vec![0, 1],
                coef: vec![vec![-2.0, 2.0]],
                intercept: vec![0.1],
            },
        )
        .unwrap();

        assert_eq!(svm.predict(&CsVec::new(2, vec![1], vec![1.0])).unwrap(), 1);
        assert_eq!(svm.predict(&CsVec::new(2, vec![0], vec![1.0])).unwrap(), 0);
        // score of exactly zero is the negative side
        let zero = LinearSvm::new(
            "svm_model",
            LinearWeights {
                classes: vec![0, 1],
                coef: vec![vec![1.0, 1.0]],
                intercept: vec![0.0],
            },
        )
        .unwrap();
        assert_eq!(zero.predict(&CsVec::new(2, vec![], vec![])).unwrap(), 0);
    }

    #[test]
    fn test_multiclass_argmax() {
        let svm = LinearSvm::new(
            "svm_model",
            LinearWeights {
                classes: vec![0, 2, 4],
                coef: vec![vec![1.0], vec![3.0], vec![2.0]],
                intercept: vec![0.0, 0.0, 0.0],
            },
        )
        .unwrap();
        assert_eq!(svm.predict(&CsVec::new(1, vec![0], vec![1.0])).unwrap(), 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let svm = LinearSvm::new(
            "svm_model",
            LinearWeights {
                classes: vec![0, 1],
                coef: vec![vec![1.0, 1.0]],
                intercept: vec![0.0],
            },
        )
        .unwrap();
        assert!(matches!(
            svm.predict(&CsVec::new(5, vec![], vec![])),
            Err(Error::Inference { .. })
        ));
    }
}
