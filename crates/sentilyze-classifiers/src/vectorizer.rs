//! TF-IDF vectorization over a fixed, pre-fitted vocabulary

use regex::Regex;
use sentilyze_core::{Error, NormalizedText, Result};
use serde::{Deserialize, Serialize};
use sprs::CsVec;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Sparse feature row produced by a vectorizer
pub type FeatureVector = CsVec<f64>;

/// Turns normalized text into a fixed-width feature vector
pub trait Vectorizer: Send + Sync {
    /// Vectorize a single document
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector>;

    /// Width of every vector this vectorizer produces
    fn num_features(&self) -> usize;
}

/// Row normalization applied after IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Exported parameters of a fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequencies, one per column; absent when IDF
    /// weighting was disabled
    #[serde(default)]
    pub idf: Option<Vec<f64>>,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Use presence (1.0) instead of counts
    #[serde(default)]
    pub binary: bool,

    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    pub sublinear_tf: bool,

    /// `null` disables normalization
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

impl TfidfArtifact {
    /// Artifact with default settings over the given vocabulary
    pub fn new(vocabulary: HashMap<String, usize>, idf: Option<Vec<f64>>) -> Self {
        Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            token_pattern: default_token_pattern(),
            lowercase: true,
            binary: false,
            sublinear_tf: false,
            norm: default_norm(),
        }
    }
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// TF-IDF vectorizer with a vocabulary and weights fixed at training time
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    token_regex: Regex,
    min_n: usize,
    max_n: usize,
    lowercase: bool,
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Build a vectorizer from exported parameters, validating their shape
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self> {
        let invalid = |reason: String| Error::resource_load("tfidf_vectorizer", reason);
        let num_features = artifact.vocabulary.len();

        if num_features == 0 {
            return Err(invalid("vocabulary is empty".to_string()));
        }

        let mut seen = vec![false; num_features];
        for (term, &index) in &artifact.vocabulary {
            if index >= num_features {
                return Err(invalid(format!(
                    "term '{term}' has index {index} outside 0..{num_features}"
                )));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(invalid(format!("index {index} is assigned to more than one term")));
            }
        }

        if let Some(idf) = &artifact.idf {
            if idf.len() != num_features {
                return Err(invalid(format!(
                    "idf has {} entries, vocabulary has {num_features}",
                    idf.len()
                )));
            }
            if idf.iter().any(|v| !v.is_finite()) {
                return Err(invalid("idf contains non-finite values".to_string()));
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(invalid(format!("invalid ngram_range ({min_n}, {max_n})")));
        }

        let token_regex = Regex::new(&artifact.token_pattern)
            .map_err(|e| invalid(format!("invalid token_pattern: {e}")))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            token_regex,
            min_n,
            max_n,
            lowercase: artifact.lowercase,
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    /// Load a vectorizer from a JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: TfidfArtifact = serde_json::from_str(json)
            .map_err(|e| Error::resource_load("tfidf_vectorizer", e))?;
        Self::from_artifact(artifact)
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Raw term counts per column
    fn term_counts(&self, text: &str) -> BTreeMap<usize, f64> {
        let lowered;
        let text = if self.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let tokens: Vec<&str> = self.token_regex.find_iter(text).map(|m| m.as_str()).collect();
        let mut counts = BTreeMap::new();

        for n in self.min_n..=self.max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                let index = if n == 1 {
                    self.vocabulary.get(window[0])
                } else {
                    self.vocabulary.get(&window.join(" "))
                };
                if let Some(&index) = index {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }

        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector> {
        let counts = self.term_counts(text.as_str());

        let mut indices = Vec::with_capacity(counts.len());
        let mut values = Vec::with_capacity(counts.len());
        for (index, count) in counts {
            let mut value = if self.binary {
                1.0
            } else if self.sublinear_tf {
                1.0 + count.ln()
            } else {
                count
            };
            if let Some(idf) = &self.idf {
                value *= idf[index];
            }
            indices.push(index);
            values.push(value);
        }

        let norm = match self.norm {
            Some(Norm::L2) => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => values.iter().map(|v| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        debug!(nnz = indices.len(), "Vectorized text");
        Ok(CsVec::new(self.num_features(), indices, values))
    }

    fn num_features(&self) -> usize {
        self.vocabulary.len()
    }
}
