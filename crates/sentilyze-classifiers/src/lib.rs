//! Sentilyze Classifiers
//!
//! Text normalization and pretrained sentiment models.
//!
//! Raw text goes through a fixed pipeline before it reaches any model:
//! - URLs and non-letter characters are removed, the rest lowercased
//! - English stopwords are dropped and the remaining words Porter-stemmed
//! - The normalized text is turned into a TF-IDF feature row
//!
//! Three classifier kinds are supported (multinomial naive Bayes, linear SVM
//! and logistic regression), loaded from JSON artifacts into an immutable
//! [`ModelContext`] and run by the [`InferenceOrchestrator`].

pub mod classifier;
pub mod config;
pub mod linear_svm;
pub mod logistic_regression;
pub mod model_loader;
pub mod naive_bayes;
pub mod normalizer;
pub mod pipeline;
pub mod registry;
pub mod stemmer;
pub mod stopwords;
pub mod vectorizer;

pub use classifier::{LabelModel, LinearWeights, LoadedClassifier, ProbabilisticModel};
pub use config::{FailurePolicy, Profile, SentimentConfig, StopwordSource};
pub use model_loader::{load_model, load_vectorizer, ModelArtifact, VECTORIZER_ARTIFACT};
pub use normalizer::TextNormalizer;
pub use pipeline::{infer, InferenceOrchestrator, InferenceReport, ModelOutcome, Outcomes};
pub use registry::{ModelContext, SharedContext};
pub use stemmer::PorterStemmer;
pub use stopwords::StopwordSet;
pub use vectorizer::{FeatureVector, Norm, TfidfArtifact, TfidfVectorizer, Vectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{LabelModel, LoadedClassifier, ProbabilisticModel};
    pub use crate::config::{FailurePolicy, SentimentConfig};
    pub use crate::normalizer::TextNormalizer;
    pub use crate::pipeline::{InferenceOrchestrator, InferenceReport, ModelOutcome};
    pub use crate::registry::ModelContext;
    pub use crate::vectorizer::{FeatureVector, Vectorizer};
}
