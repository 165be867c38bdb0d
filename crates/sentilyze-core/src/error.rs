//! Error types for Sentilyze

/// Result type alias using Sentilyze's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sentilyze operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No text was submitted for analysis
    #[error("no input text provided")]
    EmptyInput,

    /// Analysis was triggered with no model selected
    #[error("no model selected")]
    NoModelSelected,

    /// A model artifact or linguistic resource is missing or corrupt
    #[error("failed to load {resource}: {reason}")]
    ResourceLoad { resource: String, reason: String },

    /// A model failed while predicting
    #[error("inference failed for {model}: {reason}")]
    Inference { model: String, reason: String },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new resource load error
    pub fn resource_load(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new inference error
    pub fn inference(model: impl Into<String>, reason: impl ToString) -> Self {
        Self::Inference {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is a user input problem that should be reported
    /// as a message rather than treated as a failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::NoModelSelected)
    }

    /// Message shown to the end user for validation errors.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::EmptyInput => Some("Please enter some text to analyze."),
            Self::NoModelSelected => Some("Select at least one model to analyze."),
            _ => None,
        }
    }
}
