//! Sentilyze Core
//!
//! Core types shared across Sentilyze components.
//!
//! This crate provides:
//! - Sentiment labels, model handles and per-model prediction results
//! - The normalized-text and model-selection value types
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ModelHandle, ModelSelection, NormalizedText, PredictionResult, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ModelHandle, ModelSelection, NormalizedText, PredictionResult, Sentiment};
}
