//! Text normalization pipeline
//!
//! Turns raw user text into the canonical token stream the vectorizer was
//! fitted on:
//! 1. delete URLs (`http` followed by non-whitespace), without inserting a space
//! 2. delete every character that is not an ASCII letter or whitespace
//! 3. lowercase
//! 4. split on whitespace (including the ASCII information separators)
//! 5. drop stopwords, stem everything else
//! 6. join with single spaces
//!
//! Step order and character classes must stay exactly as they are: any
//! drift turns known tokens into out-of-vocabulary ones.

use crate::stemmer::PorterStemmer;
use crate::stopwords::StopwordSet;
use regex::Regex;
use sentilyze_core::{Error, NormalizedText, Result};
use std::sync::Arc;
use tracing::debug;

/// Normalizes raw text. Cheap to clone; all state is immutable and shared.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    url_regex: Regex,
    non_alpha_regex: Regex,
    stopwords: Arc<StopwordSet>,
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    /// Create a normalizer over the given stopword set
    pub fn new(stopwords: Arc<StopwordSet>) -> Result<Self> {
        Ok(Self {
            url_regex: Regex::new(r"http[^\s\x1c-\x1f]+")
                .map_err(|e| Error::internal(format!("Failed to compile URL regex: {e}")))?,
            non_alpha_regex: Regex::new(r"[^a-zA-Z\s\x1c-\x1f]")
                .map_err(|e| Error::internal(format!("Failed to compile letter regex: {e}")))?,
            stopwords,
            stemmer: PorterStemmer::new(),
        })
    }

    /// Normalizer over the built-in English stopword list
    pub fn english() -> Result<Self> {
        Self::new(Arc::new(StopwordSet::english()))
    }

    /// Normalize `text`. Total over all inputs; text with no surviving
    /// tokens yields an empty result.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let without_urls = self.url_regex.replace_all(text, "");
        let letters_only = self.non_alpha_regex.replace_all(&without_urls, "");
        let lowered = letters_only.to_lowercase();

        let normalized = NormalizedText::from_tokens(
            lowered
                .split(is_separator)
                .filter(|token| !token.is_empty())
                .filter(|token| !self.stopwords.contains(token))
                .map(|token| self.stemmer.stem(token)),
        );

        debug!(
            input_len = text.len(),
            tokens = normalized.tokens().count(),
            "Normalized text"
        );
        normalized
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }
}

/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}
