//! English stopword set
//!
//! The default list is the 179-word English list the training corpus was
//! filtered with. A list can also be read from a local file (one word per
//! line) or downloaded once and cached on disk.

use crate::config::StopwordSource;
use sentilyze_core::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RESOURCE: &str = "stopwords";

/// Built-in English stopword list
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Immutable set of stopwords
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The built-in English list
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOPWORDS.iter().copied())
    }

    /// Build a set from arbitrary words; words are trimmed and lowercased
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a newline separated word list
    pub fn parse(content: &str) -> Self {
        Self::from_words(content.lines())
    }

    /// Read a word list from a local file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::resource_load(RESOURCE, format!("{}: {e}", path.display())))?;
        let set = Self::parse(&content);
        if set.is_empty() {
            return Err(Error::resource_load(
                RESOURCE,
                format!("{} contains no words", path.display()),
            ));
        }
        info!("Loaded {} stopwords from {}", set.len(), path.display());
        Ok(set)
    }

    /// Load the list from `cache_path`, downloading it from `url` first if
    /// it is not cached yet.
    pub async fn fetch_cached(url: &str, cache_path: &Path) -> Result<Self> {
        if cache_path.exists() {
            debug!("Using cached stopwords at {}", cache_path.display());
            return Self::from_file(cache_path);
        }

        info!("Downloading stopwords from {}", url);
        let content = download(url).await?;
        let set = Self::parse(&content);
        if set.is_empty() {
            return Err(Error::resource_load(RESOURCE, format!("{url} returned no words")));
        }

        write_cache(cache_path, &content)?;
        info!("Cached {} stopwords at {}", set.len(), cache_path.display());

        Ok(set)
    }

    /// Resolve a configured source into a stopword set
    pub async fn load(source: &StopwordSource) -> Result<Self> {
        match source {
            StopwordSource::Builtin => Ok(Self::english()),
            StopwordSource::File { path } => Self::from_file(path),
            StopwordSource::Download { url, cache_dir } => {
                let cache_path = cache_file(cache_dir.as_deref(), url)?;
                Self::fetch_cached(url, &cache_path).await
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::english()
    }
}

/// Location of the cached list downloaded from `url`; one file per URL
fn cache_file(cache_dir: Option<&Path>, url: &str) -> Result<PathBuf> {
    let base = match cache_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::cache_dir()
            .map(|d| d.join("sentilyze"))
            .ok_or_else(|| Error::resource_load(RESOURCE, "no cache directory available"))?,
    };
    let key: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    Ok(base.join("stopwords").join(key))
}

fn write_cache(cache_path: &Path, content: &str) -> Result<()> {
    let cache_error =
        |e: std::io::Error| Error::resource_load(RESOURCE, format!("{}: {e}", cache_path.display()));
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent).map_err(cache_error)?;
    }
    std::fs::write(cache_path, content).map_err(cache_error)
}

async fn download(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::resource_load(RESOURCE, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::resource_load(
            RESOURCE,
            format!("{url} returned HTTP {status}"),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| Error::resource_load(RESOURCE, e))
}
