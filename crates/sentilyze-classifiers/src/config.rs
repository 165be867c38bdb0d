//! Configuration for model loading and inference

use sentilyze_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Deployment profile; selects the default artifact directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Artifacts next to the working directory
    #[default]
    Development,
    /// Artifacts inside the deployed application directory
    Deployed,
}

impl Profile {
    /// Default artifact directory for this profile
    pub fn default_model_dir(&self) -> PathBuf {
        match self {
            Self::Development => PathBuf::from("./model"),
            Self::Deployed => PathBuf::from("./sentilyze/model"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "deployed" | "production" | "prod" => Ok(Self::Deployed),
            other => Err(format!("unknown profile '{other}', expected development or deployed")),
        }
    }
}

/// Where the stopword list comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum StopwordSource {
    /// Compiled-in English list
    #[default]
    Builtin,

    /// Local file, one word per line
    File { path: PathBuf },

    /// Downloaded once and cached under `cache_dir` (or the user cache dir)
    Download {
        url: String,
        #[serde(default)]
        cache_dir: Option<PathBuf>,
    },
}

/// What to do when one of several selected models fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the failure for that model and keep the other results
    #[default]
    Isolate,

    /// Abort the whole request on the first failure
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "isolate" => Ok(Self::Isolate),
            "fail_fast" => Ok(Self::FailFast),
            other => Err(format!("unknown failure policy '{other}', expected isolate or fail_fast")),
        }
    }
}

/// Top level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Deployment profile
    #[serde(default)]
    pub profile: Profile,

    /// Explicit artifact directory; overrides the profile default
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Stopword list source
    #[serde(default)]
    pub stopwords: StopwordSource,

    /// Per-model failure handling
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Class value reported as positive sentiment
    #[serde(default = "default_positive_class")]
    pub positive_class: i64,
}

fn default_positive_class() -> i64 {
    1
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            model_dir: None,
            stopwords: StopwordSource::default(),
            failure_policy: FailurePolicy::default(),
            positive_class: default_positive_class(),
        }
    }
}

impl SentimentConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid configuration: {e}")))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Load from file if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Directory the artifacts are read from
    pub fn resolved_model_dir(&self) -> PathBuf {
        self.model_dir
            .clone()
            .unwrap_or_else(|| self.profile.default_model_dir())
    }

    /// Path of the artifact with the given logical name
    pub fn artifact_path(&self, logical_name: &str) -> PathBuf {
        self.resolved_model_dir().join(format!("{logical_name}.json"))
    }
}
