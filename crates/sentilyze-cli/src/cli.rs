use clap::{Args, Parser, Subcommand};
use sentilyze_classifiers::{FailurePolicy, Profile};
use sentilyze_core::ModelHandle;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentilyze")]
#[command(author, version, about = "Sentiment analysis with pretrained TF-IDF models")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        env = "SENTILYZE_CONFIG",
        default_value = "sentilyze.yaml"
    )]
    pub config: PathBuf,

    /// Model artifact directory (overrides the profile default)
    #[arg(long, global = true, env = "SENTILYZE_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Deployment profile: development or deployed
    #[arg(long, global = true, env = "SENTILYZE_PROFILE", value_parser = parse_profile)]
    pub profile: Option<Profile>,

    /// Per-model failure handling: isolate or fail_fast
    #[arg(long, global = true, value_parser = parse_failure_policy)]
    pub failure_policy: Option<FailurePolicy>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one text with the selected models
    Analyze {
        /// Text to analyze; read from stdin when omitted
        #[arg(short, long)]
        text: Option<String>,

        #[command(flatten)]
        models: ModelFlags,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze stdin line by line until EOF or `quit`
    Interactive {
        #[command(flatten)]
        models: ModelFlags,
    },

    /// Print the normalized form of a text
    Normalize {
        /// Text to normalize; read from stdin when omitted
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Start the web UI and JSON API
    Serve {
        /// Listen port
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Listen address
        #[arg(short, long, default_value = "127.0.0.1")]
        address: String,
    },
}

/// The three independent model toggles
#[derive(Args, Debug, Clone, Default)]
pub struct ModelFlags {
    /// Use the Naive Bayes model
    #[arg(long)]
    pub naive_bayes: bool,

    /// Use the SVM model
    #[arg(long)]
    pub svm: bool,

    /// Use the Logistic Regression model
    #[arg(long)]
    pub logistic_regression: bool,

    /// Use every model
    #[arg(long)]
    pub all: bool,
}

impl ModelFlags {
    /// Selected handles; empty when no toggle is set
    pub fn handles(&self) -> Vec<ModelHandle> {
        let toggles = [
            (ModelHandle::NaiveBayes, self.naive_bayes),
            (ModelHandle::Svm, self.svm),
            (ModelHandle::LogisticRegression, self.logistic_regression),
        ];
        toggles
            .into_iter()
            .filter(|&(_, on)| on || self.all)
            .map(|(handle, _)| handle)
            .collect()
    }
}

/// Strip the line terminators a terminal or pipe leaves after the text
pub fn trim_line_ending(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

fn parse_profile(s: &str) -> Result<Profile, String> {
    s.parse()
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, String> {
    s.parse()
}
