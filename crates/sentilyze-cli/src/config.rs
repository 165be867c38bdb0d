//! Configuration layering for the binary

use crate::cli::Cli;
use sentilyze_classifiers::SentimentConfig;

/// Load configuration from file and CLI overrides.
///
/// Precedence: defaults, then the YAML file if it exists, then flags and
/// their environment variables.
pub fn load_config(cli: &Cli) -> anyhow::Result<SentimentConfig> {
    let mut config = SentimentConfig::load_or_default(&cli.config)?;

    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    if let Some(model_dir) = &cli.model_dir {
        config.model_dir = Some(model_dir.clone());
    }
    if let Some(policy) = cli.failure_policy {
        config.failure_policy = policy;
    }

    Ok(config)
}
