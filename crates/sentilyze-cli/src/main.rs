//! Sentilyze
//!
//! Sentiment analysis of short texts with pretrained Naive Bayes, SVM and
//! Logistic Regression models, from the command line or a small web UI.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentilyze_classifiers::{
    InferenceOrchestrator, ModelContext, SentimentConfig, StopwordSet, TextNormalizer,
};
use sentilyze_cli::cli::{trim_line_ending, Cli, Commands};
use sentilyze_cli::config::load_config;
use sentilyze_cli::render::render_report;
use sentilyze_cli::server::{run_server, AppState};
use sentilyze_core::ModelHandle;
use std::io::{BufRead, Read, Write};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Analyze { text, models, json } => {
            let orchestrator = load_orchestrator(&config).await?;
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };

            match orchestrator.analyze(&text, models.handles()) {
                Ok(report) if json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Ok(report) => print!("{}", render_report(&text, &report)),
                Err(e) => match e.user_message() {
                    Some(message) => {
                        eprintln!("{}", message);
                        return Ok(ExitCode::from(2));
                    }
                    None => return Err(e.into()),
                },
            }
        }

        Commands::Interactive { models } => {
            let orchestrator = load_orchestrator(&config).await?;
            run_interactive(&orchestrator, &models.handles())?;
        }

        Commands::Normalize { text } => {
            let stopwords = StopwordSet::load(&config.stopwords).await?;
            let normalizer = TextNormalizer::new(Arc::new(stopwords))?;
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            println!("{}", normalizer.normalize(&text));
        }

        Commands::Serve { port, address } => {
            let metrics_handle = init_metrics()?;
            let orchestrator = load_orchestrator(&config).await?;
            let addr: SocketAddr = format!("{}:{}", address, port).parse()?;

            println!();
            println!("  Sentilyze");
            println!("  Models:  {}", config.resolved_model_dir().display());
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(AppState::new(orchestrator).with_metrics(metrics_handle), addr).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load every artifact; any failure stops the process before it serves.
async fn load_orchestrator(config: &SentimentConfig) -> Result<InferenceOrchestrator> {
    let context = ModelContext::initialize(config).await.with_context(|| {
        format!(
            "failed to load models from {}",
            config.resolved_model_dir().display()
        )
    })?;
    Ok(InferenceOrchestrator::new(Arc::new(context)))
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(trim_line_ending(&text).to_string())
}

fn run_interactive(orchestrator: &InferenceOrchestrator, models: &[ModelHandle]) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Enter text to analyze, one per line. Type 'quit' to exit.");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = trim_line_ending(&line);
        if matches!(text.trim(), "quit" | "exit") {
            break;
        }

        match orchestrator.analyze(text, models.iter().copied()) {
            Ok(report) => print!("{}", render_report(text, &report)),
            Err(e) => match e.user_message() {
                Some(message) => println!("{}", message),
                None => return Err(e.into()),
            },
        }
    }

    Ok(())
}

/// Install the Prometheus recorder and describe the metrics we emit
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentilyze_requests_total",
        "Total number of analysis requests"
    );
    metrics::describe_counter!(
        "sentilyze_model_predictions_total",
        "Model predictions by model and outcome"
    );
    metrics::describe_histogram!(
        "sentilyze_inference_latency_us",
        metrics::Unit::Microseconds,
        "Normalization, vectorization and prediction latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "sentilyze=debug,sentilyze_cli=debug,sentilyze_classifiers=debug,tower_http=debug"
    } else {
        "sentilyze=info,sentilyze_cli=info,sentilyze_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
