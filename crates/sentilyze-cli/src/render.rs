//! Plain text rendering of analysis reports

use sentilyze_classifiers::{InferenceReport, ModelOutcome};
use sentilyze_core::ModelHandle;
use std::fmt::Write;

/// One line per model, e.g. `Naive Bayes Prediction: Negative (Confidence: 0.87)`
pub fn outcome_line(handle: ModelHandle, outcome: &ModelOutcome) -> String {
    match outcome {
        ModelOutcome::Success(prediction) => match prediction.confidence {
            Some(confidence) => format!(
                "{} Prediction: {} (Confidence: {:.2})",
                handle, prediction.label, confidence
            ),
            None => format!("{} Prediction: {}", handle, prediction.label),
        },
        ModelOutcome::Failed { reason } => format!("{} Prediction: failed ({})", handle, reason),
    }
}

pub fn outcome_lines(report: &InferenceReport) -> Vec<String> {
    report
        .outcomes
        .iter()
        .map(|(&handle, outcome)| outcome_line(handle, outcome))
        .collect()
}

/// Full report: the input text followed by every model's line
pub fn render_report(text: &str, report: &InferenceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Input text: {}", text);
    for line in outcome_lines(report) {
        let _ = writeln!(out, "{}", line);
    }
    out
}
