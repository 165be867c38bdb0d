use crate::render::outcome_lines;
use crate::server::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sentilyze_classifiers::{InferenceReport, Vectorizer};
use sentilyze_core::{Error, ModelHandle};
use serde::{Deserialize, Serialize};
use tracing::error;

// ============================================================================
// Errors
// ============================================================================

/// Maps library errors to HTTP responses: validation errors are the
/// caller's problem (422), anything else is ours (500).
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.user_message() {
            Some(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            None => {
                error!("Analysis failed: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": self.0.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

// ============================================================================
// Health and metrics
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "metrics recorder not installed" })),
        )
            .into_response(),
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// The three model checkboxes of the form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModelToggles {
    pub naive_bayes: bool,
    pub svm: bool,
    pub logistic_regression: bool,
}

impl ModelToggles {
    fn handles(&self) -> Vec<ModelHandle> {
        [
            (ModelHandle::NaiveBayes, self.naive_bayes),
            (ModelHandle::Svm, self.svm),
            (ModelHandle::LogisticRegression, self.logistic_regression),
        ]
        .into_iter()
        .filter_map(|(handle, on)| on.then_some(handle))
        .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub models: ModelToggles,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub text: String,
    #[serde(flatten)]
    pub report: InferenceReport,
    /// Formatted per-model lines, as printed by the CLI
    pub lines: Vec<String>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let report = state.orchestrator.analyze(&req.text, req.models.handles())?;
    let lines = outcome_lines(&report);

    Ok(Json(AnalyzeResponse {
        text: req.text,
        report,
        lines,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
}

pub async fn normalize(
    State(state): State<AppState>,
    Json(req): Json<NormalizeRequest>,
) -> impl IntoResponse {
    let normalized = state.orchestrator.normalize(&req.text);
    Json(serde_json::json!({ "normalized": normalized }))
}

// ============================================================================
// Model listing
// ============================================================================

pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    let context = state.orchestrator.context();
    let models: Vec<_> = ModelHandle::ALL
        .into_iter()
        .map(|handle| match context.model(handle) {
            Some(model) => serde_json::json!({
                "model": handle,
                "name": handle.display_name(),
                "loaded": true,
                "reports_confidence": model.reports_confidence(),
                "num_features": model.num_features(),
            }),
            None => serde_json::json!({
                "model": handle,
                "name": handle.display_name(),
                "loaded": false,
            }),
        })
        .collect();

    Json(serde_json::json!({
        "models": models,
        "num_features": context.vectorizer().num_features(),
    }))
}
