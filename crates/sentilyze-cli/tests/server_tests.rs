//! HTTP surface tests against an in-memory model context

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sentilyze_classifiers::linear_svm::LinearSvm;
use sentilyze_classifiers::logistic_regression::LogisticRegression;
use sentilyze_classifiers::naive_bayes::{MultinomialNb, NaiveBayesParams};
use sentilyze_classifiers::{
    FailurePolicy, InferenceOrchestrator, LinearWeights, LoadedClassifier, ModelContext,
    TextNormalizer, TfidfArtifact, TfidfVectorizer,
};
use sentilyze_cli::server::{build_app, AppState};
use sentilyze_core::ModelHandle;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// `terribl`/`bore` push towards class 0, `love`/`great` towards class 1
fn app_with(policy: FailurePolicy, svm_width: usize) -> Router {
    app_on(policy, svm_width, "127.0.0.1:3000")
}

fn app_on(policy: FailurePolicy, svm_width: usize, addr: &str) -> Router {
    let vocabulary: HashMap<String, usize> = ["terribl", "bore", "love", "great"]
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), i))
        .collect();
    let vectorizer = TfidfVectorizer::from_artifact(TfidfArtifact::new(vocabulary, None)).unwrap();

    let nb = MultinomialNb::new(
        "naive_bayes_model",
        NaiveBayesParams {
            classes: vec![0, 1],
            class_log_prior: vec![-0.693, -0.693],
            feature_log_prob: vec![vec![-0.5, -0.5, -3.0, -3.0], vec![-3.0, -3.0, -0.5, -0.5]],
        },
    )
    .unwrap();
    let mut svm_coef = vec![-1.0, -1.0, 1.0, 1.0];
    svm_coef.resize(svm_width, 0.0);
    let svm = LinearSvm::new(
        "svm_model",
        LinearWeights {
            classes: vec![0, 1],
            coef: vec![svm_coef],
            intercept: vec![0.0],
        },
    )
    .unwrap();
    let lr = LogisticRegression::new(
        "logistic_regression_model",
        LinearWeights {
            classes: vec![0, 1],
            coef: vec![vec![-2.0, -2.0, 2.0, 2.0]],
            intercept: vec![0.0],
        },
    )
    .unwrap();

    let context = ModelContext::new(
        TextNormalizer::english().unwrap(),
        Arc::new(vectorizer),
        [
            (ModelHandle::NaiveBayes, LoadedClassifier::probabilistic(nb)),
            (ModelHandle::Svm, LoadedClassifier::label_only(svm)),
            (ModelHandle::LogisticRegression, LoadedClassifier::probabilistic(lr)),
        ],
    )
    .with_failure_policy(policy);

    build_app(
        AppState::new(InferenceOrchestrator::new(Arc::new(context))),
        addr.parse().unwrap(),
    )
}

fn app() -> Router {
    app_with(FailurePolicy::Isolate, 4)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_index_page_has_form() {
    let (status, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<textarea"));
    for name in ["naive_bayes", "svm", "logistic_regression"] {
        assert!(html.contains(&format!("name=\"{name}\"")));
    }
}

#[tokio::test]
async fn test_analyze_negative_text() {
    let (status, body) = post_json(
        app(),
        "/api/analyze",
        json!({
            "text": "This movie was terrible and boring",
            "models": {"naive_bayes": true, "svm": true}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "This movie was terrible and boring");
    assert_eq!(body["normalized"], "movi terribl bore");
    assert_eq!(body["outcomes"]["naive_bayes"]["status"], "success");
    assert_eq!(body["outcomes"]["naive_bayes"]["label"], "negative");
    assert!(body["outcomes"]["naive_bayes"]["confidence"].as_f64().unwrap() > 0.5);
    assert_eq!(body["outcomes"]["svm"]["label"], "negative");
    assert!(body["outcomes"]["svm"].get("confidence").is_none());
    assert!(body["outcomes"].get("logistic_regression").is_none());
    assert_eq!(body["lines"][1], "SVM Prediction: Negative");
}

#[tokio::test]
async fn test_analyze_validation_errors() {
    let (status, body) = post_json(
        app(),
        "/api/analyze",
        json!({"text": "", "models": {"svm": true}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please enter some text to analyze.");

    let (status, body) = post_json(app(), "/api/analyze", json!({"text": "I love it"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Select at least one model to analyze.");
}

#[tokio::test]
async fn test_analyze_isolated_and_fail_fast() {
    let request = json!({
        "text": "great, I love it",
        "models": {"naive_bayes": true, "svm": true, "logistic_regression": true}
    });

    let (status, body) = post_json(app_with(FailurePolicy::Isolate, 6), "/api/analyze", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcomes"]["svm"]["status"], "failed");
    assert_eq!(body["outcomes"]["logistic_regression"]["label"], "positive");

    let (status, body) = post_json(app_with(FailurePolicy::FailFast, 6), "/api/analyze", request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("svm_model"));
}

#[tokio::test]
async fn test_normalize() {
    let (status, body) = post_json(
        app(),
        "/api/normalize",
        json!({"text": "I love this!!! http://x.co"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalized"], "love");
}

#[tokio::test]
async fn test_list_models() {
    let (status, body) = get(app(), "/api/models").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["num_features"], 4);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["model"], "naive_bayes");
    assert_eq!(models[0]["reports_confidence"], true);
    assert_eq!(models[1]["name"], "SVM");
    assert_eq!(models[1]["reports_confidence"], false);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (status, _) = get(app(), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn preflight(app: Router, origin: &str) -> Option<String> {
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/analyze")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_cors_allows_the_serving_port() {
    let app = || app_on(FailurePolicy::Isolate, 4, "127.0.0.1:8080");

    assert_eq!(
        preflight(app(), "http://localhost:8080").await.as_deref(),
        Some("http://localhost:8080")
    );
    assert_eq!(preflight(app(), "http://localhost:3000").await, None);
}
