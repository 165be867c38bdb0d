use crate::server::{routes, static_files};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sentilyze_classifiers::InferenceOrchestrator;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: InferenceOrchestrator,

    /// Prometheus recorder handle; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(orchestrator: InferenceOrchestrator) -> Self {
        Self {
            orchestrator,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Origins allowed to call the API when the UI is served from `addr`
pub fn local_origins(addr: SocketAddr) -> Vec<HeaderValue> {
    let port = addr.port();
    let mut origins = vec![format!("http://{}", addr)];
    if addr.ip().is_loopback() || addr.ip().is_unspecified() {
        for local in [format!("http://localhost:{}", port), format!("http://127.0.0.1:{}", port)] {
            if !origins.contains(&local) {
                origins.push(local);
            }
        }
    }
    origins
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect()
}

/// Build the Axum application for a server bound to `addr`
pub fn build_app(state: AppState, addr: SocketAddr) -> Router {
    // CORS defaults to local origins; override only for explicit use.
    let allow_any_origin = std::env::var("SENTILYZE_ALLOW_ANY_ORIGIN")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let cors = if allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(local_origins(addr)))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/analyze", post(routes::analyze))
        .route("/normalize", post(routes::normalize))
        .route("/models", get(routes::list_models));

    Router::new()
        .route("/", get(static_files::index))
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::metrics))
        .nest("/api", api_routes)
        .fallback(static_files::not_found)
        .layer(cors)
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_app(state, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Sentilyze listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
