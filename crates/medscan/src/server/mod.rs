//! HTTP surface: router construction and the server loop.

mod error;
mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use medscan_core::{Config, MedicalImageAnalyzer};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<MedicalImageAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: MedicalImageAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Create the application router.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let api_routes = Router::new()
        .route(
            "/analyze-medical-image",
            post(handlers::analyze_medical_image),
        )
        .route("/health", get(handlers::health));

    let router = Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(config.limits.max_payload_bytes()))
        .layer(TraceLayer::new_for_http());

    let router = if config.server.cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

/// Build the analyzer from config and serve until Ctrl-C.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let analyzer = MedicalImageAnalyzer::from_config(&config)?;
    if !analyzer.llm_available().await {
        tracing::warn!(
            "LLM provider '{}' is not reachable; analysis requests will fail until it is",
            analyzer.llm_name()
        );
    }
    let app = create_router(AppState::new(analyzer), &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("MedScan listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
