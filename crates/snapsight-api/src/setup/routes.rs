//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use snapsight_core::Config;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/image",
            post(handlers::image::upload_image).options(handlers::image::image_preflight),
        )
        .route("/health", get(liveness_check))
        // Base64 payloads easily exceed axum's 2MB default; the configured limit applies instead.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: the process is up and serving.
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
