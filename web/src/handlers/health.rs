//! Liveness, readiness and metrics endpoints.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Health check endpoint.
///
/// Returns 200 OK if the process is serving requests.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Routes currently in the catalog
    pub routes: usize,
    /// Whether metrics are being exported
    pub metrics: bool,
}

/// Readiness check endpoint.
///
/// The engine is in-process, so readiness only reports what is loaded.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            ready: true,
            routes: state.engine.catalog().len(),
            metrics: state.metrics.is_some(),
        }),
    )
}

/// Prometheus scrape endpoint.
///
/// 404 when the server runs without a recorder.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
