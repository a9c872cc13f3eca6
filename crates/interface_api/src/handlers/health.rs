//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::{AdapterHealth, HealthCheckResult};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub open_sessions: usize,
    pub adapters: Vec<HealthCheckResult>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes outbound adapters)
///
/// A degraded adapter (circuit open) still counts as ready; only an
/// unhealthy one fails the check.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (submitter, catalog) = tokio::join!(
        state.submitter.health_check(),
        state.catalog.health_check()
    );
    let adapters = vec![submitter, catalog];

    let (status_code, status) = if adapters.iter().any(|a| a.status == AdapterHealth::Unhealthy) {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    } else if adapters.iter().all(|a| a.is_healthy()) {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::OK, "degraded")
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_sessions: state.sessions.len().await,
            adapters,
        }),
    )
}
