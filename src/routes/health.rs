use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub analysis_service: String,
}

/// Health check endpoint - public
///
/// The gateway itself has no hard dependencies, so a down backend only
/// degrades it.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let analysis = state.analysis_client.health_check().await;

    if let Err(e) = &analysis {
        tracing::warn!(error = %e, "Analysis service health check failed");
    }

    let analysis_status = match (&analysis, state.analysis_client.is_demo()) {
        (Ok(()), true) => "demo",
        (Ok(()), false) => "ok",
        (Err(_), _) => "error",
    };

    let status = if analysis.is_ok() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: ServiceHealth {
            analysis_service: analysis_status.to_string(),
        },
    })
}
