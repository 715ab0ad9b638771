pub mod analysis;
pub mod health;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Protected routes
        .route("/analyze", post(analysis::analyze_document))
        .route("/analysis/latest", get(analysis::latest_analysis))
        .route("/analysis/normalize", post(analysis::normalize_payload))
}
