mod api;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;

use auth::TokenVerifier;
use services::{AnalysisClient, ResultStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        demo_mode = settings.analysis_demo_mode,
        "Starting analysis gateway"
    );

    let analysis_client = AnalysisClient::new(
        &settings.analysis_service_url,
        settings.analysis_service_timeout_seconds,
        settings.analysis_demo_mode,
    )?;

    // Probe the backend without blocking startup
    tokio::spawn({
        let analysis_client = analysis_client.clone();
        async move {
            match analysis_client.health_check().await {
                Ok(()) => tracing::info!("Analysis service is reachable"),
                Err(e) => tracing::warn!(error = %e, "Analysis service health check failed - uploads will fail until it is up"),
            }
        }
    });

    let token_verifier = TokenVerifier::new(&settings.jwt_signing_key);

    let state = app::AppState::new(
        settings.clone(),
        token_verifier,
        analysis_client,
        ResultStore::new(),
    );

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
