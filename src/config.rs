use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Default upload ceiling, matching the upload widget (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_OFFICE_VIEWER_URL: &str = "https://view.officeapps.live.com/op/embed.aspx";

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Analysis backend
    pub analysis_service_url: String,
    pub analysis_service_timeout_seconds: u64,
    pub analysis_demo_mode: bool,

    // Auth
    pub jwt_signing_key: String,

    // Uploads / preview
    pub max_upload_bytes: usize,
    pub office_viewer_url: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Analysis backend
        let analysis_service_url = env::var("ANALYSIS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let analysis_service_timeout_seconds = env::var("ANALYSIS_SERVICE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120); // text extraction + model inference is slow
        let analysis_demo_mode = env::var("ANALYSIS_DEMO_MODE")
            .map(|s| parse_flag(&s))
            .unwrap_or(false);

        // Auth
        let jwt_signing_key =
            env::var("JWT_SIGNING_KEY").context("JWT_SIGNING_KEY must be set")?;

        // Uploads / preview
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        let office_viewer_url = env::var("OFFICE_VIEWER_URL")
            .unwrap_or_else(|_| DEFAULT_OFFICE_VIEWER_URL.to_string());

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            analysis_service_url,
            analysis_service_timeout_seconds,
            analysis_demo_mode,
            jwt_signing_key,
            max_upload_bytes,
            office_viewer_url,
        })
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: vec!["http://localhost:5173".to_string()],
        analysis_service_url: "http://127.0.0.1:9".to_string(),
        analysis_service_timeout_seconds: 1,
        analysis_demo_mode: true,
        jwt_signing_key: "test-signing-key".to_string(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        office_viewer_url: DEFAULT_OFFICE_VIEWER_URL.to_string(),
    }
}
