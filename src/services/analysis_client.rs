//! Client for the document analysis backend.
//!
//! One call matters: submit a document, get back the raw analysis payload.
//! The payload is returned untyped; shaping it is the normalizer's job.

use anyhow::{Context, Result};
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use crate::auth::AuthContext;
use crate::domain::{demo, DocumentFormat};
use crate::error::ApiError;

const ANALYZE_PATH: &str = "api/analyze/";

/// Client for the analysis service.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: Url,
    demo_mode: bool,
}

/// Error body returned by the backend (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    error: String,
}

/// A document ready to be submitted.
pub struct UploadedDocument {
    pub file_name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout_seconds: u64, demo_mode: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        // Trailing slash so relative joins keep any path prefix
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid ANALYSIS_SERVICE_URL: {base_url}"))?;

        tracing::info!(base_url = %base_url, demo_mode, "Analysis client initialized");

        Ok(Self {
            client,
            base_url,
            demo_mode,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_demo(&self) -> bool {
        self.demo_mode
    }

    /// Check the analysis service is reachable.
    pub async fn health_check(&self) -> Result<()> {
        if self.demo_mode {
            return Ok(());
        }

        // Any response means the server is up; only transport errors count
        self.client
            .get(self.base_url.clone())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Analysis service health check failed")?;

        Ok(())
    }

    /// Submit a document and return the backend's raw payload.
    #[instrument(skip(self, auth, document), fields(user_id = auth.user_id, file_name = %document.file_name))]
    pub async fn analyze(
        &self,
        auth: &AuthContext,
        document: UploadedDocument,
        request_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        if self.demo_mode {
            debug!("Demo mode: returning sample analysis");
            return Ok(demo::sample_payload());
        }

        let url = self
            .base_url
            .join(ANALYZE_PATH)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid analyze URL: {}", e)))?;

        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(document.format.mime_type())
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid upload mime type: {}", e)))?;
        let form = Form::new().part("document", part);

        let mut req = self
            .client
            .post(url.clone())
            .bearer_auth(auth.token())
            .multipart(form);

        if let Some(rid) = request_id {
            req = req.header("x-request-id", rid);
        }

        debug!(url = %url, "Analysis service request");

        let response = req.send().await.map_err(|e| {
            error!(error = %e, "Analysis service request failed");
            ApiError::Upstream(format!("Analysis service unavailable: {}", e))
        })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<Value>().await.map_err(|e| {
                error!(error = %e, "Failed to parse analysis response");
                ApiError::Upstream(format!("Invalid analysis service response: {}", e))
            });
        }

        let message = response
            .json::<BackendErrorResponse>()
            .await
            .ok()
            .map(|e| e.error)
            .unwrap_or_else(|| format!("Analysis service error: {}", status));

        Err(map_backend_error(status, message))
    }
}

fn map_backend_error(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ApiError::Unauthorized("Your session has expired. Please log in again.".to_string())
        }
        _ => ApiError::Upstream(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;

    fn auth() -> AuthContext {
        AuthContext::new(
            Claims {
                token_type: "access".into(),
                exp: i64::MAX,
                iat: None,
                jti: None,
                user_id: 1,
            },
            "token",
        )
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let client = AnalysisClient::new("http://backend:8000/v2", 5, false).unwrap();
        assert_eq!(
            client.base_url().join(ANALYZE_PATH).unwrap().as_str(),
            "http://backend:8000/v2/api/analyze/"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(AnalysisClient::new("not a url", 5, false).is_err());
    }

    #[test]
    fn backend_errors_map_to_api_errors() {
        assert!(matches!(
            map_backend_error(StatusCode::BAD_REQUEST, "No document provided".into()),
            ApiError::BadRequest(m) if m == "No document provided"
        ));
        assert!(matches!(
            map_backend_error(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            map_backend_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            ApiError::Upstream(_)
        ));
    }

    #[tokio::test]
    async fn demo_mode_skips_the_network() {
        let client = AnalysisClient::new("http://127.0.0.1:9", 1, true).unwrap();
        let document = UploadedDocument {
            file_name: "essay.docx".into(),
            format: DocumentFormat::Docx,
            bytes: vec![1, 2, 3],
        };

        let payload = client.analyze(&auth(), document, None).await.unwrap();
        assert_eq!(payload["plagiarismScore"], 18);
        assert!(client.health_check().await.is_ok());
    }
}
