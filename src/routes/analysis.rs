use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{
    analysis::DocumentAnalysis, normalize, resolve_media_url, validate_upload, AnalysisView,
    UploadError,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestIdExt;
use crate::services::{AnalysisRecord, UploadedDocument};

/// Multipart field carrying the file, as the backend expects it.
const DOCUMENT_FIELD: &str = "document";

/// Submit a document for analysis and store the result as the caller's latest.
pub async fn analyze_document(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<DataResponse<AnalysisRecord>> {
    let guard = state.results.begin(auth.user_id)?;

    let (file_name, bytes) = read_document(multipart, state.settings.max_upload_bytes).await?;
    let format = validate_upload(&file_name, bytes.len(), state.settings.max_upload_bytes)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        user_id = auth.user_id,
        token_id = auth.claims().jti.as_deref().unwrap_or("-"),
        file_name = %file_name,
        size = bytes.len(),
        format = ?format,
        "Analyzing document"
    );

    let payload = state
        .analysis_client
        .analyze(
            &auth,
            UploadedDocument {
                file_name: file_name.clone(),
                format,
                bytes,
            },
            headers.request_id(),
        )
        .await?;

    let record = guard.complete(AnalysisRecord {
        file_name: Some(file_name),
        analyzed_at: Some(Utc::now()),
        view: build_view(&state, normalize(Some(&payload))),
    });

    tracing::info!(
        user_id = auth.user_id,
        plagiarism_score = record.view.analysis.plagiarism_score,
        ai_score = record.view.analysis.ai_score,
        sources = record.view.sources.len(),
        markers = record.view.ai_markers.len(),
        preview = ?record.view.preview.kind(),
        "Analysis complete"
    );

    Ok(DataResponse::new(record.as_ref().clone()))
}

/// The caller's latest analysis, or the empty-state view when there is none.
pub async fn latest_analysis(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> DataResponse<AnalysisRecord> {
    let record = match state.results.latest(auth.user_id) {
        Some(record) => record.as_ref().clone(),
        None => AnalysisRecord {
            file_name: None,
            analyzed_at: None,
            view: AnalysisView::build(normalize(None), &state.preview_options()),
        },
    };

    DataResponse::new(record)
}

/// Build the view for a payload the client already holds. Nothing is stored.
pub async fn normalize_payload(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> DataResponse<AnalysisView> {
    DataResponse::new(build_view(&state, normalize(Some(&raw))))
}

/// Resolve backend-relative media paths, then build the view. Every handler
/// turning a backend payload into a view goes through here.
fn build_view(state: &AppState, mut analysis: DocumentAnalysis) -> AnalysisView {
    let base = state.analysis_client.base_url();
    analysis.file_url = analysis.file_url.map(|u| resolve_media_url(&u, base));
    AnalysisView::build(analysis, &state.preview_options())
}

async fn read_document(mut multipart: Multipart, max_bytes: usize) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;

        return Ok((file_name, bytes.to_vec()));
    }

    Err(ApiError::BadRequest(UploadError::Missing.to_string()))
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::BadRequest(
            UploadError::TooLarge {
                limit_mb: max_bytes / (1024 * 1024),
            }
            .to_string(),
        );
    }
    ApiError::BadRequest(format!("Invalid upload: {}", err.body_text()))
}
