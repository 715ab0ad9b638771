use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use super::AuthContext;
use crate::app::AppState;
use crate::error::ErrorResponse;
use crate::middleware::RequestIdExt;

/// Extractor that requires a valid access token. See
/// `routes::analysis::latest_analysis` for typical use.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl std::ops::Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken,
}

/// A failed authentication, tagged with the request it belongs to.
#[derive(Debug)]
pub struct AuthRejection {
    pub error: AuthError,
    pub request_id: Option<String>,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match &self.error {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidFormat => "Invalid authorization format",
            AuthError::InvalidToken => "Your session has expired. Please log in again.",
        };

        let body = ErrorResponse {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            request_id: self.request_id,
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let request_id = parts.headers.request_id().map(str::to_string);
        let reject = |error| AuthRejection {
            error,
            request_id: request_id.clone(),
        };

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        reject(AuthError::MissingToken)
                    } else {
                        reject(AuthError::InvalidFormat)
                    }
                })?;

        let token = bearer.token();
        if token.is_empty() {
            return Err(reject(AuthError::MissingToken));
        }

        let claims = state.token_verifier.verify(token).map_err(|e| {
            tracing::warn!(error = %e, "JWT verification failed");
            reject(AuthError::InvalidToken)
        })?;

        Ok(RequireAuth(AuthContext::new(claims, token)))
    }
}
