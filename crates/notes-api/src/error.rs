//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure a client can observe is one of six stable labels; the
//! variant's detail string is for logs only and never reaches a response
//! body.
//!
//! | Variant | Body | Status |
//! |---|---|---|
//! | `InvalidParams` | `{"error":"invalid params"}` | 400 |
//! | `InvalidCredentials` | `{"error":"invalid credentials"}` | 400 |
//! | `Conflict` | `{"error":"user already exists"}` | 400 |
//! | `NotFound` | `{"error":"note not found"}` | 400 |
//! | `Unauthorized` | `{"error":"unauthorized"}` | 401 |
//! | `Internal` | `{"error":"internal error"}` | 400 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Failure envelope: `{"error": "<label>"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable, client-safe error label.
    pub error: String,
}

/// Success envelope: `{"object": <value>}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    NoteEnvelope = ObjectBody<crate::routes::notes::NoteResponse>,
    NoteListEnvelope = ObjectBody<Vec<crate::routes::notes::NoteResponse>>
)]
pub struct ObjectBody<T> {
    /// The requested resource.
    pub object: T,
}

impl<T> ObjectBody<T> {
    /// Wrap a value.
    pub fn new(object: T) -> Self {
        Self { object }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-bounds input.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Unknown email or wrong password. The two are indistinguishable.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Email already registered.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Note absent or owned by someone else.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing, malformed, forged, or expired bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Anything else. Detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and client-facing label for this error.
    pub fn status_and_label(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidParams(_) => (StatusCode::BAD_REQUEST, "invalid params"),
            Self::InvalidCredentials(_) => (StatusCode::BAD_REQUEST, "invalid credentials"),
            Self::Conflict(_) => (StatusCode::BAD_REQUEST, "user already exists"),
            Self::NotFound(_) => (StatusCode::BAD_REQUEST, "note not found"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Internal(_) => (StatusCode::BAD_REQUEST, "internal error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, label) = self.status_and_label();

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal error"),
            _ => tracing::warn!(error = %self, "request failed"),
        }

        let body = ErrorBody {
            error: label.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<notes_core::ValidationError> for AppError {
    fn from(err: notes_core::ValidationError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn labels_and_statuses() {
        let cases = [
            (AppError::InvalidParams("x".into()), StatusCode::BAD_REQUEST, "invalid params"),
            (AppError::InvalidCredentials("x".into()), StatusCode::BAD_REQUEST, "invalid credentials"),
            (AppError::Conflict("x".into()), StatusCode::BAD_REQUEST, "user already exists"),
            (AppError::NotFound("x".into()), StatusCode::BAD_REQUEST, "note not found"),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "unauthorized"),
            (AppError::Internal("x".into()), StatusCode::BAD_REQUEST, "internal error"),
        ];
        for (err, status, label) in cases {
            assert_eq!(err.status_and_label(), (status, label));
        }
    }

    #[tokio::test]
    async fn body_has_only_error_field() {
        let (status, body) = response_parts(AppError::NotFound("note 42".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "note not found"}));
    }

    #[tokio::test]
    async fn internal_detail_never_leaks() {
        let (status, body) =
            response_parts(AppError::Internal("db connection refused at 10.0.0.5".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let rendered = body.to_string();
        assert!(!rendered.contains("10.0.0.5"), "leaked: {rendered}");
        assert_eq!(body["error"], "internal error");
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let (status, body) = response_parts(AppError::Unauthorized("expired".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[test]
    fn object_body_serializes_under_object_key() {
        let json = serde_json::to_value(ObjectBody::new(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"object": [1, 2]}));
    }

    #[test]
    fn validation_error_maps_to_invalid_params() {
        let err = AppError::from(notes_core::ValidationError::InvalidId("abc".into()));
        assert!(matches!(err, AppError::InvalidParams(_)));
    }
}
