//! # Authorization Gate
//!
//! Bearer-token middleware for every `/api/*` route.
//!
//! ```text
//! Authorization: Bearer <HS256 JWT>
//! ```
//!
//! The token is verified with the [`TokenCodec`] carried in [`AuthConfig`]
//! (layered as an `axum::Extension`). On success the token's subject is
//! inserted into the request extensions as a [`Subject`]; handlers obtain
//! it through the `FromRequestParts` impl. On any failure the request is
//! answered with 401 `{"error":"unauthorized"}` and no handler runs.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use notes_crypto::{TokenCodec, TokenError};

use crate::error::{AppError, ErrorBody};

// ── Subject ─────────────────────────────────────────────────────────────────

/// The authenticated caller: the email asserted by a verified token.
///
/// Request-scoped. Never cached or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    /// Wrap a verified subject.
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// The subject's email address.
    pub fn email(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the subject that [`auth_middleware`] injected into extensions.
/// Returns 401 if none is present (route mounted outside the gate).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Subject {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Subject>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no subject in request context".into()))
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Gate configuration injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub codec: Arc<TokenCodec>,
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Verify the bearer token and inject the [`Subject`].
///
/// Fails closed: if no [`AuthConfig`] extension is present, every request
/// is refused.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        return AppError::Internal("authorization gate is not configured".into()).into_response();
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(value) => match bearer_token(value) {
            Some(token) => token.trim(),
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                return unauthorized_response();
            }
        },
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            return unauthorized_response();
        }
    };

    match config.codec.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(Subject::new(claims.sub));
            next.run(request).await
        }
        Err(err) => {
            match &err {
                TokenError::Expired { expires_at } => {
                    tracing::warn!(expires_at, "authentication failed: token expired")
                }
                other => tracing::warn!(reason = %other, "authentication failed: invalid token"),
            }
            unauthorized_response()
        }
    }
}

/// Token part of a `Bearer` credential. The scheme name is matched
/// case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    const SCHEME: &str = "Bearer ";
    let prefix = value.get(..SCHEME.len())?;
    prefix
        .eq_ignore_ascii_case(SCHEME)
        .then(|| &value[SCHEME.len()..])
}

fn unauthorized_response() -> Response {
    let body = ErrorBody {
        error: "unauthorized".to_string(),
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use notes_crypto::SigningSecret;
    use std::time::Duration;
    use tower::ServiceExt;

    const KEY: &str = "gate-test-key-gate-test-key-0000";

    fn codec(key: &str) -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(SigningSecret::new(key.as_bytes())))
    }

    /// Minimal router: the handler echoes the injected subject.
    fn test_app() -> Router {
        Router::new()
            .route("/test", get(|subject: Subject| async move { subject.email().to_string() }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(AuthConfig { codec: codec(KEY) }))
    }

    async fn send(app: Router, auth: Option<String>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, body)
    }

    fn assert_unauthorized(status: StatusCode, body: &[u8]) {
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "unauthorized"}));
    }

    #[tokio::test]
    async fn valid_token_exposes_subject() {
        let token = codec(KEY).issue("u1@test.com", Duration::from_secs(60)).unwrap();
        let (status, body) = send(test_app(), Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"u1@test.com");
    }

    #[tokio::test]
    async fn bearer_scheme_is_case_insensitive() {
        let token = codec(KEY).issue("u1@test.com", Duration::from_secs(60)).unwrap();
        for scheme in ["bearer", "BEARER", "bEaReR"] {
            let (status, body) = send(test_app(), Some(format!("{scheme} {token}"))).await;
            assert_eq!(status, StatusCode::OK, "scheme {scheme}");
            assert_eq!(&body[..], b"u1@test.com");
        }
    }

    #[test]
    fn bearer_token_needs_scheme_and_space() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token("Bear"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let (status, body) = send(test_app(), None).await;
        assert_unauthorized(status, &body);
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let (status, body) = send(test_app(), Some("Basic dXNlcjpwYXNz".into())).await;
        assert_unauthorized(status, &body);
    }

    #[tokio::test]
    async fn garbage_token_rejected() {
        let (status, body) = send(test_app(), Some("Bearer not-a-token".into())).await;
        assert_unauthorized(status, &body);
    }

    #[tokio::test]
    async fn token_from_other_key_rejected() {
        let token = codec("some-other-key").issue("u1@test.com", Duration::from_secs(60)).unwrap();
        let (status, body) = send(test_app(), Some(format!("Bearer {token}"))).await;
        assert_unauthorized(status, &body);
    }

    #[tokio::test]
    async fn expired_token_rejected_despite_valid_signature() {
        let token = codec(KEY)
            .issue_at(
                "u1@test.com",
                Utc::now() - chrono::Duration::hours(2),
                Duration::from_secs(3600),
            )
            .unwrap();
        let (status, body) = send(test_app(), Some(format!("Bearer {token}"))).await;
        assert_unauthorized(status, &body);
    }

    #[tokio::test]
    async fn missing_config_fails_closed() {
        let app = Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware));
        let token = codec(KEY).issue("u1@test.com", Duration::from_secs(60)).unwrap();
        let (status, body) = send(app, Some(format!("Bearer {token}"))).await;
        assert_ne!(status, StatusCode::OK);
        assert_ne!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn subject_extractor_without_gate_is_unauthorized() {
        let app = Router::new()
            .route("/test", get(|subject: Subject| async move { subject.email().to_string() }));
        let (status, _) = send(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
