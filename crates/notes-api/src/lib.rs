//! # notes-api: Axum API Service for the Notes Service
//!
//! Registered users keep short text notes behind email/password
//! authentication. A note is only ever visible or mutable through the
//! identity resolved from the caller's bearer token.
//!
//! ## API Surface
//!
//! | Path | Module | Auth |
//! |---|---|---|
//! | `POST /login`, `POST /register` | [`routes::auth`] | none |
//! | `/api/notes`, `/api/note`, `/api/note/:id` | [`routes::notes`] | bearer |
//! | `/health/liveness`, `/health/readiness` | this module | none |
//! | `/openapi.json` | [`openapi`] | none |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → BodyLimit → AuthMiddleware (/api/* only) → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::Router;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Only the `/api/*` routes sit behind the authorization gate.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        codec: state.codec.clone(),
    };

    // Authenticated note routes.
    let api = routes::notes::router()
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(auth_config));

    // Unauthenticated routes.
    let public = Router::new()
        .merge(routes::auth::router())
        .merge(openapi::router())
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(public)
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let mut config = config::AppConfig::default();
        config.application.jwt_key = "lib-test-key".into();
        config.application.password_cost = 4;
        app(bootstrap::bootstrap(&config, None).unwrap())
    }

    async fn get_text(uri: &str) -> (StatusCode, String) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_probes_need_no_token() {
        assert_eq!(get_text("/health/liveness").await, (StatusCode::OK, "ok".to_string()));
        assert_eq!(get_text("/health/readiness").await, (StatusCode::OK, "ready".to_string()));
    }

    #[tokio::test]
    async fn openapi_needs_no_token() {
        let (status, body) = get_text("/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/api/notes"));
    }

    #[tokio::test]
    async fn api_routes_need_a_token() {
        let (status, body) = get_text("/api/notes").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"unauthorized"}"#);
    }
}
