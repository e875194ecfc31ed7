//! # Registration and Login Routes
//!
//! Unauthenticated. Both take an `application/x-www-form-urlencoded` body
//! with `email` and `password` fields.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_form;
use crate::state::AppState;

/// Form body for `/login` and `/register`.
#[derive(Deserialize, ToSchema)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token for `/api/*` routes.
    pub token: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

/// POST /login: Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Session token", body = TokenResponse),
        (status = 400, description = "Invalid credentials or params", body = ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let form = extract_form(form)?;
    let token = state.auth.login(&form.email, &form.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /register: Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Registered", body = String),
        (status = 400, description = "User already exists, invalid params, or internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Json<&'static str>, AppError> {
    let form = extract_form(form)?;
    state.auth.register(&form.email, &form.password).await?;
    Ok(Json("OK"))
}
