//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served unauthenticated at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes API",
        version = "0.1.0",
        description = "Email/password accounts, bearer-token sessions, and notes visible only to their owner.",
        license(name = "MIT")
    ),
    paths(
        // Auth
        crate::routes::auth::login,
        crate::routes::auth::register,
        // Notes
        crate::routes::notes::list_notes,
        crate::routes::notes::get_note,
        crate::routes::notes::create_note,
        crate::routes::notes::update_note,
        crate::routes::notes::delete_note,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::NoteEnvelope,
        crate::error::NoteListEnvelope,
        crate::routes::auth::CredentialsForm,
        crate::routes::auth::TokenResponse,
        crate::routes::notes::NoteRequest,
        crate::routes::notes::NoteResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "notes", description = "Ownership-scoped note CRUD"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by the note routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
