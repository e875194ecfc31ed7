//! # Note Routes
//!
//! Mounted under the authorization gate. Handlers never touch a store
//! directly; every call goes through [`NoteService`](crate::services::NoteService),
//! which enforces ownership.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use notes_core::Note;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Subject;
use crate::error::{AppError, ErrorBody, NoteEnvelope, NoteListEnvelope, ObjectBody};
use crate::extractors::{extract_note_id, extract_validated_json, Validate};
use crate::state::AppState;

/// Longest accepted title, in characters.
pub const MAX_TITLE_CHARS: usize = 255;
/// Longest accepted body, in bytes.
pub const MAX_BODY_BYTES: usize = 65_536;

/// Body for creating or updating a note.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NoteRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Validate for NoteRequest {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".into());
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!("title exceeds {MAX_TITLE_CHARS} characters"));
        }
        if self.body.len() > MAX_BODY_BYTES {
            return Err(format!("body exceeds {MAX_BODY_BYTES} bytes"));
        }
        Ok(())
    }
}

/// A note as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: *note.id.as_uuid(),
            user_id: *note.user_id.as_uuid(),
            title: note.title,
            body: note.body,
            created_at: note.created_at,
        }
    }
}

/// Build the notes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(list_notes))
        .route("/api/note", post(create_note))
        .route(
            "/api/note/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
}

/// GET /api/notes: All notes owned by the caller.
#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "Caller's notes", body = NoteListEnvelope),
        (status = 400, description = "Internal error", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub(crate) async fn list_notes(
    State(state): State<AppState>,
    subject: Subject,
) -> Result<Json<ObjectBody<Vec<NoteResponse>>>, AppError> {
    let notes = state.notes.get_own(&subject).await?;
    Ok(Json(ObjectBody::new(
        notes.into_iter().map(NoteResponse::from).collect(),
    )))
}

/// GET /api/note/:id: One note owned by the caller.
#[utoipa::path(
    get,
    path = "/api/note/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = NoteEnvelope),
        (status = 400, description = "Invalid id, note not found, or internal error", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub(crate) async fn get_note(
    State(state): State<AppState>,
    subject: Subject,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ObjectBody<NoteResponse>>, AppError> {
    let id = extract_note_id(id)?;
    let note = state.notes.get_by_id(&subject, id).await?;
    Ok(Json(ObjectBody::new(note.into())))
}

/// POST /api/note: Create a note owned by the caller.
#[utoipa::path(
    post,
    path = "/api/note",
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Created", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid params or internal error", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub(crate) async fn create_note(
    State(state): State<AppState>,
    subject: Subject,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let req = extract_validated_json(body)?;
    state.notes.create(&subject, &req.title, &req.body).await?;
    Ok("OK")
}

/// PUT /api/note/:id: Replace title and body of a note owned by the caller.
#[utoipa::path(
    put,
    path = "/api/note/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Updated", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid params, note not found, or internal error", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub(crate) async fn update_note(
    State(state): State<AppState>,
    subject: Subject,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let id = extract_note_id(id)?;
    let req = extract_validated_json(body)?;
    state.notes.update(&subject, id, &req.title, &req.body).await?;
    Ok("OK")
}

/// DELETE /api/note/:id: Delete a note owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/note/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid id, note not found, or internal error", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "notes"
)]
pub(crate) async fn delete_note(
    State(state): State<AppState>,
    subject: Subject,
    id: Result<Path<String>, PathRejection>,
) -> Result<&'static str, AppError> {
    let id = extract_note_id(id)?;
    state.notes.delete(&subject, id).await?;
    Ok("OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, body: &str) -> NoteRequest {
        NoteRequest {
            title: title.into(),
            body: body.into(),
        }
    }

    #[test]
    fn accepts_ordinary_note() {
        assert!(request("hello", "world").validate().is_ok());
        assert!(request("hello", "").validate().is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        assert!(request("", "b").validate().is_err());
        assert!(request("   ", "b").validate().is_err());
    }

    #[test]
    fn title_limit_counts_characters() {
        assert!(request(&"é".repeat(MAX_TITLE_CHARS), "").validate().is_ok());
        assert!(request(&"a".repeat(MAX_TITLE_CHARS + 1), "").validate().is_err());
    }

    #[test]
    fn body_limit_counts_bytes() {
        assert!(request("t", &"a".repeat(MAX_BODY_BYTES)).validate().is_ok());
        assert!(request("t", &"a".repeat(MAX_BODY_BYTES + 1)).validate().is_err());
    }
}
