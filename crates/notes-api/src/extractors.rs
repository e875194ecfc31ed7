//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers that turn
//! extractor rejections into [`AppError::InvalidParams`].

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::extract::Path;
use axum::{Form, Json};
use notes_core::NoteId;

use crate::error::AppError;

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::InvalidParams`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::InvalidParams(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::InvalidParams)?;
    Ok(value)
}

/// Extract a URL-encoded form body, converting rejection to [`AppError`].
pub fn extract_form<T>(result: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    result
        .map(|Form(v)| v)
        .map_err(|err| AppError::InvalidParams(err.body_text()))
}

/// Parse the `:id` path segment as a note id.
pub fn extract_note_id(result: Result<Path<String>, PathRejection>) -> Result<NoteId, AppError> {
    let Path(raw) = result.map_err(|err| AppError::InvalidParams(err.body_text()))?;
    Ok(raw.parse::<NoteId>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), String> {
            if self.name.is_empty() {
                Err("name must not be empty".into())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn validated_json_passes_valid_input() {
        let value = extract_validated_json(Ok(Json(Named { name: "a".into() }))).unwrap();
        assert_eq!(value.name, "a");
    }

    #[test]
    fn validated_json_rejects_rule_violation() {
        let err = extract_validated_json(Ok(Json(Named { name: String::new() }))).unwrap_err();
        match err {
            AppError::InvalidParams(msg) => assert!(msg.contains("empty")),
            other => panic!("expected InvalidParams, got {other:?}"),
        }
    }

    #[test]
    fn form_is_returned_unvalidated() {
        let value = extract_form(Ok(Form(Named { name: String::new() }))).unwrap();
        assert!(value.name.is_empty());
    }

    #[test]
    fn note_id_must_be_uuid() {
        let id = NoteId::new();
        assert_eq!(extract_note_id(Ok(Path(id.to_string()))).unwrap(), id);
        let err = extract_note_id(Ok(Path("17".into()))).unwrap_err();
        assert!(matches!(err, AppError::InvalidParams(_)));
    }
}
