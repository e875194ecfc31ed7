//! # Error Hierarchy
//!
//! Structured error types for the domain and storage layers, built with
//! `thiserror`. Callers translate these into the HTTP-facing taxonomy at the
//! service boundary; nothing here is ever serialized to a client verbatim.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email address is not syntactically valid.
    #[error("invalid email address: \"{0}\"")]
    InvalidEmail(String),

    /// Identifier string is not a UUID.
    #[error("invalid identifier: \"{0}\" (expected a UUID)")]
    InvalidId(String),
}

/// Errors returned by [`CredentialStore`](crate::CredentialStore) and
/// [`NoteStore`](crate::NoteStore) implementations.
///
/// `NotFound` and `Conflict` are expected outcomes that callers branch on;
/// `Backend` is a transport or storage failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched the lookup, or an update/delete affected zero rows.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign-key constraint was violated (e.g. note for a missing user).
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether this error is the "no matching row" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
