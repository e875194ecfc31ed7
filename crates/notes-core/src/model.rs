//! # Domain Records
//!
//! The two persisted record types. Both are plain data; invariants such as
//! email uniqueness and note ownership are enforced by the stores and the
//! service layer respectively.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::{Email, HashedPassword, NoteId, UserId};

/// A registered user.
///
/// Deliberately not `Serialize`: the password digest must never reach a
/// response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login address, unique across all users.
    pub email: Email,
    /// One-way digest of the user's password.
    pub hashed_password: HashedPassword,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// A note owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// Unique identifier.
    pub id: NoteId,
    /// The owning user.
    pub user_id: UserId,
    /// Short title.
    pub title: String,
    /// Free-form body text.
    pub body: String,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Whether `user` owns this note.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.user_id == *user
    }
}
