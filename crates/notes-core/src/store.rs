//! # Store Capabilities
//!
//! Persistence traits for users and notes. Implementations are pure data
//! access: they enforce uniqueness and referential integrity, but never
//! ownership. Ownership is the note service's job.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::identity::{Email, HashedPassword, NoteId, UserId};
use crate::model::{Note, User};

/// Persistence for user identity and password digest.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch a user by id. `NotFound` if absent.
    async fn get_user_by_id(&self, id: UserId) -> Result<User, StoreError>;

    /// Fetch a user by exact email. `NotFound` if absent.
    async fn get_user_by_email(&self, email: &Email) -> Result<User, StoreError>;

    /// Insert a user. `Conflict` if the email is already taken.
    async fn create_user(
        &self,
        email: &Email,
        hashed_password: &HashedPassword,
    ) -> Result<User, StoreError>;

    /// Replace a user's email and digest.
    ///
    /// `NotFound` if no user has `id`; `Conflict` if `email` belongs to a
    /// different user.
    async fn update_user(
        &self,
        id: UserId,
        email: &Email,
        hashed_password: &HashedPassword,
    ) -> Result<(), StoreError>;

    /// Delete a user and, by cascade, their notes. `NotFound` if absent.
    async fn delete_user(&self, id: UserId) -> Result<(), StoreError>;
}

/// Persistence for notes, keyed by owning user.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch a note by id. `NotFound` if absent.
    async fn get_note(&self, id: NoteId) -> Result<Note, StoreError>;

    /// All notes owned by `user_id`, oldest first. Empty if none.
    async fn get_notes_by_user(&self, user_id: UserId) -> Result<Vec<Note>, StoreError>;

    /// Insert a note. `InvalidReference` if `user_id` does not exist.
    async fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        body: &str,
    ) -> Result<Note, StoreError>;

    /// Replace a note's title and body. `NotFound` if absent.
    async fn update_note(&self, id: NoteId, title: &str, body: &str) -> Result<(), StoreError>;

    /// Delete a note. `NotFound` if absent.
    async fn delete_note(&self, id: NoteId) -> Result<(), StoreError>;
}
