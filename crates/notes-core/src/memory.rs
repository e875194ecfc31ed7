//! # In-Memory Store
//!
//! A [`CredentialStore`] + [`NoteStore`] backed by hash maps behind a single
//! `parking_lot::RwLock`. Used when no database is configured and in tests.
//!
//! Every check-then-write sequence (email uniqueness, owner existence,
//! cascade on user delete) runs under one write guard, so the store gives
//! the same guarantees as the Postgres constraints. The lock is never held
//! across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::identity::{Email, HashedPassword, NoteId, UserId};
use crate::model::{Note, User};
use crate::store::{CredentialStore, NoteStore};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    /// Notes keyed by id, with an insertion sequence for stable ordering.
    notes: HashMap<NoteId, (u64, Note)>,
    next_seq: u64,
}

/// Thread-safe, cloneable in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Number of notes across all users.
    pub fn note_count(&self) -> usize {
        self.inner.read().notes.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get_user_by_id(&self, id: UserId) -> Result<User, StoreError> {
        self.inner
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<User, StoreError> {
        self.inner
            .read()
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {email}")))
    }

    async fn create_user(
        &self,
        email: &Email,
        hashed_password: &HashedPassword,
    ) -> Result<User, StoreError> {
        let mut guard = self.inner.write();
        if guard.users.values().any(|u| u.email == *email) {
            return Err(StoreError::Conflict(format!("email {email} already registered")));
        }
        let user = User {
            id: UserId::new(),
            email: email.clone(),
            hashed_password: hashed_password.clone(),
            created_at: Utc::now(),
        };
        guard.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        id: UserId,
        email: &Email,
        hashed_password: &HashedPassword,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.write();
        if guard
            .users
            .values()
            .any(|u| u.id != id && u.email == *email)
        {
            return Err(StoreError::Conflict(format!("email {email} already registered")));
        }
        let user = guard
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        user.email = email.clone();
        user.hashed_password = hashed_password.clone();
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let mut guard = self.inner.write();
        if guard.users.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        guard.notes.retain(|_, (_, note)| note.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn get_note(&self, id: NoteId) -> Result<Note, StoreError> {
        self.inner
            .read()
            .notes
            .get(&id)
            .map(|(_, note)| note.clone())
            .ok_or_else(|| StoreError::NotFound(format!("note {id}")))
    }

    async fn get_notes_by_user(&self, user_id: UserId) -> Result<Vec<Note>, StoreError> {
        let guard = self.inner.read();
        let mut owned: Vec<&(u64, Note)> = guard
            .notes
            .values()
            .filter(|(_, note)| note.user_id == user_id)
            .collect();
        owned.sort_by_key(|(seq, _)| *seq);
        Ok(owned.into_iter().map(|(_, note)| note.clone()).collect())
    }

    async fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        body: &str,
    ) -> Result<Note, StoreError> {
        let mut guard = self.inner.write();
        if !guard.users.contains_key(&user_id) {
            return Err(StoreError::InvalidReference(format!("user {user_id}")));
        }
        let note = Note {
            id: NoteId::new(),
            user_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let seq = guard.next_seq;
        guard.next_seq += 1;
        guard.notes.insert(note.id, (seq, note.clone()));
        Ok(note)
    }

    async fn update_note(&self, id: NoteId, title: &str, body: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.write();
        let (_, note) = guard
            .notes
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("note {id}")))?;
        note.title = title.to_string();
        note.body = body.to_string();
        Ok(())
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), StoreError> {
        self.inner
            .write()
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("note {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn digest() -> HashedPassword {
        HashedPassword::new("$2b$04$fakefakefakefakefakefu")
    }

    #[tokio::test]
    async fn create_then_lookup_user() {
        let store = MemoryStore::new();
        let created = store.create_user(&email("u1@test.com"), &digest()).await.unwrap();

        let by_email = store.get_user_by_email(&email("u1@test.com")).await.unwrap();
        assert_eq!(by_email.id, created.id);
        let by_id = store.get_user_by_id(created.id).await.unwrap();
        assert_eq!(by_id.email, created.email);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_user_by_email(&email("ghost@test.com")).await.unwrap_err();
        assert!(err.is_not_found());
        let err = store.get_user_by_id(UserId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(&email("dup@test.com"), &digest()).await.unwrap();
        let err = store.create_user(&email("dup@test.com"), &digest()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create_user(&email("Case@test.com"), &digest()).await.unwrap();
        store.create_user(&email("case@test.com"), &digest()).await.unwrap();
        assert_eq!(store.user_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_duplicate_registration_keeps_one_row() {
        let store = MemoryStore::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create_user(&email("race@test.com"), &digest()).await
            }));
        }
        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn update_user_rejects_taken_email_and_missing_id() {
        let store = MemoryStore::new();
        let a = store.create_user(&email("a@test.com"), &digest()).await.unwrap();
        store.create_user(&email("b@test.com"), &digest()).await.unwrap();

        let err = store.update_user(a.id, &email("b@test.com"), &digest()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Keeping one's own email is not a conflict.
        store.update_user(a.id, &email("a@test.com"), &digest()).await.unwrap();

        let err = store
            .update_user(UserId::new(), &email("c@test.com"), &digest())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_user_cascades_to_notes() {
        let store = MemoryStore::new();
        let a = store.create_user(&email("a@test.com"), &digest()).await.unwrap();
        let b = store.create_user(&email("b@test.com"), &digest()).await.unwrap();
        store.create_note(a.id, "t", "b").await.unwrap();
        let kept = store.create_note(b.id, "t", "b").await.unwrap();

        store.delete_user(a.id).await.unwrap();
        assert_eq!(store.note_count(), 1);
        assert!(store.get_note(kept.id).await.is_ok());

        let err = store.delete_user(a.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn note_for_unknown_owner_is_invalid_reference() {
        let store = MemoryStore::new();
        let err = store.create_note(UserId::new(), "t", "b").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference(_)));
        assert_eq!(store.note_count(), 0);
    }

    #[tokio::test]
    async fn notes_by_user_are_scoped_and_ordered() {
        let store = MemoryStore::new();
        let a = store.create_user(&email("a@test.com"), &digest()).await.unwrap();
        let b = store.create_user(&email("b@test.com"), &digest()).await.unwrap();

        for title in ["first", "second", "third"] {
            store.create_note(a.id, title, "").await.unwrap();
        }
        store.create_note(b.id, "other", "").await.unwrap();

        let titles: Vec<String> = store
            .get_notes_by_user(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);

        let none = store.get_notes_by_user(UserId::new()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_note() {
        let store = MemoryStore::new();
        let a = store.create_user(&email("a@test.com"), &digest()).await.unwrap();
        let note = store.create_note(a.id, "T", "B").await.unwrap();

        store.update_note(note.id, "T2", "B2").await.unwrap();
        let fetched = store.get_note(note.id).await.unwrap();
        assert_eq!(fetched.title, "T2");
        assert_eq!(fetched.body, "B2");
        assert_eq!(fetched.created_at, note.created_at);

        store.delete_note(note.id).await.unwrap();
        assert!(store.get_note(note.id).await.unwrap_err().is_not_found());
        assert!(store.delete_note(note.id).await.unwrap_err().is_not_found());
        assert!(store
            .update_note(note.id, "x", "y")
            .await
            .unwrap_err()
            .is_not_found());
    }
}
