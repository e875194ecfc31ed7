//! # Ownership-Scoped Note Operations
//!
//! Every operation starts from the [`Subject`] the gate resolved and maps
//! it to a user id. Reads and mutations of a single note then check that
//! the note belongs to that user. A note that exists but belongs to
//! someone else is reported exactly like one that does not exist.

use std::sync::Arc;
use std::time::Duration;

use notes_core::{CredentialStore, Email, Note, NoteId, NoteStore, StoreError, UserId};

use crate::auth::Subject;
use crate::enrichment::ContentEnricher;
use crate::error::AppError;

/// Separator placed between a note body and an appended quote.
const QUOTE_PREFIX: &str = "\nQuote of the day: ";

/// CRUD over notes on behalf of an authenticated subject.
pub struct NoteService {
    credentials: Arc<dyn CredentialStore>,
    notes: Arc<dyn NoteStore>,
    enricher: Option<Arc<dyn ContentEnricher>>,
    enrichment_timeout: Duration,
}

impl std::fmt::Debug for NoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteService")
            .field("enrichment", &self.enricher.is_some())
            .field("enrichment_timeout", &self.enrichment_timeout)
            .finish_non_exhaustive()
    }
}

impl NoteService {
    /// Build the service without enrichment.
    pub fn new(credentials: Arc<dyn CredentialStore>, notes: Arc<dyn NoteStore>) -> Self {
        Self {
            credentials,
            notes,
            enricher: None,
            enrichment_timeout: Duration::from_secs(2),
        }
    }

    /// Append a quote from `enricher` to every new note, waiting at most
    /// `timeout` for it.
    pub fn with_enricher(mut self, enricher: Arc<dyn ContentEnricher>, timeout: Duration) -> Self {
        self.enricher = Some(enricher);
        self.enrichment_timeout = timeout;
        self
    }

    /// Create a note owned by `subject`.
    pub async fn create(&self, subject: &Subject, title: &str, body: &str) -> Result<Note, AppError> {
        let owner = self.resolve_owner(subject).await?;
        let body = self.enrich(body).await;

        let note = self
            .notes
            .create_note(owner, title, &body)
            .await
            .map_err(|e| AppError::Internal(format!("create note for {subject}: {e}")))?;

        tracing::info!(note_id = %note.id, user_id = %owner, "note created");
        Ok(note)
    }

    /// All notes owned by `subject`.
    pub async fn get_own(&self, subject: &Subject) -> Result<Vec<Note>, AppError> {
        let owner = self.resolve_owner(subject).await?;
        self.notes
            .get_notes_by_user(owner)
            .await
            .map_err(|e| AppError::Internal(format!("list notes for {subject}: {e}")))
    }

    /// One note, if `subject` owns it.
    pub async fn get_by_id(&self, subject: &Subject, id: NoteId) -> Result<Note, AppError> {
        let owner = self.resolve_owner(subject).await?;
        self.owned_note(subject, owner, id).await
    }

    /// Replace title and body of a note `subject` owns.
    pub async fn update(
        &self,
        subject: &Subject,
        id: NoteId,
        title: &str,
        body: &str,
    ) -> Result<(), AppError> {
        let owner = self.resolve_owner(subject).await?;
        self.owned_note(subject, owner, id).await?;
        self.notes
            .update_note(id, title, body)
            .await
            .map_err(|e| store_error(subject, id, "update", e))?;
        tracing::info!(note_id = %id, user_id = %owner, "note updated");
        Ok(())
    }

    /// Delete a note `subject` owns.
    pub async fn delete(&self, subject: &Subject, id: NoteId) -> Result<(), AppError> {
        let owner = self.resolve_owner(subject).await?;
        self.owned_note(subject, owner, id).await?;
        self.notes
            .delete_note(id)
            .await
            .map_err(|e| store_error(subject, id, "delete", e))?;
        tracing::info!(note_id = %id, user_id = %owner, "note deleted");
        Ok(())
    }

    /// Map a verified subject to its user id. A valid token for a user that
    /// no longer exists is a consistency failure, not a client error.
    async fn resolve_owner(&self, subject: &Subject) -> Result<UserId, AppError> {
        let email = Email::from_trusted(subject.email());
        self.credentials
            .get_user_by_email(&email)
            .await
            .map(|user| user.id)
            .map_err(|e| AppError::Internal(format!("resolve subject {subject}: {e}")))
    }

    async fn owned_note(&self, subject: &Subject, owner: UserId, id: NoteId) -> Result<Note, AppError> {
        let note = self
            .notes
            .get_note(id)
            .await
            .map_err(|e| store_error(subject, id, "get", e))?;
        if !note.is_owned_by(&owner) {
            return Err(AppError::NotFound(format!(
                "note {id} is not owned by {subject}"
            )));
        }
        Ok(note)
    }

    /// Best-effort quote append. Never fails the caller.
    async fn enrich(&self, body: &str) -> String {
        let Some(enricher) = &self.enricher else {
            return body.to_string();
        };
        match tokio::time::timeout(self.enrichment_timeout, enricher.fetch_quote()).await {
            Ok(Ok(quote)) => format!("{body}{QUOTE_PREFIX}{quote}"),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "quote enrichment failed, storing note without quote");
                body.to_string()
            }
            Err(_) => {
                tracing::warn!(
                    timeout = ?self.enrichment_timeout,
                    "quote enrichment timed out, storing note without quote"
                );
                body.to_string()
            }
        }
    }
}

fn store_error(subject: &Subject, id: NoteId, op: &str, err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(_) => AppError::NotFound(format!("{op} note {id} for {subject}")),
        other => AppError::Internal(format!("{op} note {id} for {subject}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::EnrichmentError;
    use async_trait::async_trait;
    use notes_core::{HashedPassword, MemoryStore};

    struct FixedQuote(&'static str);

    #[async_trait]
    impl ContentEnricher for FixedQuote {
        async fn fetch_quote(&self) -> Result<String, EnrichmentError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingQuote;

    #[async_trait]
    impl ContentEnricher for FailingQuote {
        async fn fetch_quote(&self) -> Result<String, EnrichmentError> {
            Err(EnrichmentError::Status(500))
        }
    }

    struct SlowQuote;

    #[async_trait]
    impl ContentEnricher for SlowQuote {
        async fn fetch_quote(&self) -> Result<String, EnrichmentError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".into())
        }
    }

    async fn setup() -> (NoteService, MemoryStore, Subject, Subject) {
        let store = MemoryStore::new();
        let digest = HashedPassword::new("$2b$04$unusedunusedunusedunus");
        for email in ["a@test.com", "b@test.com"] {
            store
                .create_user(&Email::parse(email).unwrap(), &digest)
                .await
                .unwrap();
        }
        let service = NoteService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (service, store, Subject::new("a@test.com"), Subject::new("b@test.com"))
    }

    #[tokio::test]
    async fn create_list_update_delete_round_trip() {
        let (service, _, alice, _) = setup().await;

        let note = service.create(&alice, "T", "B").await.unwrap();
        let own = service.get_own(&alice).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].title, "T");

        service.update(&alice, note.id, "T2", "B").await.unwrap();
        assert_eq!(service.get_by_id(&alice, note.id).await.unwrap().title, "T2");

        service.delete(&alice, note.id).await.unwrap();
        let err = service.get_by_id(&alice, note.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn other_users_note_is_not_found_and_untouched() {
        let (service, _, alice, bob) = setup().await;
        let note = service.create(&alice, "mine", "secret").await.unwrap();

        let err = service.get_by_id(&bob, note.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.update(&bob, note.id, "hijacked", "x").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.delete(&bob, note.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let unchanged = service.get_by_id(&alice, note.id).await.unwrap();
        assert_eq!(unchanged.title, "mine");
        assert_eq!(unchanged.body, "secret");
        assert!(service.get_own(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_and_missing_notes_are_indistinguishable() {
        let (service, _, alice, bob) = setup().await;
        let note = service.create(&alice, "t", "b").await.unwrap();

        let foreign = service.get_by_id(&bob, note.id).await.unwrap_err();
        let missing = service.get_by_id(&bob, NoteId::new()).await.unwrap_err();
        assert_eq!(foreign.status_and_label(), missing.status_and_label());
    }

    #[tokio::test]
    async fn vanished_subject_is_internal() {
        let (service, _, _, _) = setup().await;
        let ghost = Subject::new("ghost@test.com");
        let err = service.get_own(&ghost).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        let err = service.create(&ghost, "t", "b").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn enrichment_appends_quote() {
        let (service, _, alice, _) = setup().await;
        let service = service.with_enricher(Arc::new(FixedQuote("Be kind.")), Duration::from_secs(1));
        let note = service.create(&alice, "t", "body").await.unwrap();
        assert_eq!(note.body, "body\nQuote of the day: Be kind.");
    }

    #[tokio::test]
    async fn enrichment_failure_keeps_original_body() {
        let (service, store, alice, _) = setup().await;
        let service = service.with_enricher(Arc::new(FailingQuote), Duration::from_secs(1));
        let note = service.create(&alice, "t", "body").await.unwrap();
        assert_eq!(note.body, "body");
        assert_eq!(store.note_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn enrichment_timeout_keeps_original_body() {
        let (service, _, alice, _) = setup().await;
        let service = service.with_enricher(Arc::new(SlowQuote), Duration::from_millis(100));
        let note = service.create(&alice, "t", "body").await.unwrap();
        assert_eq!(note.body, "body");
    }
}
