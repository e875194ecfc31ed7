//! # Service Bootstrap
//!
//! Turns a validated [`AppConfig`] and an optional database pool into an
//! [`AppState`].
//!
//! ## Bootstrap Sequence
//!
//! 1. **Select storage**: Postgres stores if a pool is given, otherwise
//!    one shared [`MemoryStore`] for both users and notes.
//! 2. **Build credentials**: signing secret, token codec, bcrypt hasher.
//! 3. **Build enrichment**: quote client, only if enabled.
//! 4. **Assemble services** and log the resulting mode.

use std::sync::Arc;

use notes_core::{CredentialStore, MemoryStore, NoteStore};
use notes_crypto::{CryptoError, PasswordHasher, SigningSecret, TokenCodec};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{PgCredentialStore, PgNoteStore};
use crate::enrichment::{EnrichmentError, QuoteClient};
use crate::services::{AuthService, NoteService};
use crate::state::AppState;

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Password hasher could not be built.
    #[error("credential setup failed: {0}")]
    Crypto(#[from] CryptoError),

    /// Quote client could not be built.
    #[error("enrichment setup failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    /// Enrichment URL does not parse.
    #[error("invalid enrichment url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Build application state from configuration.
pub fn bootstrap(config: &AppConfig, pool: Option<PgPool>) -> Result<AppState, BootstrapError> {
    let (credentials, notes): (Arc<dyn CredentialStore>, Arc<dyn NoteStore>) = match pool {
        Some(pool) => {
            tracing::info!("using PostgreSQL storage");
            let credentials: Arc<dyn CredentialStore> =
                Arc::new(PgCredentialStore::new(pool.clone()));
            let notes: Arc<dyn NoteStore> = Arc::new(PgNoteStore::new(pool));
            (credentials, notes)
        }
        None => {
            tracing::info!("using in-memory storage");
            let store = MemoryStore::new();
            let credentials: Arc<dyn CredentialStore> = Arc::new(store.clone());
            let notes: Arc<dyn NoteStore> = Arc::new(store);
            (credentials, notes)
        }
    };
    build_state(config, credentials, notes)
}

/// Build application state over the given stores.
pub fn build_state(
    config: &AppConfig,
    credentials: Arc<dyn CredentialStore>,
    notes: Arc<dyn NoteStore>,
) -> Result<AppState, BootstrapError> {
    let app = &config.application;
    let codec = Arc::new(TokenCodec::new(SigningSecret::new(app.jwt_key.as_bytes())));
    let hasher = PasswordHasher::new(app.password_cost)?;
    if app.has_short_signing_key() {
        tracing::warn!(
            key_bytes = app.jwt_key.len(),
            "signing key is shorter than the recommended 32 bytes"
        );
    }

    let auth = AuthService::new(
        Arc::clone(&credentials),
        hasher,
        Arc::clone(&codec),
        app.token_ttl(),
    )?;

    let mut note_service = NoteService::new(credentials, notes);
    let enrichment = &config.enrichment;
    if enrichment.enabled {
        let url: url::Url = enrichment.url.parse()?;
        let client = QuoteClient::new(url, enrichment.timeout())?;
        note_service = note_service.with_enricher(Arc::new(client), enrichment.timeout());
        tracing::info!(url = %enrichment.url, timeout_ms = enrichment.timeout_ms, "quote enrichment enabled");
    }

    tracing::info!(
        token_ttl_secs = app.token_ttl_secs,
        password_cost = app.password_cost,
        "services ready"
    );
    Ok(AppState::new(auth, note_service, codec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.application.jwt_key = "bootstrap-test-key".into();
        config.application.password_cost = 4;
        config
    }

    #[test]
    fn in_memory_bootstrap_succeeds() {
        assert!(bootstrap(&config(), None).is_ok());
    }

    #[test]
    fn short_signing_key_only_warns() {
        let config = config();
        assert!(config.application.has_short_signing_key());
        assert!(build_state(&config, Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())).is_ok());
    }

    #[test]
    fn enrichment_enabled_builds_client() {
        let mut config = config();
        config.enrichment.enabled = true;
        let state = bootstrap(&config, None).unwrap();
        assert!(format!("{:?}", state.notes).contains("enrichment: true"));
    }

    #[test]
    fn bad_cost_is_rejected() {
        let mut config = config();
        config.application.password_cost = 99;
        assert!(matches!(
            bootstrap(&config, None),
            Err(BootstrapError::Crypto(CryptoError::InvalidCost(99)))
        ));
    }

    #[test]
    fn bad_enrichment_url_is_rejected() {
        let mut config = config();
        config.enrichment.enabled = true;
        config.enrichment.url = "::not a url::".into();
        assert!(matches!(bootstrap(&config, None), Err(BootstrapError::InvalidUrl(_))));
    }
}
