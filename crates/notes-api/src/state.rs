//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Everything here is immutable after startup;
//! mutable data lives behind the store traits.

use std::sync::Arc;

use notes_crypto::TokenCodec;

use crate::services::{AuthService, NoteService};

/// Handles to the services, cheap to clone per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration and login.
    pub auth: Arc<AuthService>,
    /// Ownership-scoped note operations.
    pub notes: Arc<NoteService>,
    /// Token verifier shared with the authorization gate.
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    /// Assemble state from already-built services.
    pub fn new(auth: AuthService, notes: NoteService, codec: Arc<TokenCodec>) -> Self {
        Self {
            auth: Arc::new(auth),
            notes: Arc::new(notes),
            codec,
        }
    }
}
