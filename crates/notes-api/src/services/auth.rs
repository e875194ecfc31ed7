//! # Registration and Login
//!
//! [`AuthService`] owns the credential rules: address syntax, password
//! bounds, email uniqueness, bcrypt hashing, and token issuance. Route
//! handlers only translate forms into calls.

use std::sync::Arc;
use std::time::Duration;

use notes_core::{CredentialStore, Email, HashedPassword, StoreError, User};
use notes_crypto::{CryptoError, PasswordHasher, TokenCodec, MAX_PASSWORD_BYTES};

use crate::error::AppError;

/// Plaintext hashed once at construction so that a login for an unknown
/// email spends the same bcrypt time as a real one.
const TIMING_DUMMY_PASSWORD: &str = "timing-equalization-dummy";

/// Registers and authenticates users.
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
    dummy_hash: HashedPassword,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Build the service. Computes the timing dummy hash synchronously.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Result<Self, CryptoError> {
        let dummy_hash = hasher.hash(TIMING_DUMMY_PASSWORD)?;
        Ok(Self {
            credentials,
            hasher,
            codec,
            token_ttl,
            dummy_hash,
        })
    }

    /// Create a user with the given credentials.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AppError::InvalidParams("empty password".into()));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::InvalidParams(format!(
                "password is {} bytes, at most {MAX_PASSWORD_BYTES} allowed",
                password.len()
            )));
        }

        match self.credentials.get_user_by_email(&email).await {
            Ok(_) => {
                return Err(AppError::Conflict(format!("email {email} already registered")));
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                return Err(AppError::Internal(format!("register {email}: lookup failed: {e}")));
            }
        }

        let hashed = self.hash_blocking(password.to_string()).await?;

        let user = self
            .credentials
            .create_user(&email, &hashed)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(detail) => AppError::Conflict(detail),
                other => AppError::Internal(format!("register {email}: insert failed: {other}")),
            })?;

        tracing::info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = match Email::parse(email) {
            Ok(email) => match self.credentials.get_user_by_email(&email).await {
                Ok(user) => Some(user),
                Err(StoreError::NotFound(_)) => None,
                Err(e) => {
                    return Err(AppError::Internal(format!("login {email}: lookup failed: {e}")));
                }
            },
            Err(_) => None,
        };

        let Some(user) = user else {
            // Spend a verification anyway; the result is irrelevant.
            let _ = self
                .verify_blocking(password.to_string(), self.dummy_hash.clone())
                .await;
            return Err(AppError::InvalidCredentials(format!("login {email}: unknown user")));
        };

        let matches = self
            .verify_blocking(password.to_string(), user.hashed_password.clone())
            .await?;
        if !matches {
            return Err(AppError::InvalidCredentials(format!("login {email}: wrong password")));
        }

        let token = self
            .codec
            .issue(user.email.as_str(), self.token_ttl)
            .map_err(|e| AppError::Internal(format!("login {email}: token issue failed: {e}")))?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    async fn hash_blocking(&self, password: String) -> Result<HashedPassword, AppError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    async fn verify_blocking(
        &self,
        password: String,
        hashed: HashedPassword,
    ) -> Result<bool, AppError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| AppError::Internal(format!("verify task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))
    }
}
