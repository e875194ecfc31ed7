//! # Session Tokens
//!
//! HS256 JWTs asserting a subject until an expiry. The signing secret is
//! fixed at construction; there is no key rotation and no revocation list.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that the clock
//! can be injected ([`TokenCodec::verify_at`]) and so that a token is
//! rejected the instant `now >= exp`, with no leeway.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TokenError;

// ── Signing secret ─────────────────────────────────────────────────────────

/// HMAC key for token signatures.
///
/// Zeroized on drop. `Debug` prints only the length.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret([REDACTED; {} bytes])", self.0.len())
    }
}

// ── Claims ─────────────────────────────────────────────────────────────────

/// The claim set carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,
    /// Same value as `sub`.
    pub email: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

// ── Codec ──────────────────────────────────────────────────────────────────

/// Issues and verifies HS256 session tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: SigningSecret,
}

impl TokenCodec {
    /// Create a codec bound to `secret`.
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issue a token for `subject` as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| iat.checked_add(secs))
            .ok_or_else(|| TokenError::Encoding(format!("ttl {ttl:?} overflows expiry")))?;

        let claims = Claims {
            sub: subject.to_string(),
            email: subject.to_string(),
            iat,
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify `token` against the wall clock.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as if the current time were `now`.
    ///
    /// The signature is checked before expiry, so a forged expired token
    /// reports `InvalidSignature`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed("empty subject".into()));
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired {
                expires_at: claims.exp,
            });
        }
        Ok(claims)
    }
}
