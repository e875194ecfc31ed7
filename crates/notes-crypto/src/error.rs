//! # Cryptographic Error Types
//!
//! Structured errors for password hashing and token handling.

use thiserror::Error;

/// Errors from password hashing.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The bcrypt work factor is outside the supported range.
    #[error("invalid bcrypt cost {0}: expected 4..=31")]
    InvalidCost(u32),

    /// The password exceeds bcrypt's input limit.
    #[error("password is {0} bytes, bcrypt accepts at most 72")]
    PasswordTooLong(usize),

    /// The bcrypt implementation failed (malformed stored digest, etc.).
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Errors from issuing or verifying a session token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signature does not match the configured key.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token's expiry is at or before the verification time.
    #[error("token expired at {expires_at}")]
    Expired {
        /// Expiry as a Unix timestamp.
        expires_at: i64,
    },

    /// The token could not be decoded or lacks a required claim.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signing failed while issuing a token.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}
