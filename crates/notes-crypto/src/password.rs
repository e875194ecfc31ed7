//! # Password Hashing
//!
//! bcrypt with a configurable cost. Each hash embeds a fresh random salt,
//! so hashing the same password twice yields different digests.
//!
//! Both operations are CPU-bound (tens of milliseconds at the default
//! cost). Async callers should wrap them in `spawn_blocking`.

use notes_core::HashedPassword;

use crate::error::CryptoError;

/// Default bcrypt work factor.
pub const DEFAULT_COST: u32 = 10;

/// bcrypt ignores input past this many bytes; longer passwords are rejected
/// instead of silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted one-way password hasher.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given work factor (4..=31).
    pub fn new(cost: u32) -> Result<Self, CryptoError> {
        if !(4..=31).contains(&cost) {
            return Err(CryptoError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    /// The configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password.
    pub fn hash(&self, password: &str) -> Result<HashedPassword, CryptoError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(CryptoError::PasswordTooLong(password.len()));
        }
        let digest = bcrypt::hash(password, self.cost)?;
        Ok(HashedPassword::new(digest))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// `Ok(false)` on mismatch; `Err` only if the digest itself is malformed.
    pub fn verify(&self, password: &str, hashed: &HashedPassword) -> Result<bool, CryptoError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(bcrypt::verify(password, hashed.expose())?)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}
