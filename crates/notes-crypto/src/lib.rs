//! # notes-crypto: Credential Primitives for the Notes Service
//!
//! - **Password hashing** with bcrypt ([`PasswordHasher`]). Salted, with a
//!   configurable work factor. Callers on an async runtime should run hash
//!   and verify on a blocking thread.
//! - **Session tokens** as HS256 JWTs ([`TokenCodec`]). A token asserts a
//!   subject (the user's email) until its expiry; there is no revocation.
//! - **Signing secret** handling ([`SigningSecret`]): zeroized on drop and
//!   redacted in `Debug`.
//!
//! Nothing in this crate reads configuration or the environment. Keys and
//! work factors are passed in at construction.

pub mod error;
pub mod password;
pub mod token;

pub use error::{CryptoError, TokenError};
pub use password::{PasswordHasher, DEFAULT_COST, MAX_PASSWORD_BYTES};
pub use token::{Claims, SigningSecret, TokenCodec};
