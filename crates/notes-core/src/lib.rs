#![deny(missing_docs)]

//! # notes-core: Foundational Types for the Notes Service
//!
//! Every other crate in the workspace depends on this one. It has no internal
//! crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** You cannot pass a [`NoteId`] where
//!    a [`UserId`] is expected.
//!
//! 2. **Validated at construction.** An [`Email`] only exists if it passed the
//!    address syntax check.
//!
//! 3. **Secrets never leak through formatting.** [`HashedPassword`] redacts
//!    itself in `Debug` and has no `Serialize` impl, so a [`User`] cannot be
//!    returned to a client or written to a log by accident.
//!
//! 4. **Storage is a capability.** [`CredentialStore`] and [`NoteStore`] are
//!    traits; the Postgres implementation lives in `notes-api`, the in-memory
//!    one in [`memory`]. Neither performs ownership checks.

pub mod error;
pub mod identity;
pub mod memory;
pub mod model;
pub mod store;

pub use error::{StoreError, ValidationError};
pub use identity::{Email, HashedPassword, NoteId, UserId};
pub use memory::MemoryStore;
pub use model::{Note, User};
pub use store::{CredentialStore, NoteStore};
