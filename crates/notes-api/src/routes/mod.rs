//! # Route Modules
//!
//! - [`auth`]: `/login`, `/register` (unauthenticated)
//! - [`notes`]: `/api/notes`, `/api/note`, `/api/note/:id` (behind the gate)

pub mod auth;
pub mod notes;
