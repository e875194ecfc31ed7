//! # Services
//!
//! Business logic between the route handlers and the stores. Services
//! return [`AppError`](crate::error::AppError) so handlers can use `?`
//! directly.

pub mod auth;
pub mod notes;

pub use auth::AuthService;
pub use notes::NoteService;
