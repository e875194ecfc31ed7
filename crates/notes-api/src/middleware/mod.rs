//! # Middleware
//!
//! Cross-cutting layers applied in [`crate::app`]. The authorization gate
//! lives in [`crate::auth`].

pub mod tracing_layer;
