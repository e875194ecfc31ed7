//! # Database Persistence Layer
//!
//! Postgres implementations of the `notes-core` store traits via SQLx.
//!
//! The database layer is **optional**. When a database URL is configured
//! the service persists users and notes to PostgreSQL; otherwise it runs
//! on the in-memory store (suitable for development and testing).
//!
//! Uniqueness of `users.email` and the `notes.user_id` foreign key are
//! enforced by the schema (see `migrations/`). Violations are translated to
//! [`StoreError::Conflict`] and [`StoreError::InvalidReference`].

pub mod notes;
pub mod users;

pub use notes::PgNoteStore;
pub use users::PgCredentialStore;

use notes_core::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `url` is `None` (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool(url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = url else {
        tracing::warn!(
            "no database configured, running in-memory only mode. \
             Users and notes will not survive restarts."
        );
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Translate a SQLx error into the store taxonomy.
pub(crate) fn map_sqlx_error(err: sqlx::Error, context: &str) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound(context.to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{context}: {}", db.message()))
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::InvalidReference(format!("{context}: {}", db.message()))
        }
        _ => {
            tracing::error!(error = %err, context, "database operation failed");
            StoreError::Backend(format!("{context}: {err}"))
        }
    }
}
