//! User persistence on the `users` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::{CredentialStore, Email, HashedPassword, StoreError, User, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;

/// [`CredentialStore`] backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Wrap a connected, migrated pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn get_user_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, hashed_password, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("get user {id}")))?;

        row.map(UserRow::into_record)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, hashed_password, created_at FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("get user {email}")))?;

        row.map(UserRow::into_record)
            .ok_or_else(|| StoreError::NotFound(format!("user {email}")))
    }

    async fn create_user(
        &self,
        email: &Email,
        hashed_password: &HashedPassword,
    ) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, email, hashed_password, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, email, hashed_password, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email.as_str())
        .bind(hashed_password.expose())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("create user {email}")))?;

        Ok(row.into_record())
    }

    async fn update_user(
        &self,
        id: UserId,
        email: &Email,
        hashed_password: &HashedPassword,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET email = $1, hashed_password = $2 WHERE id = $3")
            .bind(email.as_str())
            .bind(hashed_password.expose())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, &format!("update user {id}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, &format!("delete user {id}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> User {
        User {
            id: UserId::from_uuid(self.id),
            email: Email::from_trusted(self.email),
            hashed_password: HashedPassword::new(self.hashed_password),
            created_at: self.created_at,
        }
    }
}
