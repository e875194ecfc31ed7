//! Note persistence on the `notes` table.
//!
//! No ownership filtering happens here; callers check `user_id`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::{Note, NoteId, NoteStore, StoreError, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;

/// [`NoteStore`] backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Wrap a connected, migrated pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn get_note(&self, id: NoteId) -> Result<Note, StoreError> {
        let row = sqlx::query_as::<_, NoteRow>(
            "SELECT id, user_id, title, body, created_at FROM notes WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("get note {id}")))?;

        row.map(NoteRow::into_record)
            .ok_or_else(|| StoreError::NotFound(format!("note {id}")))
    }

    async fn get_notes_by_user(&self, user_id: UserId) -> Result<Vec<Note>, StoreError> {
        let rows = sqlx::query_as::<_, NoteRow>(
            "SELECT id, user_id, title, body, created_at FROM notes
             WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("list notes for user {user_id}")))?;

        Ok(rows.into_iter().map(NoteRow::into_record).collect())
    }

    async fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        body: &str,
    ) -> Result<Note, StoreError> {
        let row = sqlx::query_as::<_, NoteRow>(
            "INSERT INTO notes (id, user_id, title, body, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, title, body, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_uuid())
        .bind(title)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("create note for user {user_id}")))?;

        Ok(row.into_record())
    }

    async fn update_note(&self, id: NoteId, title: &str, body: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE notes SET title = $1, body = $2 WHERE id = $3")
            .bind(title)
            .bind(body)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, &format!("update note {id}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("note {id}")));
        }
        Ok(())
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, &format!("delete note {id}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("note {id}")));
        }
        Ok(())
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct NoteRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl NoteRow {
    fn into_record(self) -> Note {
        Note {
            id: NoteId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            title: self.title,
            body: self.body,
            created_at: self.created_at,
        }
    }
}
