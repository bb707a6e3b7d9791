//! `MessageStore` for PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::message::{Message, NewMessage};

use super::{PgTransaction, query_error};
use crate::store::MessageStore;

#[async_trait]
impl MessageStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find message"))
    }

    async fn find_for_user(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1 AND uid = $2")
            .bind(id)
            .bind(uid)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find message"))
    }

    async fn list_for_user(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Message>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE uid = $1")
            .bind(uid)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count messages"))?;

        let rows = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE uid = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(uid)
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list messages"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Message>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count messages"))?;

        let rows = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list messages"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn create(&mut self, data: NewMessage) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (uid, title, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.uid)
        .bind(&data.title)
        .bind(&data.content)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(query_error("Failed to create message"))
    }

    async fn mark_read(&mut self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>(
            "UPDATE messages SET read = TRUE, read_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_error("Failed to mark message read"))
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to delete message"))?;
        Ok(result.rows_affected() > 0)
    }
}
