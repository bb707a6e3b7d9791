//! `NotificationStore` for PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::notification::{NewNotification, Notification, NotificationMark};

use super::{PgTransaction, db_error, query_error};
use crate::store::NotificationStore;

#[async_trait]
impl NotificationStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find notification"))
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Notification>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count notifications"))?;

        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list notifications"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn create(&mut self, data: NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (author, title, content, note) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.author)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.note)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(query_error("Failed to create notification"))
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM notification_marks WHERE notification_id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to delete notification marks"))?;

        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to delete notification"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_mark(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<NotificationMark>> {
        sqlx::query_as::<_, NotificationMark>(
            "SELECT * FROM notification_marks WHERE notification_id = $1 AND uid = $2 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(id)
        .bind(uid)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_error("Failed to find notification mark"))
    }

    async fn find_marks(&mut self, ids: &[Uuid], uid: Uuid) -> AppResult<Vec<NotificationMark>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, NotificationMark>(
            "SELECT * FROM notification_marks WHERE uid = $1 AND notification_id = ANY($2)",
        )
        .bind(uid)
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to load notification marks"))
    }

    async fn create_mark(&mut self, id: Uuid, uid: Uuid) -> AppResult<NotificationMark> {
        sqlx::query_as::<_, NotificationMark>(
            "INSERT INTO notification_marks (notification_id, uid) VALUES ($1, $2) RETURNING *",
        )
        .bind(id)
        .bind(uid)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error(
            "Failed to create notification mark",
            "notification already read",
        ))
    }
}
