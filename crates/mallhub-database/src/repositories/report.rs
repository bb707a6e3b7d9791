//! `ReportStore` for PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::report::{NewReport, Report, ReportStatus};

use super::{PgTransaction, query_error};
use crate::store::ReportStore;

#[async_trait]
impl ReportStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find report"))
    }

    async fn find_for_user(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1 AND uid = $2")
            .bind(id)
            .bind(uid)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find report"))
    }

    async fn list_for_user(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Report>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE uid = $1")
            .bind(uid)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count reports"))?;

        let rows = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE uid = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(uid)
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list reports"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Report>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count reports"))?;

        let rows = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list reports"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn create(&mut self, data: NewReport) -> AppResult<Report> {
        sqlx::query_as::<_, Report>(
            "INSERT INTO reports (uid, title, content, type, screenshots) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.uid)
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.kind)
        .bind(&data.screenshots)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(query_error("Failed to create report"))
    }

    async fn update_status(
        &mut self,
        id: Uuid,
        status: ReportStatus,
    ) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>(
            "UPDATE reports SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_error("Failed to update report"))
    }
}
