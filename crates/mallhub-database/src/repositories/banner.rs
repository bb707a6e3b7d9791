//! `BannerStore` for PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::banner::{Banner, BannerPlatform, NewBanner};

use super::{PgTransaction, query_error};
use crate::store::BannerStore;

#[async_trait]
impl BannerStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Banner>> {
        sqlx::query_as::<_, Banner>("SELECT * FROM banners WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find banner"))
    }

    async fn list(
        &mut self,
        platform: Option<BannerPlatform>,
        query: Query,
    ) -> AppResult<Paged<Banner>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM banners WHERE ($1::banner_platform IS NULL OR platform = $1)",
        )
        .bind(platform)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(query_error("Failed to count banners"))?;

        let rows = sqlx::query_as::<_, Banner>(
            "SELECT * FROM banners WHERE ($1::banner_platform IS NULL OR platform = $1) \
             ORDER BY priority DESC, created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(platform)
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list banners"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn create(&mut self, data: NewBanner) -> AppResult<Banner> {
        sqlx::query_as::<_, Banner>(
            "INSERT INTO banners (image, href, platform, description, priority) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.image)
        .bind(&data.href)
        .bind(data.platform)
        .bind(&data.description)
        .bind(data.priority)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(query_error("Failed to create banner"))
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to delete banner"))?;
        Ok(result.rows_affected() > 0)
    }
}
