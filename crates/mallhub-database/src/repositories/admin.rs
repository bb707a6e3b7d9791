//! `AdminStore` for PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::admin::{Admin, AdminField, NewAdmin};

use super::{PgTransaction, db_error, query_error};
use crate::store::AdminStore;

#[async_trait]
impl AdminStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find admin by id"))
    }

    async fn find_by_username(&mut self, username: &str) -> AppResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find admin by username"))
    }

    async fn create(&mut self, data: NewAdmin) -> AppResult<Admin> {
        sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (username, name, password_hash, is_super) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.name)
        .bind(&data.password_hash)
        .bind(data.is_super)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create admin", "admin already exists"))
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Admin>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count admins"))?;

        let admins = sqlx::query_as::<_, Admin>(
            "SELECT * FROM admins ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list admins"))?;

        Ok(Paged::new(admins, total, query))
    }

    async fn delete_by_field(&mut self, field: AdminField, value: &str) -> AppResult<u64> {
        // Column names come from a closed enum; the value is always bound.
        let sql = match field {
            AdminField::Id => "DELETE FROM admins WHERE id::text = $1",
            AdminField::Username => "DELETE FROM admins WHERE username = $1",
        };
        let result = sqlx::query(sql)
            .bind(value)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to delete admin"))?;
        Ok(result.rows_affected())
    }
}
