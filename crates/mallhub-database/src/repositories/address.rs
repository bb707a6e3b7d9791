//! `AddressStore` for PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::address::{Address, NewAddress};

use super::{PgTransaction, db_error, query_error};
use crate::store::AddressStore;

#[async_trait]
impl AddressStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Address>> {
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1 AND uid = $2")
            .bind(id)
            .bind(uid)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find address"))
    }

    async fn find_default(&mut self, uid: Uuid) -> AppResult<Option<Address>> {
        sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE uid = $1 AND is_default = TRUE LIMIT 1",
        )
        .bind(uid)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_error("Failed to find default address"))
    }

    async fn find_first(&mut self, uid: Uuid) -> AppResult<Option<Address>> {
        sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE uid = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(uid)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(query_error("Failed to find address"))
    }

    async fn list(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Address>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses WHERE uid = $1")
            .bind(uid)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_error("Failed to count addresses"))?;

        let rows = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE uid = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(uid)
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(query_error("Failed to list addresses"))?;

        Ok(Paged::new(rows, total, query))
    }

    async fn create(&mut self, data: NewAddress) -> AppResult<Address> {
        sqlx::query_as::<_, Address>(
            "INSERT INTO addresses \
             (uid, name, phone, province_code, city_code, area_code, address, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.uid)
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.province_code)
        .bind(&data.city_code)
        .bind(&data.area_code)
        .bind(&data.address)
        .bind(data.is_default)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error(
            "Failed to create address",
            "default address already exists",
        ))
    }

    async fn update(&mut self, address: &Address) -> AppResult<Address> {
        sqlx::query_as::<_, Address>(
            "UPDATE addresses SET name = $3, phone = $4, province_code = $5, city_code = $6, \
             area_code = $7, address = $8, is_default = $9, updated_at = NOW() \
             WHERE id = $1 AND uid = $2 RETURNING *",
        )
        .bind(address.id)
        .bind(address.uid)
        .bind(&address.name)
        .bind(&address.phone)
        .bind(&address.province_code)
        .bind(&address.city_code)
        .bind(&address.area_code)
        .bind(&address.address)
        .bind(address.is_default)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error(
            "Failed to update address",
            "default address already exists",
        ))?
        .ok_or_else(|| AppError::not_found("address does not exist"))
    }

    async fn set_default_flag(&mut self, id: Uuid, is_default: bool) -> AppResult<()> {
        sqlx::query("UPDATE addresses SET is_default = $2 WHERE id = $1")
            .bind(id)
            .bind(is_default)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to update default address"))?;
        Ok(())
    }

    async fn delete(&mut self, id: Uuid, uid: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND uid = $2")
            .bind(id)
            .bind(uid)
            .execute(&mut *self.tx)
            .await
            .map_err(query_error("Failed to delete address"))?;
        Ok(result.rows_affected() > 0)
    }
}
