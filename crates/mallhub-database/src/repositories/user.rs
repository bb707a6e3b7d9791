//! `UserStore` for PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_entity::user::{NewUser, User};

use super::{PgTransaction, db_error, query_error};
use crate::store::UserStore;

#[async_trait]
impl UserStore for PgTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find user by id"))
    }

    async fn find_by_username(&mut self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find user by username"))
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find user by email"))
    }

    async fn find_by_phone(&mut self, phone: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_error("Failed to find user by phone"))
    }

    async fn create(&mut self, data: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, phone, nickname, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.nickname)
        .bind(&data.password_hash)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create user", "user already exists"))
    }

    async fn update_password(&mut self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&mut *self.tx)
                .await
                .map_err(query_error("Failed to update password"))?;
        Ok(result.rows_affected() > 0)
    }
}
