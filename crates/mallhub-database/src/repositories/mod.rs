//! PostgreSQL implementation of the store traits.
//!
//! Every table store is implemented directly on [`PgTransaction`], so all
//! of them share one `sqlx` transaction.

pub mod address;
pub mod admin;
pub mod banner;
pub mod message;
pub mod notification;
pub mod report;
pub mod user;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;

use crate::store::{
    AddressStore, AdminStore, BannerStore, Database, MessageStore, NotificationStore, ReportStore,
    Transaction, UserStore,
};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// [`Database`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn begin(&self) -> AppResult<Box<dyn Transaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))?;
        debug!("Transaction started");
        Ok(Box::new(PgTransaction { tx }))
    }
}

/// One PostgreSQL transaction.
pub struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl Transaction for PgTransaction {
    fn users(&mut self) -> &mut dyn UserStore {
        self
    }

    fn admins(&mut self) -> &mut dyn AdminStore {
        self
    }

    fn addresses(&mut self) -> &mut dyn AddressStore {
        self
    }

    fn banners(&mut self) -> &mut dyn BannerStore {
        self
    }

    fn messages(&mut self) -> &mut dyn MessageStore {
        self
    }

    fn notifications(&mut self) -> &mut dyn NotificationStore {
        self
    }

    fn reports(&mut self) -> &mut dyn ReportStore {
        self
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}

/// Map a query error, turning unique violations into `Conflict`.
pub(crate) fn db_error(context: &str, conflict: &str) -> impl FnOnce(sqlx::Error) -> AppError {
    let context = context.to_string();
    let conflict = conflict.to_string();
    move |e| {
        let is_unique = e
            .as_database_error()
            .and_then(|d| d.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);
        if is_unique {
            AppError::with_source(ErrorKind::Conflict, conflict, e)
        } else {
            AppError::with_source(ErrorKind::Database, context, e)
        }
    }
}

/// Map a query error that cannot be a unique violation.
pub(crate) fn query_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
