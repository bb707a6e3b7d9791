//! The transactional scope every operation runs in.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use mallhub_core::config::UnitOfWorkConfig;
use mallhub_core::result::AppResult;
use mallhub_database::store::{Database, Transaction};
use mallhub_database::with_transaction;

/// A database handle plus the timeout applied to each transaction body.
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    db: Arc<dyn Database>,
    timeout: Duration,
}

impl UnitOfWork {
    /// Creates a unit of work over `db`.
    pub fn new(db: Arc<dyn Database>, config: &UnitOfWorkConfig) -> Self {
        Self {
            db,
            timeout: config.timeout(),
        }
    }

    /// Run `body` in a fresh transaction; see [`with_transaction`].
    pub async fn run<T, F>(&self, body: F) -> AppResult<T>
    where
        T: Send,
        F: for<'a> FnOnce(&'a mut (dyn Transaction + 'static)) -> BoxFuture<'a, AppResult<T>>
            + Send,
    {
        with_transaction(self.db.as_ref(), self.timeout, body).await
    }
}
