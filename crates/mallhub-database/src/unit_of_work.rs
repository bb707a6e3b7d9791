//! Transactional scope shared by every operation.
//!
//! [`with_transaction`] is the single recovery point of an operation: the
//! body's `Err`, a panic inside the body, and a timeout all end in a
//! rollback, and only a clean `Ok` commits.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error};

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;

use crate::store::{Database, Transaction};

/// Run `body` inside a fresh transaction.
///
/// The body must own everything it captures (clone `Arc`s and inputs
/// before the call); it only borrows the transaction handle.
///
/// * `Ok` → commit; a commit failure becomes the result.
/// * `Err` → rollback; the original error is returned.
/// * panic → rollback; an `Unknown` error is returned.
/// * `timeout` elapses → rollback; a `Timeout` error is returned.
///
/// A failed rollback is logged next to the original error, which is still
/// the one returned.
pub async fn with_transaction<T, F>(db: &dyn Database, timeout: Duration, body: F) -> AppResult<T>
where
    T: Send,
    F: for<'a> FnOnce(&'a mut (dyn Transaction + 'static)) -> BoxFuture<'a, AppResult<T>> + Send,
{
    let mut tx = db.begin().await?;

    let outcome = {
        let run = async { body(&mut *tx).await };
        match tokio::time::timeout(timeout, AssertUnwindSafe(run).catch_unwind()).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(AppError::unknown(panic_message(panic.as_ref()))),
            Err(_) => Err(AppError::timeout(format!(
                "operation timed out after {}s",
                timeout.as_secs()
            ))),
        }
    };

    match outcome {
        Ok(value) => {
            tx.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(
                    error = %err,
                    rollback_error = %rollback_err,
                    "Transaction rollback failed"
                );
            } else {
                debug!(error = %err, "Transaction rolled back");
            }
            Err(err)
        }
    }
}

/// Human-readable text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}
