//! Bounded execution of the store operation.
//!
//! The caller's context must not block indefinitely on a wedged catalog or
//! storage backend, so the store future runs on its own task under a
//! wall-clock budget. There is no cancellation: when the budget elapses the
//! task is abandoned and keeps running, and the caller gets the distinct
//! [`StoreError::TimedOut`] outcome rather than a result.

use std::future::Future;
use std::time::Duration;

use crate::error::{Result, StoreError};

/// Runs `operation` on a separate task, waiting at most `budget`.
///
/// Within budget, the operation's result or error propagates unchanged.
/// Past the budget the task is abandoned — it may still complete and mutate
/// durable state — and [`StoreError::TimedOut`] is returned. Callers must
/// treat that as "unknown outcome", not failure.
///
/// # Errors
///
/// Returns the operation's own error, [`StoreError::TimedOut`] on budget
/// exhaustion, or [`StoreError::Internal`] when the task panicked.
pub async fn run_bounded<F, T>(operation: F, budget: Duration) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::spawn(operation);
    match tokio::time::timeout(budget, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(StoreError::internal(format!(
            "store task failed: {join_error}"
        ))),
        Err(_elapsed) => {
            tracing::warn!(?budget, "store operation exceeded its budget; task abandoned");
            Err(StoreError::TimedOut { budget })
        }
    }
}
