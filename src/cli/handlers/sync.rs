//! Optimistic command flow
//!
//! A CLI invocation ends when its command returns, so mutating commands
//! apply the local change, then hold the process open with a spinner until
//! the background sync settles one way or the other.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::sync::{SyncManager, SyncOperation};

/// How a background sync ended
#[derive(Debug)]
pub enum SyncOutcome<T> {
    /// The server accepted the change
    Synced(T),
    /// Retries ran out; the local change stays in place
    Failed { error: Error, attempts: u32 },
    /// Superseded or cancelled before settling
    Abandoned,
}

/// Apply `local` now, sync with `remote` in the background, and wait for
/// the outcome.
///
/// `reconcile` runs inside the success callback, before this returns.
pub async fn run_optimistic<'a, T, L, R, Fut, C>(
    manager: &SyncManager,
    id: String,
    local: L,
    remote: R,
    reconcile: C,
    message: &str,
) -> SyncOutcome<T>
where
    T: Send + 'static,
    L: FnOnce() + 'a,
    R: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    C: FnOnce(&T) + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let error_tx = tx.clone();

    let operation = SyncOperation::new(local, remote, move |error, attempts| {
        let _ = error_tx.send(SyncOutcome::Failed { error, attempts });
    })
    .with_id(id)
    .on_success(move |value: T| {
        reconcile(&value);
        let _ = tx.send(SyncOutcome::Synced(value));
    });

    manager.execute(operation);

    let spinner = spinner(message);
    let outcome = rx.recv().await.unwrap_or(SyncOutcome::Abandoned);
    spinner.finish_and_clear();
    outcome
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::sync::RetryPolicy;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_synced_runs_reconcile() {
        let manager = SyncManager::default();
        let reconciled = Arc::new(AtomicBool::new(false));
        let flag = reconciled.clone();
        let mut applied = false;

        let outcome = run_optimistic(
            &manager,
            "op".to_string(),
            || applied = true,
            || async { Ok(7) },
            move |v: &i32| flag.store(*v == 7, Ordering::SeqCst),
            "Saving",
        )
        .await;

        assert!(applied);
        assert!(matches!(outcome, SyncOutcome::Synced(7)));
        assert!(reconciled.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reports_attempts() {
        let manager = SyncManager::new(RetryPolicy::from_secs(&[1, 1]));

        let outcome = run_optimistic(
            &manager,
            "op".to_string(),
            || {},
            || async { Err::<(), _>(ApiError::ServerError("boom".to_string()).into()) },
            |_| {},
            "Saving",
        )
        .await;

        match outcome {
            SyncOutcome::Failed { error, attempts } => {
                assert_eq!(attempts, 3);
                assert!(error.is_transient());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
