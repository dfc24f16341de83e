//! Optimistic update manager
//!
//! Applies a local mutation immediately, then reconciles with the backend in
//! a background task, retrying on the [`RetryPolicy`] schedule. A failed sync
//! is reported through `on_error` and never reverts the local mutation.
//!
//! Operations may carry an id naming the logical resource they change (e.g.
//! one order's status). Issuing a new operation under an id that is still
//! pending supersedes the old one: its retry timer is cancelled and none of
//! its callbacks will fire, even if its in-flight request resolves later.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::BoxFuture;

use super::schedule::{RetryHandle, RetryPolicy};
use crate::error::{Error, Result};

type RemoteSync<T> = Box<dyn FnMut() -> BoxFuture<'static, Result<T>> + Send>;
type SuccessCallback<T> = Box<dyn FnOnce(T) + Send>;
type ErrorCallback = Box<dyn FnOnce(Error, u32) + Send>;

/// One optimistic mutation and its remote counterpart.
///
/// The local mutation only has to live until [`SyncManager::execute`]
/// returns, so it may borrow caller state.
pub struct SyncOperation<'a, T> {
    id: Option<String>,
    local_mutation: Box<dyn FnOnce() + 'a>,
    remote_sync: RemoteSync<T>,
    on_success: Option<SuccessCallback<T>>,
    on_error: ErrorCallback,
}

impl<'a, T: Send + 'static> SyncOperation<'a, T> {
    /// `remote_sync` is called once per attempt; `on_error` receives the last
    /// error and the number of attempts made once retries are exhausted.
    pub fn new<L, R, Fut, E>(local_mutation: L, mut remote_sync: R, on_error: E) -> Self
    where
        L: FnOnce() + 'a,
        R: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        E: FnOnce(Error, u32) + Send + 'static,
    {
        Self {
            id: None,
            local_mutation: Box::new(local_mutation),
            remote_sync: Box::new(move || remote_sync().boxed()),
            on_success: None,
            on_error: Box::new(on_error),
        }
    }

    /// Deduplicate against other operations on the same logical resource.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Called with the server's response after a successful sync.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }
}

/// Registry record for an identified operation
#[derive(Debug)]
struct PendingSync {
    token: u64,
    attempt: u32,
    handle: RetryHandle,
}

struct Inner {
    pending: Mutex<HashMap<String, PendingSync>>,
    next_token: AtomicU64,
    policy: RetryPolicy,
}

impl Inner {
    fn registry(&self) -> MutexGuard<'_, HashMap<String, PendingSync>> {
        // Every update is a single map operation; a poisoned map is still consistent.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the operation `token` is still the live one for `id`.
    fn is_current(&self, id: Option<&str>, token: u64, handle: &RetryHandle) -> bool {
        if handle.is_cancelled() {
            return false;
        }
        match id {
            Some(id) => self.registry().get(id).is_some_and(|p| p.token == token),
            None => true,
        }
    }

    /// Record the next attempt number, unless the operation has been
    /// superseded or cancelled.
    fn begin_attempt(&self, id: Option<&str>, token: u64, handle: &RetryHandle, attempt: u32) -> bool {
        if handle.is_cancelled() {
            return false;
        }
        let Some(id) = id else {
            return true;
        };
        match self.registry().get_mut(id) {
            Some(pending) if pending.token == token => {
                pending.attempt = attempt;
                true
            }
            _ => false,
        }
    }

    /// Remove the registration ahead of a terminal callback. Returns false if
    /// the operation is no longer current, in which case no callback may run.
    fn settle(&self, id: Option<&str>, token: u64, handle: &RetryHandle) -> bool {
        if handle.is_cancelled() {
            return false;
        }
        let Some(id) = id else {
            return true;
        };
        let mut registry = self.registry();
        match registry.get(id) {
            Some(pending) if pending.token == token => {
                registry.remove(id);
                true
            }
            _ => false,
        }
    }
}

/// Runs optimistic operations and tracks the ones still syncing.
///
/// Cloning shares the registry. Must be used from within a Tokio runtime.
#[derive(Clone)]
pub struct SyncManager {
    inner: Arc<Inner>,
}

impl Default for SyncManager {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl SyncManager {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(HashMap::new()),
                next_token: AtomicU64::new(1),
                policy,
            }),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.inner.policy
    }

    /// Apply the local mutation now and start syncing in the background.
    ///
    /// The local mutation has run by the time this returns. If the operation
    /// has an id, any pending operation with the same id is cancelled before
    /// this one is registered.
    pub fn execute<T: Send + 'static>(&self, operation: SyncOperation<'_, T>) {
        let SyncOperation {
            id,
            local_mutation,
            remote_sync,
            on_success,
            on_error,
        } = operation;

        local_mutation();

        let token = self.inner.next_token.fetch_add(1, Ordering::SeqCst);
        let handle = RetryHandle::new();

        if let Some(ref id) = id {
            let previous = self.inner.registry().insert(
                id.clone(),
                PendingSync {
                    token,
                    attempt: 1,
                    handle: handle.clone(),
                },
            );
            if let Some(previous) = previous {
                log::debug!(
                    "Superseding pending sync {} (was on attempt {})",
                    id,
                    previous.attempt
                );
                previous.handle.cancel();
            }
        }

        let driver = Driver {
            inner: Arc::clone(&self.inner),
            id,
            token,
            handle,
            remote_sync,
            on_success,
            on_error,
        };
        tokio::spawn(driver.run());
    }

    /// Cancel the pending operation registered under `id`. Returns whether
    /// anything was cancelled.
    pub fn cancel(&self, id: &str) -> bool {
        let removed = self.inner.registry().remove(id);
        match removed {
            Some(pending) => {
                pending.handle.cancel();
                log::debug!("Cancelled pending sync {}", id);
                true
            }
            None => false,
        }
    }

    /// Cancel every registered operation, returning how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<PendingSync> = self.inner.registry().drain().map(|(_, p)| p).collect();
        for pending in &drained {
            pending.handle.cancel();
        }
        drained.len()
    }

    /// Number of identified operations still syncing
    pub fn pending_count(&self) -> usize {
        self.inner.registry().len()
    }

    /// Current attempt number of the operation registered under `id`
    pub fn attempt(&self, id: &str) -> Option<u32> {
        self.inner.registry().get(id).map(|p| p.attempt)
    }
}

/// Background task driving one operation's attempts
struct Driver<T> {
    inner: Arc<Inner>,
    id: Option<String>,
    token: u64,
    handle: RetryHandle,
    remote_sync: RemoteSync<T>,
    on_success: Option<SuccessCallback<T>>,
    on_error: ErrorCallback,
}

impl<T: Send + 'static> Driver<T> {
    async fn run(mut self) {
        let id = self.id.clone();
        let id = id.as_deref();
        let label = id.unwrap_or("<anonymous>");
        let max_attempts = self.inner.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let outcome = (self.remote_sync)().await;

            let error = match outcome {
                Ok(value) => {
                    if self.inner.settle(id, self.token, &self.handle) {
                        log::debug!("Sync {} succeeded on attempt {}", label, attempt);
                        if let Some(on_success) = self.on_success {
                            on_success(value);
                        }
                    } else {
                        log::debug!("Dropping late success for superseded sync {}", label);
                    }
                    return;
                }
                Err(error) => error,
            };

            let Some(delay) = self.inner.policy.delay_after(attempt) else {
                if self.inner.settle(id, self.token, &self.handle) {
                    log::warn!(
                        "Sync {} failed after {} attempts: {}",
                        label,
                        attempt,
                        error
                    );
                    (self.on_error)(error, attempt);
                }
                return;
            };

            if !self.inner.is_current(id, self.token, &self.handle) {
                log::debug!("Sync {} superseded after failed attempt {}", label, attempt);
                return;
            }

            log::warn!(
                "Sync {} attempt {}/{} failed: {}; retrying in {}s",
                label,
                attempt,
                max_attempts,
                error,
                delay.as_secs()
            );

            if !self.handle.sleep(delay).await {
                return;
            }

            attempt += 1;
            if !self.inner.begin_attempt(id, self.token, &self.handle, attempt) {
                return;
            }
        }
    }
}
