//! Retry schedule and cancellable retry timers

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Fixed, escalating retry schedule.
///
/// The default is three retries after the first attempt, waiting 10s, 20s
/// and 30s before each. Delays are measured from the end of the failed
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_secs(&[10, 20, 30])
    }
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    pub fn from_secs(delays: &[u64]) -> Self {
        Self::new(delays.iter().copied().map(Duration::from_secs).collect())
    }

    /// Never retry
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    /// Initial attempt plus one per scheduled retry
    pub fn max_attempts(&self) -> u32 {
        self.delays.len() as u32 + 1
    }

    /// Wait before the attempt following `attempt` (1-based), or `None` when
    /// `attempt` was the last one.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        let index = attempt.checked_sub(1)? as usize;
        self.delays.get(index).copied()
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}

/// Handle to a scheduled retry. Cancelling it wakes a sleeping retry
/// immediately and makes every later relevance check fail.
#[derive(Debug, Clone, Default)]
pub struct RetryHandle {
    state: Arc<HandleState>,
}

#[derive(Debug, Default)]
struct HandleState {
    cancelled: AtomicBool,
    wake: Notify,
}

impl RetryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.state.cancelled.swap(true, Ordering::SeqCst) {
            self.state.wake.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep for `delay`. Returns false if the handle was cancelled before or
    /// during the wait.
    pub async fn sleep(&self, delay: Duration) -> bool {
        let notified = self.state.wake.notified();
        tokio::pin!(notified);
        // Register for the wake-up before checking the flag so a concurrent
        // cancel cannot slip between the two.
        notified.as_mut().enable();

        if self.is_cancelled() {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => !self.is_cancelled(),
            _ = notified => false,
        }
    }
}
