//! Optimistic updates with background reconciliation
//!
//! [`SyncManager`] applies a mutation to local state straight away and
//! retries the remote call on a fixed schedule until it succeeds or the
//! schedule runs out.

pub mod manager;
pub mod schedule;

#[cfg(test)]
mod scenarios;

pub use manager::{SyncManager, SyncOperation};
pub use schedule::{RetryHandle, RetryPolicy};
