//! Local cache for server-owned collections
//!
//! A scope-aware, TTL-bound cache persisted in SQLite. Views read it first to
//! show last-known-good data immediately, then overwrite it when a fresh
//! fetch lands.

pub mod clock;
pub mod domain;
pub mod entry;
pub mod key;
pub mod memory;
pub mod progressive;
pub mod storage;

use std::time::Duration;

/// Entries older than this are treated as absent
pub const CACHE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::ButteryCache;
pub use entry::CacheEntry;
pub use key::cache_key;
pub use memory::MemoryStore;
pub use progressive::{CacheMetadata, CacheStats, Lookup, MissReason, ProgressiveCache};
pub use storage::{KeyValueStore, SqliteStore};
