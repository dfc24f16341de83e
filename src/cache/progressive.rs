//! Scoped, TTL-bound cache over a [`KeyValueStore`]
//!
//! Reads never fail: a missing, out-of-scope, expired, or unreadable entry is
//! a miss. Writes never fail either: caching is best effort, so storage errors
//! are logged and dropped. [`ProgressiveCache::try_get`] exposes the
//! error-carrying read underneath `get` for callers that want to see why.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::CACHE_MAX_AGE;
use super::clock::{Clock, SystemClock};
use super::entry::{CacheEntry, EntryHeader};
use super::key::{cache_key, is_cache_key, key_prefix};
use super::storage::KeyValueStore;
use crate::error::CacheError;

/// Why a read did not produce data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Nothing stored under the key
    Absent,
    /// Stored for a different scope; the entry is kept
    ScopeMismatch,
    /// Older than the max age; the entry has been evicted
    Expired,
}

/// Outcome of a successful cache read
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Hit(T),
    Miss(MissReason),
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Hit(data) => Some(data),
            Lookup::Miss(_) => None,
        }
    }
}

/// Entry metadata for introspection
#[derive(Debug, Clone, PartialEq)]
pub struct CacheMetadata {
    pub timestamp: i64,
    pub scope: Option<String>,
    pub age: Duration,
    pub expired: bool,
}

/// Statistics about cache state
#[derive(Debug, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: usize,
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
    pub scopes: BTreeSet<String>,
}

/// Keyed, versioned, scope-tagged cache with a max age
///
/// Every read-modify-write against the store runs under one cache-wide lock,
/// so concurrent `update`s and `set`s never interleave.
pub struct ProgressiveCache<S> {
    store: S,
    clock: Arc<dyn Clock>,
    max_age: Duration,
    exclusive: Mutex<()>,
}

impl<S: KeyValueStore> ProgressiveCache<S> {
    /// Create a cache over `store` using the system clock and the default max age.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            max_age: CACHE_MAX_AGE,
            exclusive: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Read `name` for `scope`, surfacing storage and decode failures.
    ///
    /// Expired entries are evicted here; scope mismatches are left alone.
    pub fn try_get<T: DeserializeOwned>(
        &self,
        name: &str,
        scope: Option<&str>,
    ) -> Result<Lookup<T>, CacheError> {
        let key = cache_key(name);
        let _guard = self.exclusive()?;
        let Some(raw) = self.store.get(&key)? else {
            return Ok(Lookup::Miss(MissReason::Absent));
        };

        let entry = CacheEntry::<T>::decode(&raw)?;

        if !entry.matches_scope(scope) {
            return Ok(Lookup::Miss(MissReason::ScopeMismatch));
        }

        if self.is_expired(entry.timestamp) {
            self.store.remove(&key)?;
            return Ok(Lookup::Miss(MissReason::Expired));
        }

        Ok(Lookup::Hit(entry.data))
    }

    /// Read `name` for `scope`; any problem is a miss.
    ///
    /// An entry that cannot be read back is evicted so it cannot fail again.
    pub fn get<T: DeserializeOwned>(&self, name: &str, scope: Option<&str>) -> Option<T> {
        match self.try_get(name, scope) {
            Ok(Lookup::Hit(data)) => {
                log::debug!("Cache hit: {} (scope {:?})", name, scope);
                Some(data)
            }
            Ok(Lookup::Miss(reason)) => {
                log::debug!("Cache miss: {} (scope {:?}): {:?}", name, scope, reason);
                None
            }
            Err(e) => {
                log::warn!("Discarding unreadable cache entry {}: {}", name, e);
                self.remove(name);
                None
            }
        }
    }

    /// Write `data` for `scope`, surfacing failures.
    pub fn try_set<T: Serialize>(
        &self,
        name: &str,
        data: &T,
        scope: Option<&str>,
    ) -> Result<(), CacheError> {
        let encoded = CacheEntry::new(data, self.clock.now_millis(), scope).encode()?;
        let _guard = self.exclusive()?;
        self.store.set(&cache_key(name), &encoded)
    }

    /// Write `data` for `scope` with a fresh timestamp. Failures are logged
    /// and dropped.
    pub fn set<T: Serialize>(&self, name: &str, data: &T, scope: Option<&str>) {
        if let Err(e) = self.try_set(name, data, scope) {
            log::warn!("Failed to cache {}: {}", name, e);
        }
    }

    /// Modify an existing entry's data in place, keeping its scope and
    /// original timestamp.
    ///
    /// `f` returns whether it changed anything; the result is true only if
    /// it did and the write succeeded.
    pub fn update<T, F>(&self, name: &str, f: F) -> bool
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> bool,
    {
        let key = cache_key(name);
        let result = (|| -> Result<bool, CacheError> {
            let _guard = self.exclusive()?;
            let Some(raw) = self.store.get(&key)? else {
                return Ok(false);
            };
            let mut entry = CacheEntry::<T>::decode(&raw)?;
            if !f(&mut entry.data) {
                return Ok(false);
            }
            self.store.set(&key, &entry.encode()?)?;
            Ok(true)
        })();

        match result {
            Ok(updated) => updated,
            Err(e) => {
                log::warn!("Failed to update cached {}: {}", name, e);
                false
            }
        }
    }

    /// Timestamp, scope, and age of an entry regardless of scope.
    pub fn metadata(&self, name: &str) -> Option<CacheMetadata> {
        let raw = self.store.get(&cache_key(name)).ok().flatten()?;
        let header = EntryHeader::decode(&raw).ok()?;
        Some(self.describe(&header))
    }

    /// Remove one entry
    pub fn remove(&self, name: &str) {
        let result = self
            .exclusive()
            .and_then(|_guard| self.store.remove(&cache_key(name)));
        if let Err(e) = result {
            log::warn!("Failed to remove cached {}: {}", name, e);
        }
    }

    /// Remove every entry written by this cache version
    pub fn clear_all(&self) -> usize {
        self.clear_where(|_| true)
    }

    /// Remove entries whose scope equals `scope` (exactly, as for reads).
    /// Unreadable entries are removed too.
    pub fn clear_scope(&self, scope: Option<&str>) -> usize {
        self.clear_where(|header| header.is_none_or(|h| h.matches_scope(scope)))
    }

    /// Summarise every entry in the namespace.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();

        for (_, raw) in self.raw_entries() {
            stats.total_entries += 1;
            stats.total_size_bytes += raw.len();

            let Ok(header) = EntryHeader::decode(&raw) else {
                stats.expired_entries += 1;
                continue;
            };

            if self.is_expired(header.timestamp) {
                stats.expired_entries += 1;
                continue;
            }

            stats.valid_entries += 1;
            stats.oldest_entry = Some(
                stats
                    .oldest_entry
                    .map_or(header.timestamp, |t| t.min(header.timestamp)),
            );
            stats.newest_entry = Some(
                stats
                    .newest_entry
                    .map_or(header.timestamp, |t| t.max(header.timestamp)),
            );
            if let Some(scope) = header.scope {
                stats.scopes.insert(scope);
            }
        }

        stats
    }

    fn exclusive(&self) -> Result<MutexGuard<'_, ()>, CacheError> {
        self.exclusive
            .lock()
            .map_err(|_| CacheError::Io("cache lock poisoned".to_string()))
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        let max_age = i64::try_from(self.max_age.as_millis()).unwrap_or(i64::MAX);
        self.clock.now_millis().saturating_sub(timestamp) > max_age
    }

    fn describe(&self, header: &EntryHeader) -> CacheMetadata {
        let age_millis = header.age_millis(self.clock.now_millis()).max(0);
        CacheMetadata {
            timestamp: header.timestamp,
            scope: header.scope.clone(),
            age: Duration::from_millis(age_millis as u64),
            expired: self.is_expired(header.timestamp),
        }
    }

    /// (key, raw value) for every namespaced entry that can be read
    fn raw_entries(&self) -> Vec<(String, String)> {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("Failed to list cache keys: {}", e);
                return Vec::new();
            }
        };

        keys.into_iter()
            .filter(|key| is_cache_key(key))
            .filter_map(|key| match self.store.get(&key) {
                Ok(Some(raw)) => Some((key, raw)),
                Ok(None) => None,
                Err(e) => {
                    log::warn!("Failed to read cache key {}: {}", key, e);
                    None
                }
            })
            .collect()
    }

    fn clear_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(Option<&EntryHeader>) -> bool,
    {
        let _guard = match self.exclusive() {
            Ok(guard) => guard,
            Err(e) => {
                log::warn!("Failed to clear cache: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for (key, raw) in self.raw_entries() {
            let header = EntryHeader::decode(&raw).ok();
            if !predicate(header.as_ref()) {
                continue;
            }
            match self.store.remove(&key) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Failed to remove cache key {}: {}", key, e),
            }
        }
        log::debug!("Cleared {} cache entries under {}", removed, key_prefix());
        removed
    }
}
