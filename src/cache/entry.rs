//! Stored cache entry format

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// A cached value with its write time and scope tag.
///
/// `timestamp` is stamped once when the entry is written; in-place updates
/// carry it over unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,

    /// Epoch milliseconds at write time
    pub timestamp: i64,

    /// Scope the data was fetched for (e.g. a buttery filter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Entry with the payload skipped, for metadata-only reads
pub(crate) type EntryHeader = CacheEntry<IgnoredAny>;

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: i64, scope: Option<&str>) -> Self {
        Self {
            data,
            timestamp,
            scope: scope.map(str::to_string),
        }
    }

    /// Exact scope match: absent only matches absent.
    pub fn matches_scope(&self, scope: Option<&str>) -> bool {
        self.scope.as_deref() == scope
    }

    /// Milliseconds elapsed since the entry was written
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.timestamp)
    }
}

impl<T: Serialize> CacheEntry<T> {
    pub fn encode(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|e| CacheError::Corrupt(e.to_string()))
    }
}

impl<T: DeserializeOwned> CacheEntry<T> {
    pub fn decode(raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw).map_err(|e| CacheError::Corrupt(e.to_string()))
    }
}
