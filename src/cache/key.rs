//! Cache key namespacing
//!
//! Every key written by the cache layer lives under a versioned prefix so
//! a change to the entry format can never be read back by a newer build.

/// Bump to orphan every entry written by an older entry format
pub const CACHE_VERSION: u32 = 1;

/// Prefix shared by all cache keys
pub fn key_prefix() -> String {
    format!("butteryop:v{}:", CACHE_VERSION)
}

/// Build the storage key for a named cached collection.
pub fn cache_key(name: &str) -> String {
    format!("{}{}", key_prefix(), name)
}

/// Whether a raw storage key belongs to this cache version.
pub fn is_cache_key(key: &str) -> bool {
    key.starts_with(&key_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_deterministic() {
        assert_eq!(cache_key("menu"), cache_key("menu"));
        assert_ne!(cache_key("menu"), cache_key("orders"));
    }

    #[test]
    fn test_cache_key_is_versioned() {
        let key = cache_key("orders");
        assert!(key.contains(&format!("v{}", CACHE_VERSION)));
        assert!(is_cache_key(&key));
    }

    #[test]
    fn test_foreign_keys_rejected() {
        assert!(!is_cache_key("orders"));
        assert!(!is_cache_key("butteryop:v0:orders"));
    }
}
