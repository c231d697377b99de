//! In-memory TTL cache.
//!
//! Entries expire lazily: a lookup that finds an expired entry evicts it and
//! reports a miss. Nothing sweeps the map in the background.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// A cached value together with the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Key/value store whose entries expire after a per-insert time-to-live.
///
/// The lock is only held for the duration of a single map operation and never
/// across an `.await`, so callers can use it freely from async code.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value, or `None` if it is missing or expired.
    /// Expired entries are removed as a side effect.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Stores `value` under `key`, replacing any previous entry wholesale.
    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        self.lock().insert(key, CacheEntry::new(value, ttl));
    }

    /// Number of stored entries, expired ones included until they are read.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry,
        // so a poisoned map is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_is_returned_until_it_expires() {
        let cache: TtlCache<String, bool> = TtlCache::new();
        cache.insert("42->7".to_string(), true, Duration::from_secs(300));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("42->7"), Some(true));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("42->7"), None);
        assert_eq!(cache.len(), 0, "expired entry should be evicted on read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_replaces_entry_and_resets_expiry() {
        let cache: TtlCache<String, bool> = TtlCache::new();
        cache.insert("a".to_string(), false, Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;

        cache.insert("a".to_string(), true, Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("a"), Some(true));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<String, u32> = TtlCache::default();
        assert_eq!(cache.get("nobody"), None);
    }
}
