//! In-memory LRU response cache implementation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{CachedResponse, RequestKey};
use crate::domain::ports::ResponseCachePort;

/// Shared LRU cache of fetched responses.
///
/// Lookups take a short lock and never await, so resolvers can use it as a
/// fast path before suspending on the network.
pub struct MemoryResponseCache {
    cache: Mutex<LruCache<RequestKey, CachedResponse>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryResponseCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let cache = self.cache.lock();
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: cache.len(),
            bytes: cache.iter().map(|(_, r)| r.len()).sum(),
        }
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached responses.
    pub size: usize,
    /// Total body bytes held.
    pub bytes: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} responses ({} bytes), {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.bytes, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ResponseCachePort for MemoryResponseCache {
    fn get(&self, key: &RequestKey) -> Option<CachedResponse> {
        let mut cache = self.cache.lock();
        if let Some(response) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key.digest(), "Response cache hit");
            Some(response.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key.digest(), "Response cache miss");
            None
        }
    }

    fn put(&self, key: RequestKey, response: CachedResponse) {
        debug!(key = %key.digest(), size = response.len(), "Storing response");
        self.cache.lock().put(key, response);
    }

    fn len(&self) -> usize {
        self.cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CachePolicy;

    fn key(url: &str) -> RequestKey {
        RequestKey::new(url, CachePolicy::UseProtocolDefault)
    }

    fn response(body: &'static [u8]) -> CachedResponse {
        CachedResponse::new(body, Some("image/png".to_string()))
    }

    #[test]
    fn test_cache_put_and_get() {
        let cache = MemoryResponseCache::new(10);
        cache.put(key("https://a/1.png"), response(b"abc"));

        let retrieved = cache.get(&key("https://a/1.png"));
        assert_eq!(retrieved.map(|r| r.len()), Some(3));
    }

    #[test]
    fn test_policy_is_part_of_key() {
        let cache = MemoryResponseCache::new(10);
        cache.put(key("https://a/1.gif"), response(b"abc"));

        let other = RequestKey::new("https://a/1.gif", CachePolicy::ReturnCacheDataElseLoad);
        assert!(cache.get(&other).is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = MemoryResponseCache::new(2);

        cache.put(key("1"), response(b"1"));
        cache.put(key("2"), response(b"2"));
        cache.put(key("3"), response(b"3"));

        // "1" is least recently used
        assert!(cache.get(&key("1")).is_none());
        assert!(cache.get(&key("2")).is_some());
        assert!(cache.get(&key("3")).is_some());
    }

    #[test]
    fn test_cache_stats() {
        let cache = MemoryResponseCache::new(10);
        cache.put(key("1"), response(b"abcd"));

        let _ = cache.get(&key("1"));
        let _ = cache.get(&key("missing"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.bytes, 4);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = std::sync::Arc::new(MemoryResponseCache::new(64));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let k = key(&format!("{t}-{i}"));
                        cache.put(k.clone(), response(b"x"));
                        let _ = cache.get(&k);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 64);
    }
}
