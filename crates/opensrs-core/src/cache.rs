// ── TTL response cache ──
//
// Keyed `value + stored_at` map with lazy expiry on read and an optional
// background sweeper. Unbounded: cardinality is driven by the domain
// names callers ask about. Uses tokio's clock so paused-time tests can
// step across the TTL.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Point-in-time counters for one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub ttl_secs: u64,
}

/// Thread-safe TTL map from a string key to a cloneable value.
pub struct ResponseCache<V> {
    name: &'static str,
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone + Send + Sync + 'static> ResponseCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache keys are case-insensitive domain names.
    pub fn key(domain: &str) -> String {
        domain.trim().to_ascii_lowercase()
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.duration_since(entry.stored_at) < self.ttl
    }

    /// Fresh value for `key`; an expired entry is dropped and counts as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if self.is_fresh(&entry, now) => Some(entry.value.clone()),
            _ => None,
        };
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.entries
                .remove_if(key, |_, entry| !self.is_fresh(entry, now));
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    pub fn insert(&self, key: String, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove every expired entry; returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(cache = self.name, removed, "swept expired entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    /// Sweep every `interval` until `cancel` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick is immediate

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        cache.sweep();
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn fresh_until_ttl_then_miss() {
        let cache = ResponseCache::new("lookup", TTL);
        cache.insert("example.com".into(), 1_u32);

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("example.com"), Some(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("example.com"), None);
        assert!(cache.is_empty(), "expired entry is dropped on read");

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_only_drops_expired() {
        let cache = ResponseCache::new("price", TTL);
        cache.insert("old.com".into(), "a");
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.insert("new.com".into(), "b");
        tokio::time::advance(Duration::from_secs(150)).await;

        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new.com"), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_runs_until_cancelled() {
        let cache = Arc::new(ResponseCache::new("lookup", TTL));
        cache.insert("example.com".into(), 7_u8);
        let cancel = CancellationToken::new();
        let handle = cache.spawn_sweeper(Duration::from_secs(600), cancel.clone());

        tokio::time::sleep(Duration::from_secs(601)).await;
        assert!(cache.is_empty());

        cancel.cancel();
        assert!(handle.await.is_ok());
    }

    #[test]
    fn keys_ignore_case() {
        assert_eq!(ResponseCache::<u8>::key(" Example.COM "), "example.com");
    }
}
