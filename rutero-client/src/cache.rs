//! History cache with TTL and prefix invalidation
//!
//! Caches paginated transaction-history lookups for a short window so a
//! dialog reopened within the window avoids a redundant round-trip. A
//! mutation drops every cached page of the affected account by key
//! prefix, since the set of pagination windows in use is unknown in
//! advance. Correctness aid, not a memory-bounded LRU: no eviction
//! beyond TTL-on-read and explicit invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use shared::response::HistoryPage;
use shared::types::Timestamp;

use crate::config::DEFAULT_HISTORY_TTL;

/// Cache key for one pagination window of one account's history
pub fn history_key(owner_id: &str, page: u32, limit: u32) -> String {
    format!("{}:{}:{}", owner_id, page, limit)
}

/// Invalidation prefix covering every pagination window of one account
///
/// The trailing separator keeps owner "12" from sweeping owner "123".
pub fn owner_prefix(owner_id: &str) -> String {
    format!("{}:", owner_id)
}

pub(crate) fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Timestamp
}

/// One cached history page plus its fetch stamp
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: HistoryPage,
    pub fetched_at: Timestamp,
}

impl CacheEntry {
    /// Fresh iff strictly younger than the TTL; the boundary itself is stale.
    pub fn is_fresh(&self, now: Timestamp, ttl: Duration) -> bool {
        now - self.fetched_at < ttl.as_millis() as Timestamp
    }
}

/// Keyed history-page cache shared by the console views
///
/// Explicitly constructed and injected (one instance per app session);
/// cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl HistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stored payload for `key`, only while fresh
    ///
    /// Stale entries are shadowed rather than purged; the next `set`
    /// overwrites them.
    pub async fn get(&self, key: &str) -> Option<HistoryPage> {
        let inner = self.inner.read().await;
        let entry = inner.get(key)?;
        if entry.is_fresh(now_millis(), self.ttl) {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Store `payload` under `key`, stamped with the current time
    pub async fn set(&self, key: &str, payload: HistoryPage) {
        let mut inner = self.inner.write().await;
        inner.insert(
            key.to_string(),
            CacheEntry {
                payload,
                fetched_at: now_millis(),
            },
        );
    }

    /// Drop every key starting with `prefix`, fresh or not
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut inner = self.inner.write().await;
        let before = inner.len();
        inner.retain(|key, _| !key.starts_with(prefix));
        tracing::debug!(
            prefix = %prefix,
            dropped = before - inner.len(),
            "history cache invalidated"
        );
    }

    #[cfg(test)]
    pub(crate) async fn set_at(&self, key: &str, payload: HistoryPage, fetched_at: Timestamp) {
        let mut inner = self.inner.write().await;
        inner.insert(key.to_string(), CacheEntry { payload, fetched_at });
    }
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total: u64) -> HistoryPage {
        HistoryPage {
            entries: vec![],
            total,
        }
    }

    #[test]
    fn test_freshness_boundary_is_strict() {
        let entry = CacheEntry {
            payload: page(1),
            fetched_at: 1_000_000,
        };
        let ttl = Duration::from_secs(300);

        assert!(entry.is_fresh(1_000_000, ttl));
        assert!(entry.is_fresh(1_000_000 + 299_999, ttl));
        // Exactly at the TTL: stale
        assert!(!entry.is_fresh(1_000_000 + 300_000, ttl));
        assert!(!entry.is_fresh(1_000_000 + 300_001, ttl));
    }

    #[tokio::test]
    async fn test_get_returns_fresh_entry() {
        let cache = HistoryCache::default();
        cache.set(&history_key("fam-1", 0, 20), page(3)).await;

        let hit = cache.get(&history_key("fam-1", 0, 20)).await;
        assert_eq!(hit, Some(page(3)));
        assert!(cache.get(&history_key("fam-1", 1, 20)).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_shadowed_not_purged() {
        let cache = HistoryCache::default();
        let key = history_key("fam-1", 0, 20);
        cache.set_at(&key, page(3), now_millis() - 300_000).await;

        assert!(cache.get(&key).await.is_none());

        // Overwriting revives the key
        cache.set(&key, page(4)).await;
        assert_eq!(cache.get(&key).await, Some(page(4)));
    }

    #[tokio::test]
    async fn test_set_overwrites_prior_entry() {
        let cache = HistoryCache::default();
        let key = history_key("fam-1", 0, 20);
        cache.set(&key, page(1)).await;
        cache.set(&key, page(2)).await;
        assert_eq!(cache.get(&key).await, Some(page(2)));
    }

    #[tokio::test]
    async fn test_pagination_windows_never_collide() {
        // (owner, page, limit) triples that would collide under naive keying
        assert_ne!(history_key("fam-1", 0, 20), history_key("fam-1", 0, 2));
        assert_ne!(history_key("fam-1", 1, 2), history_key("fam-11", 2, 2));
        assert_ne!(history_key("fam-1", 12, 3), history_key("fam-1", 1, 23));
    }

    #[tokio::test]
    async fn test_prefix_invalidation_scoped_to_owner() {
        let cache = HistoryCache::default();
        cache.set(&history_key("fam-1", 0, 20), page(1)).await;
        cache.set(&history_key("fam-1", 1, 20), page(2)).await;
        cache.set(&history_key("fam-10", 0, 20), page(3)).await;

        cache.invalidate_prefix(&owner_prefix("fam-1")).await;

        assert!(cache.get(&history_key("fam-1", 0, 20)).await.is_none());
        assert!(cache.get(&history_key("fam-1", 1, 20)).await.is_none());
        // Different owner sharing a string prefix survives
        assert_eq!(cache.get(&history_key("fam-10", 0, 20)).await, Some(page(3)));
    }

    #[tokio::test]
    async fn test_prefix_invalidation_drops_stale_entries_too() {
        let cache = HistoryCache::default();
        let key = history_key("fam-1", 0, 20);
        cache.set_at(&key, page(1), now_millis() - 400_000).await;

        cache.invalidate_prefix(&owner_prefix("fam-1")).await;
        cache.set(&key, page(9)).await;
        assert_eq!(cache.get(&key).await, Some(page(9)));
    }
}
