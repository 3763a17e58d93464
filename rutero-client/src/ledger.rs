//! Paginated ledger history store
//!
//! The read path of the console: cache-first page lookups over the
//! payment service. Every fetch is tagged with a generation number;
//! an owner-level invalidation bumps the generation, so a fetch that
//! was already in flight when the invalidation happened cannot write
//! its now-stale page back into the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shared::response::HistoryPage;

use crate::api::PaymentApi;
use crate::cache::{history_key, owner_prefix, HistoryCache};
use crate::error::ClientResult;

/// Cache-first access to paginated transaction history
pub struct LedgerStore {
    api: Arc<dyn PaymentApi>,
    cache: HistoryCache,
    generation: AtomicU64,
}

impl LedgerStore {
    pub fn new(api: Arc<dyn PaymentApi>, cache: HistoryCache) -> Self {
        Self {
            api,
            cache,
            generation: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &HistoryCache {
        &self.cache
    }

    /// One page of an account's history, served from cache while fresh
    pub async fn page(&self, owner_id: &str, page: u32, limit: u32) -> ClientResult<HistoryPage> {
        let key = history_key(owner_id, page, limit);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!(key = %key, "history cache hit");
            return Ok(hit);
        }
        self.fetch_into_cache(owner_id, page, limit, &key).await
    }

    /// Bypass the cache and refetch one page
    pub async fn refresh(&self, owner_id: &str, page: u32, limit: u32) -> ClientResult<HistoryPage> {
        let key = history_key(owner_id, page, limit);
        self.fetch_into_cache(owner_id, page, limit, &key).await
    }

    /// Drop every cached page for `owner_id` and retire in-flight fetches
    pub async fn invalidate(&self, owner_id: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_prefix(&owner_prefix(owner_id)).await;
    }

    async fn fetch_into_cache(
        &self,
        owner_id: &str,
        page: u32,
        limit: u32,
        key: &str,
    ) -> ClientResult<HistoryPage> {
        let generation = self.generation.load(Ordering::Acquire);
        let fetched = self.api.fetch_history(owner_id, page, limit).await?;
        if self.generation.load(Ordering::Acquire) == generation {
            self.cache.set(key, fetched.clone()).await;
        } else {
            // The caller still gets the page it awaited; it just must not
            // shadow whatever a newer fetch will bring.
            tracing::debug!(key = %key, "stale fetch result not cached");
        }
        Ok(fetched)
    }
}
