// ABOUTME: In-memory weather history cache with LRU eviction
// ABOUTME: Shared between planning cycles through a cloneable handle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use raceday_core::models::WeatherHistory;
use tokio::sync::RwLock;
use tracing::debug;

use super::CacheKey;

/// In-memory cache of aggregated histories
///
/// Clones share the same store. Entries never expire; history for a past year
/// does not change, so only capacity eviction and explicit invalidation
/// remove entries.
#[derive(Clone)]
pub struct WeatherCache {
    store: Arc<RwLock<LruCache<CacheKey, Arc<WeatherHistory>>>>,
}

impl WeatherCache {
    /// Capacity used when zero is requested
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache holding at most `capacity` histories
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Look up a history, marking it most recently used
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<WeatherHistory>> {
        // LruCache::get updates access order, so it needs the write lock
        let hit = self.store.write().await.get(key).cloned();
        debug!(key = %key, hit = hit.is_some(), "Weather cache lookup");
        hit
    }

    /// Store a history, evicting the least recently used entry when full
    pub async fn insert(&self, key: CacheKey, history: Arc<WeatherHistory>) {
        let evicted = self.store.write().await.push(key, history);
        if let Some((old, _)) = evicted {
            debug!(key = %old, "Weather cache evicted entry");
        }
    }

    /// Remove one entry; returns whether it was present
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.store.write().await.pop(key).is_some()
    }

    /// Remove every year cached for a signature; returns the number removed
    pub async fn invalidate_signature(&self, signature: &str) -> usize {
        let mut store = self.store.write().await;
        let keys: Vec<CacheKey> = store
            .iter()
            .filter(|(k, _)| k.signature == signature)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            store.pop(key);
        }
        drop(store);
        keys.len()
    }

    /// Drop all entries
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Number of cached histories
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}
