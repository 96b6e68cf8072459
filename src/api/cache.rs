use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;

use crate::models::{Paginated, UniqueItem};

/// A fetched page together with when it was fetched.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub page: Paginated<UniqueItem>,
    pub fetched_at: DateTime<Utc>,
    inserted_at: Instant,
}

impl CachedPage {
    pub fn fresh(page: Paginated<UniqueItem>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            page,
            fetched_at,
            inserted_at: Instant::now(),
        }
    }
}

/// LRU cache of successful API pages, keyed by the full request URL.
///
/// Entries older than the TTL are treated as missing. A zero TTL turns every
/// operation into a no-op.
pub struct ResponseCache {
    inner: Mutex<LruCache<String, CachedPage>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Look up a fresh page. Expired entries are evicted on the way.
    pub fn get(&self, url: &str) -> Option<CachedPage> {
        if !self.is_enabled() {
            return None;
        }

        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let entry = cache.get(url)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            cache.pop(url);
            return None;
        }
        Some(entry.clone())
    }

    pub fn insert(&self, url: String, page: Paginated<UniqueItem>, fetched_at: DateTime<Utc>) {
        if !self.is_enabled() {
            return;
        }

        let entry = CachedPage::fresh(page, fetched_at);
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(url, entry);
    }

    /// Returns (current_len, capacity) for diagnostics.
    pub fn stats(&self) -> (usize, usize) {
        let cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        (cache.len(), cache.cap().get())
    }
}
