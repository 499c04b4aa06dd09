//! Bounded LRU memoization of resolution results

use super::result::ResolutionResult;
use crate::graph::{CategoryKey, Namespace};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cache key: the full query arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: Namespace,
    pub source: CategoryKey,
    pub target: CategoryKey,
}

impl CacheKey {
    pub fn new(namespace: &Namespace, source: &CategoryKey, target: &CategoryKey) -> Self {
        Self {
            namespace: namespace.clone(),
            source: source.clone(),
            target: target.clone(),
        }
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub len: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Thread-safe LRU cache.
///
/// The lock is only held for a single get or put, never across a store
/// query. Two requests missing on the same key both compute; the later
/// `put` replaces the earlier one with an equal value.
///
/// `clear` starts a new generation. A result computed under an older
/// generation is dropped by `put_if_current`, so a lookup racing with a
/// graph replacement cannot repopulate the cache with stale paths.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: Mutex<LruCache<CacheKey, Arc<ResolutionResult>>>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    /// Create a cache holding at most `capacity` results (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<ResolutionResult>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<ResolutionResult>> {
        let found = self.lock().get(key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn put(&self, key: CacheKey, value: Arc<ResolutionResult>) {
        self.lock().put(key, value);
    }

    /// Current generation, to be passed to `put_if_current`
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store `value` unless the cache was cleared since `generation` was read.
    /// Returns whether it was stored.
    pub fn put_if_current(&self, key: CacheKey, value: Arc<ResolutionResult>, generation: u64) -> bool {
        let mut entries = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        entries.put(key, value);
        true
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        CacheStats {
            len: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
