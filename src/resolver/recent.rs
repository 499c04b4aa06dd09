//! Recently resolved lookups
//!
//! A bounded ordered set of unique query keys. Inserting a key that is
//! already present changes nothing; once the set is over capacity the
//! oldest key is evicted first.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupKey {
    pub lang: String,
    pub source: String,
    pub target: String,
}

impl LookupKey {
    pub fn new(lang: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug)]
pub struct RecentLookups {
    capacity: usize,
    entries: Mutex<IndexSet<LookupKey>>,
}

impl RecentLookups {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(IndexSet::with_capacity(capacity + 1)),
        }
    }

    /// Record a lookup; returns `false` if it was already present
    pub fn record(&self, key: LookupKey) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let inserted = entries.insert(key);
        while entries.len() > self.capacity {
            entries.shift_remove_index(0);
        }
        inserted
    }

    /// Lookups from oldest to newest
    pub fn snapshot(&self) -> Vec<LookupKey> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecentLookups {
    fn default() -> Self {
        Self::new(20)
    }
}
