//! In-memory cache store.
//!
//! The default cache backend: a concurrent map of serialized pages with
//! absolute expiry, checked against the injected clock on every read.

use crate::application::ports::{Cache, Clock};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    expires_at: Instant,
}

/// Thread-safe in-memory cache backed by DashMap.
///
/// DashMap provides lock-free reads and fine-grained locking for writes;
/// keys are already partitioned by `(source, page, per_page)` so providers
/// never contend on the same entry.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, StoredEntry>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Create a cache that judges expiry against the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Create a cache on the system clock.
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(crate::infrastructure::clock::SystemClock::new()))
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop entries whose expiry has passed.
    ///
    /// Reads already treat expired entries as absent; this only reclaims
    /// the memory they occupy.
    pub fn purge_expired(&self) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        {
            let entry = self.entries.get(key)?;
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }
        // Expired; the read guard is dropped, so removal cannot deadlock.
        self.entries.remove(key);
        None
    }

    fn set(&self, key: &str, value: String, expires_at: Instant) {
        self.entries
            .insert(key.to_string(), StoredEntry { value, expires_at });
    }
}
