//! In-memory TTL cache
//!
//! One `moka` cache per namespace. Each `put` carries its own TTL through a
//! per-entry [`Expiry`]; capacity is bounded per namespace by moka's
//! eviction policy. Invalidating a namespace clears only that namespace.

use moka::Expiry;
use moka::sync::Cache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use toolgraph_application::CachePort;
use tracing::trace;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with
struct PerEntryTtl;

impl<V> Expiry<String, Entry<V>> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry<V>, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// [`CachePort`] adapter holding values in process memory
pub struct InMemoryTtlCache<V> {
    namespaces: RwLock<HashMap<String, Cache<String, Entry<V>>>>,
    max_entries: u64,
}

impl<V: Clone + Send + Sync + 'static> InMemoryTtlCache<V> {
    /// `max_entries` caps each namespace.
    pub fn new(max_entries: usize) -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1) as u64,
        }
    }

    /// Live entries in `namespace`, after pending evictions are applied
    pub fn len(&self, namespace: &str) -> u64 {
        self.namespaces.read().get(namespace).map_or(0, |cache| {
            cache.run_pending_tasks();
            cache.entry_count()
        })
    }

    fn build_namespace(&self) -> Cache<String, Entry<V>> {
        Cache::builder()
            .max_capacity(self.max_entries)
            .expire_after(PerEntryTtl)
            .build()
    }
}

impl<V: Clone + Send + Sync + 'static> CachePort<V> for InMemoryTtlCache<V> {
    fn get(&self, namespace: &str, key: &str) -> Option<V> {
        let entry = self.namespaces.read().get(namespace)?.get(key);
        if entry.is_none() {
            trace!(namespace, key, "Cache miss");
        }
        entry.map(|e| e.value)
    }

    fn put(&self, namespace: &str, key: &str, value: V, ttl: Duration) {
        let entry = Entry { value, ttl };
        if let Some(cache) = self.namespaces.read().get(namespace) {
            cache.insert(key.to_string(), entry);
            return;
        }
        self.namespaces
            .write()
            .entry(namespace.to_string())
            .or_insert_with(|| self.build_namespace())
            .insert(key.to_string(), entry);
    }

    fn invalidate_all(&self, namespace: &str) {
        if let Some(cache) = self.namespaces.read().get(namespace) {
            cache.invalidate_all();
        }
    }
}
