// --- File: crates/potli_common/src/cache.rs ---
//! Small in-process TTL cache for hot read paths (storefront banner list).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    created_at: Instant,
}

pub struct TtlCache<V> {
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, Entry<V>>>,
    /// Bumped by every invalidation, under the write lock.
    generation: AtomicU64,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Capture before loading a value that is later stored with
    /// [`TtlCache::insert_if_current`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.created_at.elapsed() <= self.ttl)
            .map(|e| e.value.clone())
    }

    /// Inserts `value`, evicting expired entries and then the oldest one if full.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.write().await;
        self.store(&mut entries, key.into(), value);
    }

    /// Like [`TtlCache::insert`], but drops `value` when an invalidation
    /// happened since `generation` was read, so a load that raced a write
    /// never repopulates the cache with stale data.
    pub async fn insert_if_current(&self, key: impl Into<String>, value: V, generation: u64) -> bool {
        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        self.store(&mut entries, key.into(), value);
        true
    }

    fn store(&self, entries: &mut HashMap<String, Entry<V>>, key: String, value: V) {
        let ttl = self.ttl;
        entries.retain(|_, e| e.created_at.elapsed() <= ttl);
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&victim);
            }
        }
        entries.insert(
            key,
            Entry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.remove(key);
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }
}
