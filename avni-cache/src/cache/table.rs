//! Fixed-capacity cache table.
//!
//! A `BoundedTable` holds at most `capacity` entries. Inserting a new key
//! into a full table evicts exactly one other entry; replacing an existing
//! key or reading never evicts anything.
//!
//! Reads look the key up under the shared read lock with `peek`. A hit then
//! refreshes recency with a non-blocking `try_write` and skips the refresh
//! if the lock is busy, so a reader never waits to promote a key. While a
//! promotion holds the write lock, other readers briefly wait for it. The
//! replacement order is therefore approximately LRU.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::RwLock;

use super::traits::CacheStats;

/// What happened to the table on an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<K> {
    /// The key was new and there was room for it.
    Inserted,
    /// The key already existed; its entry was replaced.
    Replaced,
    /// The key was new and the table was full; this key was dropped.
    Evicted(K),
}

/// A thread-safe, fixed-capacity key/value table.
pub struct BoundedTable<K, V> {
    name: &'static str,
    entries: RwLock<LruCache<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    bypasses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> BoundedTable<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create an empty table.
    pub fn new(name: &'static str, capacity: NonZeroUsize) -> Self {
        Self {
            name,
            entries: RwLock::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            bypasses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Name of the table, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.read().cap().get()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Look up a key, counting a hit or a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let found = self.entries.read().peek(key).cloned();
        match found {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                // Skip the recency bump if another thread holds the lock.
                if let Some(mut entries) = self.entries.try_write() {
                    entries.promote(key);
                }
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Look up a key without touching counters or recency.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.entries.read().peek(key).cloned()
    }

    /// Whether a key is present, without touching counters or recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains(key)
    }

    /// Store a value, evicting one other entry if the key is new and the
    /// table is full.
    pub fn insert(&self, key: K, value: V) -> InsertOutcome<K> {
        let displaced = self.entries.write().push(key.clone(), value);
        match displaced {
            None => InsertOutcome::Inserted,
            Some((old_key, _)) if old_key == key => InsertOutcome::Replaced,
            Some((victim, _)) => {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                InsertOutcome::Evicted(victim)
            }
        }
    }

    /// Remove a single key.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().pop(key)
    }

    /// Remove every entry whose key matches the predicate.
    pub fn remove_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let mut entries = self.entries.write();
        let doomed: Vec<K> = entries
            .iter()
            .filter(|(key, _)| predicate(key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        doomed.len()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Count a lookup result that was too large to store.
    pub fn record_bypass(&self) {
        self.bypasses.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of this table's counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bypasses: self.bypasses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: self.len() as u64,
        }
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Capacity is never exceeded, and every eviction is matched by
        /// exactly one new key.
        #[test]
        fn prop_capacity_never_exceeded(
            capacity in 1usize..8,
            keys in prop::collection::vec(0u32..20, 0..60),
        ) {
            let t: BoundedTable<u32, u32> =
                BoundedTable::new("prop", NonZeroUsize::new(capacity).unwrap());
            for key in keys {
                let was_present = t.contains(&key);
                let len_before = t.len();
                let outcome = t.insert(key, key);
                prop_assert!(t.len() <= capacity);
                prop_assert!(t.contains(&key));
                match outcome {
                    InsertOutcome::Replaced => prop_assert!(was_present),
                    InsertOutcome::Inserted => {
                        prop_assert!(!was_present);
                        prop_assert_eq!(t.len(), len_before + 1);
                    }
                    InsertOutcome::Evicted(victim) => {
                        prop_assert!(!was_present);
                        prop_assert_eq!(len_before, capacity);
                        prop_assert_ne!(victim, key);
                        prop_assert!(!t.contains(&victim));
                    }
                }
            }
        }
    }
}
