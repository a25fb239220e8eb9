use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Identity of a cached query.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Issues,
    Issue(String),
}

/// Outcome of a cache lookup.
///
#[derive(Debug, PartialEq)]
pub enum CacheLookup<V> {
    Fresh(V),
    Stale(V),
    Miss,
}

struct Entry<V> {
    value: V,
    fetched_at: Instant,
    last_used: Instant,
}

/// Query results keyed by `QueryKey`. An entry is fresh for `stale_time`
/// after it was fetched and is evicted once unused for longer than
/// `gc_time`. Callers pass the current instant explicitly.
///
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    stale_time: Duration,
    gc_time: Duration,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        QueryCache {
            entries: HashMap::new(),
            stale_time,
            gc_time,
        }
    }

    /// Look up a key, marking the entry as used.
    ///
    pub fn lookup(&mut self, key: &QueryKey, now: Instant) -> CacheLookup<V> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                if now.saturating_duration_since(entry.fetched_at) < self.stale_time {
                    CacheLookup::Fresh(entry.value.clone())
                } else {
                    CacheLookup::Stale(entry.value.clone())
                }
            }
            None => CacheLookup::Miss,
        }
    }

    /// Store a fetched value. The latest insert for a key wins.
    ///
    pub fn insert(&mut self, key: QueryKey, value: V, now: Instant) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: now,
                last_used: now,
            },
        );
    }

    pub fn remove(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    /// Evict entries unused for longer than the gc window. Returns the number
    /// of evicted entries.
    ///
    pub fn collect_garbage(&mut self, now: Instant) -> usize {
        let gc_time = self.gc_time;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_used) <= gc_time);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
