//! Cached rendered views, invalidated by path.
//!
//! Entries are grouped under the path they render (e.g. `/dashboard/invoices`)
//! and keyed within it by the request variant (page, limit). Revalidating a
//! path drops all of its entries and bumps the path's generation; a render
//! that started before the bump cannot store its (stale) result afterwards.

use dashmap::DashMap;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct PageCache {
    entries: DashMap<(String, String), Value>,
    generations: DashMap<String, u64>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str, key: &str) -> Option<Value> {
        self.entries
            .get(&(path.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
    }

    /// Current generation of `path`; pass it back to [`PageCache::store`].
    pub fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).map(|g| *g).unwrap_or(0)
    }

    /// Store a rendered page. Returns `false` (and stores nothing) when the
    /// path was revalidated since `generation` was read.
    pub fn store(&self, path: &str, key: &str, generation: u64, body: Value) -> bool {
        // Hold the generation shard lock so a concurrent revalidate cannot
        // slip in between the check and the insert.
        let current = self.generations.entry(path.to_string()).or_insert(0);
        if *current != generation {
            return false;
        }
        self.entries
            .insert((path.to_string(), key.to_string()), body);
        true
    }

    /// Mark everything cached for `path` stale.
    pub fn revalidate_path(&self, path: &str) {
        let mut generation = self.generations.entry(path.to_string()).or_insert(0);
        *generation += 1;
        self.entries.retain(|(entry_path, _), _| entry_path != path);
        log::debug!("revalidated {} (generation {})", path, *generation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
