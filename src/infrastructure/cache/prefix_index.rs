//! Ordered index of live cache keys for prefix purges

use std::collections::BTreeSet;
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};

/// Secondary index for stores without native prefix deletion
///
/// The index may hold keys the store has already dropped, but never misses a
/// key the store still holds: callers index a key after storing it and only
/// unindex it through [`PrefixIndex::remove_unless`] or [`PrefixIndex::retain`],
/// both of which check the store under the index lock.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    keys: Mutex<BTreeSet<String>>,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str) {
        let mut keys = self.lock();

        if !keys.contains(key) {
            keys.insert(key.to_string());
        }
    }

    /// Every indexed key starting with `prefix`; the index is left untouched
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.lock()
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Unindexes `key` unless `still_stored` reports the store holds it again
    pub fn remove_unless(&self, key: &str, still_stored: impl FnOnce() -> bool) -> bool {
        let mut keys = self.lock();

        if still_stored() {
            return false;
        }

        keys.remove(key)
    }

    /// Keeps only keys for which `keep` returns true
    pub fn retain(&self, keep: impl FnMut(&String) -> bool) {
        self.lock().retain(keep);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.keys.lock().unwrap_or_else(|e| e.into_inner())
    }
}
