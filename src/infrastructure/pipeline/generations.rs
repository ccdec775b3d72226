//! Per-prefix invalidation counters shared by the caching and invalidation behaviors

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Counts the invalidations started for each cache key prefix
///
/// A read snapshots its prefix before calling the handler. If the counter
/// moved by the time its response is stored, a write invalidated the prefix
/// in between and the response must not outlive that invalidation.
#[derive(Debug, Default)]
pub struct PrefixGenerations {
    counters: RwLock<HashMap<String, u64>>,
}

impl PrefixGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, prefix: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prefix)
            .copied()
            .unwrap_or(0)
    }

    /// Marks the start of an invalidation of `prefix`, returning the new generation
    pub fn advance(&self, prefix: &str) -> u64 {
        let mut counters = self
            .counters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = counters.entry(prefix.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }
}
