//! Write subject to cached-read prefix rules

use std::collections::{BTreeMap, BTreeSet};

use super::key::key_prefix;

/// Static table of which cached reads a write subject invalidates
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationMap {
    rules: BTreeMap<String, BTreeSet<String>>,
}

impl InvalidationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule purging every listed read request when `subject` is written
    ///
    /// Repeating a subject merges the request lists. An empty list records
    /// the subject as intentionally invalidating nothing.
    pub fn with_rule(mut self, subject: impl Into<String>, read_requests: &[&str]) -> Self {
        let prefixes = self.rules.entry(subject.into()).or_default();

        for name in read_requests {
            prefixes.insert(key_prefix(name));
        }

        self
    }

    /// Key prefixes to purge after a write of `subject`
    ///
    /// Lookup is exact and case-sensitive; unknown subjects yield nothing.
    pub fn affected_prefixes(&self, subject: &str) -> Vec<&str> {
        self.rules
            .get(subject)
            .map(|prefixes| prefixes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether a rule exists for `subject`
    pub fn is_mapped(&self, subject: &str) -> bool {
        self.rules.contains_key(subject)
    }

    /// All subjects with a rule
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
