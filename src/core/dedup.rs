//! Field de-duplication set
//!
//! Tracks which field keys a logger branch has already attached through
//! `with_when_not_exist`. Each derivation copies the set, so branches never
//! see each other's marks.

use parking_lot::RwLock;
use std::collections::HashSet;

const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug)]
pub struct FieldKeySet {
    keys: RwLock<HashSet<String>>,
}

impl FieldKeySet {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: RwLock::new(HashSet::with_capacity(capacity)),
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.keys.read().contains(key)
    }

    pub fn set(&self, key: impl Into<String>) {
        self.keys.write().insert(key.into());
    }

    /// Independent snapshot of the current keys
    #[must_use]
    pub fn copy(&self) -> Self {
        let keys = self.keys.read();
        Self {
            keys: RwLock::new(keys.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

impl Default for FieldKeySet {
    fn default() -> Self {
        Self::new()
    }
}
