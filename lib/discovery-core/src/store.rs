//! Shared keyed cache for endpoint lists

use crate::{Endpoint, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Minimal associative cache holding each subscriber's latest endpoint list.
///
/// The store is shared across subscribers but partitioned by key: every
/// subscriber owns one opaque key and only ever reads, writes and removes
/// its own entry.
pub trait EndpointStore: Send + Sync {
    /// Get the endpoint list stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<Endpoint>>;

    /// Store `endpoints` under `key`, replacing any previous entry.
    fn set(&self, key: &str, endpoints: Vec<Endpoint>) -> Result<()>;

    /// Remove the entry stored under `key`, if any.
    fn remove(&self, key: &str);
}

/// In-memory `EndpointStore` backed by a `HashMap`.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<Endpoint>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<Endpoint>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, endpoints: Vec<Endpoint>) -> Result<()> {
        debug!("Storing {} endpoints under {}", endpoints.len(), key);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), endpoints);
        Ok(())
    }

    fn remove(&self, key: &str) {
        debug!("Removing entry {}", key);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_stored_list() {
        let store = MemoryStore::new();
        let endpoints = vec![Endpoint::new("10.0.0.1", 8080)];
        store.set("a", endpoints.clone()).unwrap();
        assert_eq!(store.get("a"), Some(endpoints));
    }

    #[test]
    fn get_missing_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn set_replaces_previous_entry() {
        let store = MemoryStore::new();
        store.set("a", vec![Endpoint::new("10.0.0.1", 8080)]).unwrap();
        let updated = vec![Endpoint::new("10.0.0.2", 9090)];
        store.set("a", updated.clone()).unwrap();
        assert_eq!(store.get("a"), Some(updated));
    }

    #[test]
    fn keys_are_partitioned() {
        let store = MemoryStore::new();
        let first = vec![Endpoint::new("10.0.0.1", 8080)];
        let second = vec![Endpoint::new("10.0.0.2", 9090)];
        store.set("a", first.clone()).unwrap();
        store.set("b", second.clone()).unwrap();
        store.remove("a");
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some(second));
    }

    #[test]
    fn remove_missing_key_is_a_noop() {
        let store = MemoryStore::new();
        store.remove("missing");
        assert!(store.is_empty());
    }
}
