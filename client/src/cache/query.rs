//! Process-wide query cache

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::key::QueryKey;

/// A cached value and its bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: Value,
    pub updated_at: DateTime<Utc>,
    /// Written locally ahead of server confirmation
    pub provisional: bool,
    /// Invalidated; the next read should go to the network
    pub stale: bool,
}

impl CacheEntry {
    fn confirmed(value: Value) -> Self {
        Self {
            value,
            updated_at: Utc::now(),
            provisional: false,
            stale: false,
        }
    }

    fn provisional(value: Value) -> Self {
        Self {
            value,
            updated_at: Utc::now(),
            provisional: true,
            stale: false,
        }
    }
}

/// Shared cache of query results
///
/// Every operation takes the lock once, so a read-modify-write through
/// [`QueryCache::update`] is atomic with respect to other writers.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).map(|e| e.value.clone())
    }

    pub fn entry(&self, key: &QueryKey) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// The cached value unless it has been invalidated
    pub fn get_fresh(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|e| !e.stale)
            .map(|e| e.value.clone())
    }

    /// Decode the cached value; an undecodable value reads as a miss
    pub fn get_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        decode(key, self.get(key)?)
    }

    pub fn get_fresh_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        decode(key, self.get_fresh(key)?)
    }

    /// Store a server-confirmed value, replacing any provisional one
    pub fn set(&self, key: QueryKey, value: Value) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, CacheEntry::confirmed(value));
    }

    /// Atomically replace the value at `key` with `f(current)`, marking it provisional
    pub fn update<F>(&self, key: QueryKey, f: F) -> Value
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let next = f(entries.get(&key).map(|e| &e.value));
        entries.insert(key, CacheEntry::provisional(next.clone()));
        next
    }

    /// Atomically replace the value at `key` with `f(current)` as a confirmed entry
    ///
    /// For edits that mirror a write the server has already acknowledged.
    pub fn update_confirmed<F>(&self, key: QueryKey, f: F) -> Value
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let next = f(entries.get(&key).map(|e| &e.value));
        entries.insert(key, CacheEntry::confirmed(next.clone()));
        next
    }

    /// Mark `key` stale; returns whether it was cached
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(key) {
            Some(entry) => {
                entry.stale = true;
                true
            }
            None => false,
        }
    }

    /// Mark every key under `prefix` stale; returns how many were
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut count = 0;
        for (_, entry) in entries.iter_mut().filter(|(k, _)| k.starts_with(prefix)) {
            entry.stale = true;
            count += 1;
        }
        count
    }

    pub fn remove(&self, key: &QueryKey) -> Option<Value> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key).map(|e| e.value)
    }

    /// Drop everything
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        debug!("Clearing {} cache entries", entries.len());
        entries.clear();
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode<T: DeserializeOwned>(key: &QueryKey, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Cached value at {} does not decode: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_then_invalidate() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["applications", "a1"]);
        cache.set(key.clone(), json!({"uuid": "a1"}));

        assert!(cache.get_fresh(&key).is_some());
        assert!(cache.invalidate(&key));
        assert!(cache.get_fresh(&key).is_none());
        assert!(cache.get(&key).is_some());
        assert!(!cache.invalidate(&QueryKey::new(["applications", "zz"])));
    }

    #[test]
    fn test_invalidate_prefix() {
        let cache = QueryCache::new();
        cache.set(QueryKey::new(["applications"]), json!([]));
        cache.set(QueryKey::new(["applications", "a1"]), json!({}));
        cache.set(QueryKey::new(["databases", "d1"]), json!({}));

        assert_eq!(cache.invalidate_prefix(&QueryKey::new(["applications"])), 2);
        assert!(cache.get_fresh(&QueryKey::new(["databases", "d1"])).is_some());
    }

    #[test]
    fn test_update_is_provisional_until_set() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["servers", "s1"]);
        cache.update(key.clone(), |_| json!({"uuid": "s1"}));
        assert!(cache.entry(&key).unwrap().provisional);

        cache.set(key.clone(), json!({"uuid": "s1", "name": "edge"}));
        let entry = cache.entry(&key).unwrap();
        assert!(!entry.provisional);
        assert_eq!(entry.value["name"], "edge");
    }

    #[test]
    fn test_update_confirmed_is_not_provisional() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["projects"]);
        cache.update(key.clone(), |_| json!([{"uuid": "p1"}]));

        cache.update_confirmed(key.clone(), |_| json!([]));
        let entry = cache.entry(&key).unwrap();
        assert!(!entry.provisional);
        assert_eq!(entry.value, json!([]));
    }

    #[test]
    fn test_get_as_mismatch_is_miss() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["teams", "1"]);
        cache.set(key.clone(), json!("not a team"));
        assert!(cache.get_as::<openapi_client::models::Team>(&key).is_none());
    }
}
