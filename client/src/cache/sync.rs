//! Cache write patterns: list seeding and optimistic merges
//!
//! Optimistic writes are provisional. The next successful fetch of the same
//! key replaces them through [`QueryCache::set`], so the server always wins.
//! Nothing in here performs network I/O.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cache::key::QueryKey;
use crate::cache::query::QueryCache;
use crate::errors::CoolifyError;

pub const UUID_FIELD: &str = "uuid";
pub const DEPLOYMENT_UUID_FIELD: &str = "deployment_uuid";

/// A partial entity: only the fields to overwrite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Build from any serializable value that encodes as a JSON object
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, CoolifyError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoolifyError::Validation(format!(
                "Patch must be an object, got {}",
                other
            ))),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Shallow merge: top-level fields of `patch` overwrite those of `target`.
///
/// When either side is not an object the patch replaces the target.
pub fn merge_shallow(target: &Value, patch: &Value) -> Value {
    match (target, patch) {
        (Value::Object(current), Value::Object(fields)) => {
            let mut merged = current.clone();
            for (k, v) in fields {
                merged.insert(k.clone(), v.clone());
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}

/// Merge `patch` over the value at `key`, or store it as the value when absent
pub fn optimistic_update(cache: &QueryCache, key: &QueryKey, patch: &Patch) -> Value {
    let patch = Value::Object(patch.0.clone());
    cache.update(key.clone(), |current| match current {
        Some(current) => merge_shallow(current, &patch),
        None => patch.clone(),
    })
}

/// Merge `item` into the list at `key`, matching elements by `uuid`
pub fn optimistic_update_many(cache: &QueryCache, key: &QueryKey, item: &Value) -> Value {
    merge_into_list(cache, key, item, UUID_FIELD)
}

/// Merge `item` into the deployment list at `key`, matching by `deployment_uuid`
pub fn optimistic_update_insert_one_to_many(
    cache: &QueryCache,
    key: &QueryKey,
    item: &Value,
) -> Value {
    merge_into_list(cache, key, item, DEPLOYMENT_UUID_FIELD)
}

/// Treat the value at `key` as a list and merge `item` into the element whose
/// `id_field` equals the item's, appending when none does.
///
/// A missing or non-list value becomes a singleton list. Only `id_field` is
/// compared; items of different kinds sharing an id would collide.
pub fn merge_into_list(cache: &QueryCache, key: &QueryKey, item: &Value, id_field: &str) -> Value {
    let id = item.get(id_field).cloned();
    cache.update(key.clone(), |current| {
        let mut list = match current {
            Some(Value::Array(items)) => items.clone(),
            _ => return Value::Array(vec![item.clone()]),
        };
        let position = id.as_ref().and_then(|id| {
            list.iter()
                .position(|existing| existing.get(id_field) == Some(id))
        });
        match position {
            Some(i) => list[i] = merge_shallow(&list[i], item),
            None => list.push(item.clone()),
        }
        Value::Array(list)
    })
}

/// Drop elements whose `id_field` equals `id` from the list at `key`
///
/// Called once the server has confirmed the delete, so the list stays
/// confirmed. A missing list stays missing.
pub fn remove_from_list(cache: &QueryCache, key: &QueryKey, id_field: &str, id: &str) {
    if !matches!(cache.get(key), Some(Value::Array(_))) {
        return;
    }
    cache.update_confirmed(key.clone(), |current| match current {
        Some(Value::Array(items)) => Value::Array(
            items
                .iter()
                .filter(|item| !id_matches(item, id_field, id))
                .cloned()
                .collect(),
        ),
        Some(other) => other.clone(),
        None => Value::Array(Vec::new()),
    });
}

/// Store every element of `items` under `prefix.child(item[id_field])`.
///
/// Elements without the id field are skipped. Returns how many were seeded.
pub fn seed_from_list(cache: &QueryCache, prefix: &QueryKey, items: &[Value], id_field: &str) -> usize {
    let mut seeded = 0;
    for item in items {
        if let Some(id) = item.get(id_field).and_then(id_string) {
            cache.set(prefix.child(id), item.clone());
            seeded += 1;
        }
    }
    seeded
}

/// Render a string or numeric id as a key part
pub fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_matches(item: &Value, id_field: &str, id: &str) -> bool {
    item.get(id_field).and_then(id_string).as_deref() == Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optimistic_update_without_cached_value() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["applications", "a1"]);
        let patch = Patch::default().with("name", "App2");

        let value = optimistic_update(&cache, &key, &patch);
        assert_eq!(value, json!({"name": "App2"}));
    }

    #[test]
    fn test_optimistic_update_merges_over_cached() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["applications", "a1"]);
        cache.set(
            key.clone(),
            json!({"uuid": "a1", "name": "App1", "status": "running:healthy"}),
        );

        optimistic_update(&cache, &key, &Patch::default().with("name", "App2"));
        assert_eq!(
            cache.get(&key).unwrap(),
            json!({"uuid": "a1", "name": "App2", "status": "running:healthy"})
        );
    }

    #[test]
    fn test_optimistic_update_idempotent() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["databases", "d1"]);
        cache.set(key.clone(), json!({"uuid": "d1", "name": "pg"}));
        let patch = Patch::default().with("name", "pg");

        let once = optimistic_update(&cache, &key, &patch);
        let twice = optimistic_update(&cache, &key, &patch);
        assert_eq!(once, twice);
        assert_eq!(twice, json!({"uuid": "d1", "name": "pg"}));
    }

    #[test]
    fn test_merge_into_list_appends_and_merges() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["services"]);

        optimistic_update_many(&cache, &key, &json!({"uuid": "s1", "name": "one", "status": "exited"}));
        assert_eq!(cache.get(&key).unwrap().as_array().unwrap().len(), 1);

        optimistic_update_many(&cache, &key, &json!({"uuid": "s2", "name": "two"}));
        assert_eq!(cache.get(&key).unwrap().as_array().unwrap().len(), 2);

        optimistic_update_many(&cache, &key, &json!({"uuid": "s1", "status": "running"}));
        let list = cache.get(&key).unwrap();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], json!({"uuid": "s1", "name": "one", "status": "running"}));
    }

    #[test]
    fn test_insert_one_to_many_matches_deployment_uuid() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["deployments"]);
        cache.set(
            key.clone(),
            json!([{"deployment_uuid": "d1", "status": "queued"}]),
        );

        optimistic_update_insert_one_to_many(
            &cache,
            &key,
            &json!({"deployment_uuid": "d1", "status": "in_progress"}),
        );
        optimistic_update_insert_one_to_many(
            &cache,
            &key,
            &json!({"deployment_uuid": "d2", "status": "in_progress"}),
        );

        let list = cache.get(&key).unwrap();
        assert_eq!(
            list,
            json!([
                {"deployment_uuid": "d1", "status": "in_progress"},
                {"deployment_uuid": "d2", "status": "in_progress"}
            ])
        );
    }

    #[test]
    fn test_seed_from_list_skips_items_without_id() {
        let cache = QueryCache::new();
        let prefix = QueryKey::new(["teams"]);
        let items = vec![json!({"id": 0, "name": "root"}), json!({"name": "anonymous"})];

        assert_eq!(seed_from_list(&cache, &prefix, &items, "id"), 1);
        assert_eq!(
            cache.get(&QueryKey::new(["teams", "0"])).unwrap()["name"],
            "root"
        );
    }

    #[test]
    fn test_remove_from_list() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["services"]);
        cache.set(key.clone(), json!([{"uuid": "s1"}, {"uuid": "s2"}]));

        remove_from_list(&cache, &key, UUID_FIELD, "s1");
        let entry = cache.entry(&key).unwrap();
        assert_eq!(entry.value, json!([{"uuid": "s2"}]));
        assert!(!entry.provisional);

        remove_from_list(&cache, &QueryKey::new(["nothing"]), UUID_FIELD, "s1");
        assert!(cache.get(&QueryKey::new(["nothing"])).is_none());
    }

    #[test]
    fn test_patch_from_serializable_rejects_scalars() {
        assert!(Patch::from_serializable(&json!({"a": 1})).is_ok());
        assert!(Patch::from_serializable(&"scalar").is_err());
    }
}
