//! Resource queries
//!
//! Each operation pairs an endpoint with its query key and the cache writes
//! that follow it: lists seed their items, single reads short-circuit on a
//! fresh entry, updates merge optimistically before the request, creates seed
//! the new entity and deletes drop it.

pub mod applications;
pub mod databases;
pub mod deployments;
pub mod keys;
pub mod mutation;
pub mod projects;
pub mod resource;
pub mod servers;
pub mod services;
pub mod teams;

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::key::QueryKey;
use crate::cache::query::QueryCache;
use crate::cache::sync::{
    merge_shallow, optimistic_update, remove_from_list, seed_from_list, Patch,
};
use crate::errors::CoolifyError;
use crate::http::client::HttpClient;
use crate::queries::mutation::{MutationKey, MutationTracker};

pub use deployments::{next_page_offset, DeploymentPage, DeploymentPager};
pub use resource::Resource;

/// Resource queries bound to a client and a cache
pub struct Queries {
    http: Arc<HttpClient>,
    cache: Arc<QueryCache>,
    mutations: MutationTracker,
}

impl Queries {
    pub fn new(http: Arc<HttpClient>, cache: Arc<QueryCache>) -> Self {
        Self {
            http,
            cache,
            mutations: MutationTracker::default(),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Whether a mutation with this key is in flight
    pub fn is_pending(&self, key: &MutationKey) -> bool {
        self.mutations.is_pending(key)
    }

    /// Fetch a list, store it under `list_key` and seed `list_key.child(id)` per item
    async fn fetch_list<T, F, Fut>(
        &self,
        list_key: QueryKey,
        id_field: &str,
        fetch: F,
    ) -> Result<Vec<T>, CoolifyError>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, CoolifyError>>,
    {
        let items = fetch().await?;
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;

        let seeded = seed_from_list(&self.cache, &list_key, &values, id_field);
        debug!("Seeded {} entries under {}", seeded, list_key);
        self.cache.set(list_key, Value::Array(values));
        Ok(items)
    }

    /// Read `key` from the cache when fresh, otherwise fetch and store it
    async fn fetch_single<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, CoolifyError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoolifyError>>,
    {
        if let Some(cached) = self.cache.get_fresh_as::<T>(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }
        self.refetch_single(key, fetch).await
    }

    /// Fetch and store `key` regardless of what is cached
    async fn refetch_single<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, CoolifyError>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoolifyError>>,
    {
        let item = fetch().await?;
        self.cache.set(key, serde_json::to_value(&item)?);
        Ok(item)
    }

    /// Run a start/stop/restart style action, then invalidate the entity
    async fn run_action<T, F, Fut>(
        &self,
        mutation: MutationKey,
        entity_key: QueryKey,
        action: F,
    ) -> Result<T, CoolifyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoolifyError>>,
    {
        let _pending = self.mutations.begin(mutation.clone());
        info!("Running {}", mutation);
        let result = action().await;
        self.cache.invalidate(&entity_key);
        if let Err(e) = &result {
            warn!("{} failed: {}", mutation, e);
        }
        result
    }

    /// Merge `patch` into the cached entity, send the update, then invalidate
    /// the entity and its list so the next read reconciles with the server
    async fn run_update<F, Fut>(
        &self,
        mutation: MutationKey,
        list_key: QueryKey,
        entity_key: QueryKey,
        patch: Patch,
        send: F,
    ) -> Result<Value, CoolifyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, CoolifyError>>,
    {
        let _pending = self.mutations.begin(mutation.clone());
        info!("Running {}", mutation);
        optimistic_update(&self.cache, &entity_key, &patch);

        let result = send().await;
        self.cache.invalidate(&entity_key);
        self.cache.invalidate(&list_key);
        if let Err(e) = &result {
            warn!("{} failed: {}", mutation, e);
        }
        result
    }

    /// Seed the entity created by `request` under `list_key.child(uuid)`
    ///
    /// The cached value is the request merged with the server's response.
    fn seed_created<R: Serialize>(
        &self,
        list_key: &QueryKey,
        uuid: &str,
        request: &R,
        response: &impl Serialize,
    ) -> Result<(), CoolifyError> {
        let seeded = merge_shallow(
            &serde_json::to_value(request)?,
            &serde_json::to_value(response)?,
        );
        self.cache.set(list_key.child(uuid), seeded);
        self.cache.invalidate(list_key);
        Ok(())
    }

    /// Drop a deleted entity from its own key and from the cached list
    fn forget(&self, list_key: &QueryKey, id: &str) {
        self.cache.remove(&list_key.child(id));
        remove_from_list(&self.cache, list_key, "uuid", id);
    }
}
