//! Application state and the two paths every handler goes through.
//!
//! Reads go through [`AppState::read_through`]: cache first, entity store on
//! miss, populate afterwards. Writes go through [`AppState::mutate`]: the
//! store write runs under its lock, then the invalidation coordinator sweeps
//! the change set before the handler gets its result back.

use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStore, InvalidationCoordinator};
use crate::catalog::{ChangeSet, EntityStore, FileStorage};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::notify::UploadNotifier;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Response cache
    pub cache: Arc<RwLock<CacheStore>>,
    /// Entity store
    pub store: Arc<RwLock<EntityStore>>,
    pub coordinator: InvalidationCoordinator,
    pub files: FileStorage,
    pub notifier: UploadNotifier,
}

impl AppState {
    /// Creates state with an empty store and cache, sized from `config`.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.cache_max_entries, config.cache_ttl_secs());
        Self::new(
            config.clone(),
            cache,
            EntityStore::new(),
            UploadNotifier::from_config(config),
        )
    }

    pub fn new(
        config: Config,
        cache: CacheStore,
        store: EntityStore,
        notifier: UploadNotifier,
    ) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        Self {
            files: FileStorage::new(config.media_root.clone()),
            config: Arc::new(config),
            coordinator: InvalidationCoordinator::new(cache.clone()),
            cache,
            store: Arc::new(RwLock::new(store)),
            notifier,
        }
    }

    /// Serves `key` from the cache, or runs `load` against the store,
    /// serializes the result, caches it under `key` and returns it.
    ///
    /// `key: None` skips the cache entirely. Cache failures never fail the
    /// request: a failed lookup is a miss and a failed populate is logged.
    pub async fn read_through<T, F>(&self, key: Option<String>, load: F) -> Result<JsonPayload>
    where
        T: Serialize,
        F: FnOnce(&EntityStore) -> Result<T>,
    {
        if let Some(key) = &key {
            match self.cache.write().await.get(key) {
                Ok(payload) => {
                    debug!(key = %key, "cache hit");
                    return Ok(JsonPayload(payload));
                }
                Err(e) => debug!(key = %key, reason = %e, "cache miss"),
            }
        }

        let value = {
            let store = self.store.read().await;
            load(&store)?
        };
        let payload = serde_json::to_string(&value)
            .map_err(|e| CatalogError::Internal(format!("failed to serialize response: {}", e)))?;

        if let Some(key) = key {
            if let Err(e) = self.cache.write().await.set(key.clone(), payload.clone()) {
                warn!(key = %key, error = %e, "failed to populate cache, serving uncached");
            }
        }

        Ok(JsonPayload(payload))
    }

    /// Runs a store write and invalidates everything it changed.
    ///
    /// The write lock is released before the sweep; the sweep finishes
    /// before this returns.
    pub async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut EntityStore) -> Result<(T, ChangeSet)>,
    {
        let (value, changes) = {
            let mut store = self.store.write().await;
            op(&mut store)?
        };

        self.coordinator.apply(&changes).await;
        Ok(value)
    }
}

/// A serialized JSON body, served verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPayload(pub String);

impl IntoResponse for JsonPayload {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "application/json")], self.0).into_response()
    }
}
