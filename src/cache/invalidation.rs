//! Invalidation Coordinator
//!
//! Runs after every successful catalog write, before the write's response is
//! returned. The sweep is keyed on bare ids: each changed id is dropped under
//! all three detail prefixes, and every list view of every kind goes too.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{keys, CacheStore};
use crate::catalog::{ChangeSet, EntityKind};

/// Evicts cached payloads affected by a [`ChangeSet`].
#[derive(Clone, Debug)]
pub struct InvalidationCoordinator {
    cache: Arc<RwLock<CacheStore>>,
}

impl InvalidationCoordinator {
    pub fn new(cache: Arc<RwLock<CacheStore>>) -> Self {
        Self { cache }
    }

    /// Sweeps the cache for `changes`, returning how many entries were dropped.
    pub async fn apply(&self, changes: &ChangeSet) -> usize {
        let mut cache = self.cache.write().await;
        let removed = sweep(&mut cache, changes.ids());

        debug!(
            records = changes.len(),
            removed, "invalidated cached payloads"
        );
        removed
    }
}

/// Drops every list view (base key and query variants) for all kinds and the
/// detail key of each id under every kind's prefix.
///
/// Missing keys are not an error; the sweep never fails.
pub fn sweep(cache: &mut CacheStore, ids: impl IntoIterator<Item = u64>) -> usize {
    let mut removed = 0;

    for kind in EntityKind::ALL {
        let base = keys::list_key(kind);
        if cache.delete(base).is_ok() {
            removed += 1;
        }
        removed += cache.delete_prefix(&format!("{}?", base));
    }

    for id in ids {
        for kind in EntityKind::ALL {
            if cache.delete(&keys::detail_key(kind, id)).is_ok() {
                removed += 1;
            }
        }
    }

    cache.record_invalidations(removed);
    removed
}
