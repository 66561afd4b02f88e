//! Cache Sweep Task
//!
//! Background task that periodically drops cached payloads past their
//! expiry backstop. Explicit invalidation remains the primary eviction path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a task that sweeps expired entries from `cache` every
/// `interval_secs` seconds. Abort the returned handle to stop it.
pub fn spawn_cleanup_task(cache: Arc<RwLock<CacheStore>>, interval_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!("Starting cache sweep task with interval of {} seconds", period.as_secs());

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.write().await.cleanup_expired();
            if removed > 0 {
                info!("Cache sweep: removed {} expired payloads", removed);
            } else {
                debug!("Cache sweep: nothing expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_removes_expired_payloads() {
        let cache = Arc::new(RwLock::new(CacheStore::new(100, Some(1))));
        cache
            .write()
            .await
            .set("topic_list".to_string(), "{}".to_string())
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(cache.read().await.is_empty(), "Expired payload should be swept");
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_keeps_payloads_without_expiry() {
        let cache = Arc::new(RwLock::new(CacheStore::new(100, None)));
        cache
            .write()
            .await
            .set("topic_detail_1".to_string(), "{}".to_string())
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.read().await.contains("topic_detail_1"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(CacheStore::new(100, None)));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
