//! Cache Store Module
//!
//! Process-wide payload cache: HashMap storage with LRU bound and optional expiry.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_PAYLOAD_SIZE};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
/// Serialized response payloads keyed by the key scheme in [`crate::cache::keys`].
#[derive(Debug)]
pub struct CacheStore {
    /// Key-payload storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Expiry applied to every entry, None = kept until invalidated
    ttl: Option<u64>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` payloads, each expiring
    /// after `ttl` seconds when given.
    pub fn new(max_entries: usize, ttl: Option<u64>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Set ==
    /// Stores a payload, overwriting any previous one under the same key.
    ///
    /// At capacity the least recently used entry is evicted first.
    pub fn set(&mut self, key: String, payload: String) -> CacheResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Payload exceeds maximum size of {} bytes",
                MAX_PAYLOAD_SIZE
            )));
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::CacheFull(
                        "Cache is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(payload, self.ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns the payload under `key` if present and not expired.
    ///
    /// Expired entries are dropped and counted as misses.
    pub fn get(&mut self, key: &str) -> CacheResult<String> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.remove_entry(key);
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        let payload = entry.payload.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(payload)
    }

    /// Whether a live entry exists under `key`. Does not touch stats or recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| !e.is_expired())
    }

    // == Delete ==
    /// Removes the entry under `key`.
    pub fn delete(&mut self, key: &str) -> CacheResult<()> {
        if self.remove_entry(key) {
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    /// Removes every entry whose key starts with `prefix`, returning the count.
    pub fn delete_prefix(&mut self, prefix: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_entry(key);
        }
        matching.len()
    }

    /// Adds `count` to the invalidation counter.
    pub fn record_invalidations(&mut self, count: usize) {
        self.stats.record_invalidations(count);
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}
