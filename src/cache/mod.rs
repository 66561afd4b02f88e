//! Cache Module
//!
//! Response cache for list and detail views, its key scheme, and the
//! coordinator that evicts entries when catalog records change.

mod entry;
mod invalidation;
pub mod keys;
mod lru;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use invalidation::{sweep, InvalidationCoordinator};
pub use keys::{detail_key, list_key, list_variant_key};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 4 * 1024 * 1024; // 4 MB
