//! Document Catalog - topics, nested folders and documents over HTTP
//!
//! Reads are served through an invalidation-driven response cache; every
//! write evicts the cached payloads it made stale before it returns.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
