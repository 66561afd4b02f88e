//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Catalog Error Enum ==
/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed or missing write fields
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Entity store or file storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Shorthand for a missing record of the given kind.
    pub fn not_found(kind: impl std::fmt::Display, id: u64) -> Self {
        CatalogError::NotFound(format!("{} {} does not exist", kind, id))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CatalogError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CatalogError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CatalogError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            CatalogError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            CatalogError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Cache Error Enum ==
/// Errors raised by the cache layer. Never reach a client: the read path
/// treats them as misses and the populate path logs and bypasses.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Key or payload rejected by size limits
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),
}

// == Result Type Aliases ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type for cache layer operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
