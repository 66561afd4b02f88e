//! API Handlers
//!
//! Operational endpoints and the extractor helpers shared by the resource
//! handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use super::AppState;
use crate::catalog::EntityKind;
use crate::error::{CatalogError, Result};
use crate::models::{HealthResponse, ListQuery, StatsResponse};

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Unwraps a JSON body, turning framework rejections into 400s.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| CatalogError::Validation(e.body_text()))
}

/// Unwraps list query parameters, turning framework rejections into 400s.
pub(crate) fn list_query(
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListQuery> {
    query
        .map(|Query(q)| q)
        .map_err(|e| CatalogError::Validation(e.body_text()))
}

/// Parses a path identifier. Anything that is not an id names no record.
pub(crate) fn parse_id(raw: &str, kind: EntityKind) -> Result<u64> {
    raw.parse()
        .map_err(|_| CatalogError::NotFound(format!("{} {} does not exist", kind, raw)))
}
