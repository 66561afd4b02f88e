//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::AppState;
use crate::error::{CatalogError, Result};

/// Rejects requests without an accepted token when `require_auth` is on.
///
/// Accepts `Authorization: Bearer <token>` and `Authorization: Token <token>`.
/// Runs before any handler, so a rejected request never reaches the store
/// or the cache.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !state.config.require_auth {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            CatalogError::Unauthorized("authentication credentials were not provided".to_string())
        })?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("Token "))
        .map(str::trim)
        .ok_or_else(|| {
            CatalogError::Unauthorized("authorization header must use the Bearer scheme".to_string())
        })?;

    if !state.config.api_tokens.contains(token) {
        debug!(path = %request.uri().path(), "rejected invalid token");
        return Err(CatalogError::Unauthorized("invalid token".to_string()));
    }

    Ok(next.run(request).await)
}
