//! API Routes
//!
//! Configures the Axum router with the catalog resources and operational endpoints.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_token;
use super::handlers::{health_handler, stats_handler};
use super::{documents, folders, topics, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|POST /topics`, `GET|PUT|PATCH|DELETE /topics/:id`
/// - `GET|POST /folders`, `GET|PUT|PATCH|DELETE /folders/:id`
/// - `GET|POST /documents`, `GET|PUT|PATCH|DELETE /documents/:id`
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check, never authenticated
///
/// # Middleware
/// - Bearer auth on everything but `/health` (no-op unless `require_auth`)
/// - Body limit from `max_upload_bytes`
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/topics", get(topics::list).post(topics::create))
        .route(
            "/topics/:id",
            get(topics::retrieve)
                .put(topics::replace)
                .patch(topics::update)
                .delete(topics::destroy),
        )
        .route("/folders", get(folders::list).post(folders::create))
        .route(
            "/folders/:id",
            get(folders::retrieve)
                .put(folders::replace)
                .patch(folders::update)
                .delete(folders::destroy),
        )
        .route("/documents", get(documents::list).post(documents::create))
        .route(
            "/documents/:id",
            get(documents::retrieve)
                .put(documents::replace)
                .patch(documents::update)
                .delete(documents::destroy),
        )
        .route("/cache/stats", get(stats_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
