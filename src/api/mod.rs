//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `/topics`, `/folders`, `/documents` - list, create, retrieve, update, delete
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod auth;
pub mod documents;
pub mod folders;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod topics;
pub mod upload;

pub use handlers::{health_handler, stats_handler};
pub use routes::create_router;
pub use state::{AppState, JsonPayload};
