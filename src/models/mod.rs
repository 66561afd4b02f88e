//! Request and Response models for the catalog API
//!
//! DTOs for HTTP bodies and query strings, and the pagination envelope.

pub mod pagination;
pub mod requests;
pub mod responses;

pub use pagination::{ListView, Page};
pub use requests::{
    validate_name, validate_optional_name, validate_present_name, FolderRequest, ListQuery,
    TopicRequest, MAX_NAME_LENGTH,
};
pub use responses::{
    ChildEntry, ChildKind, DocumentResponse, FolderResponse, HealthResponse, StatsResponse,
    TopicResponse,
};
