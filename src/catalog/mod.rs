//! Catalog Module
//!
//! The entity store for topics, folders and documents, the change sets its
//! writes emit, and storage for uploaded document bytes.

mod changes;
mod files;
mod models;
mod store;

pub use changes::ChangeSet;
pub use files::{sanitize_filename, FileStorage, UPLOAD_DIR};
pub use models::{
    Document, DocumentUpdate, EntityKind, Folder, FolderUpdate, NewDocument, Topic,
};
pub use store::EntityStore;
