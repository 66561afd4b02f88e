//! Catalog records

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The three record kinds held by the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Topic,
    Folder,
    Document,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Topic, EntityKind::Folder, EntityKind::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Topic => "topic",
            EntityKind::Folder => "folder",
            EntityKind::Document => "document",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Topic => "Topic",
            EntityKind::Folder => "Folder",
            EntityKind::Document => "Document",
        };
        f.write_str(label)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topic" => Ok(EntityKind::Topic),
            "folder" => Ok(EntityKind::Folder),
            "document" => Ok(EntityKind::Document),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: u64,
    pub name: String,
}

/// A node in the folder tree. Roots have no parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: u64,
    pub name: String,
    pub folder_id: u64,
    pub topic_id: Option<u64>,
    /// Opaque handle returned by [`crate::catalog::FileStorage`]
    pub file_ref: String,
}

/// Fields for a document insert.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub folder_id: u64,
    pub topic_id: Option<u64>,
    pub file_ref: String,
}

/// Partial folder update. `parent_id: Some(None)` moves the folder to the root.
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    pub name: Option<String>,
    pub parent_id: Option<Option<u64>>,
}

/// Partial document update. `topic_id: Some(None)` clears the topic.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    pub name: Option<String>,
    pub folder_id: Option<u64>,
    pub topic_id: Option<Option<u64>>,
    pub file_ref: Option<String>,
}
