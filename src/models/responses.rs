//! Response DTOs for the catalog API
//!
//! Serialized shapes of topics, folders and documents, plus the operational
//! endpoints.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::catalog::{Document, EntityStore, Folder, Topic};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicResponse {
    pub id: u64,
    pub name: String,
}

impl From<&Topic> for TopicResponse {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name.clone(),
        }
    }
}

/// Kind tag of a folder child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    Folder,
    Document,
}

/// One immediate child of a folder, rendered as `{name, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChildKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderResponse {
    pub id: u64,
    /// Immediate child folders followed by the documents directly inside
    pub children: Vec<ChildEntry>,
    pub name: String,
    pub parent: Option<u64>,
}

impl FolderResponse {
    /// Serializes `folder`, listing its children one level deep.
    pub fn build(store: &EntityStore, folder: &Folder) -> Self {
        let (folders, documents) = store.folder_contents(folder.id);

        let children = folders
            .into_iter()
            .map(|f| ChildEntry {
                name: f.name.clone(),
                kind: ChildKind::Folder,
            })
            .chain(documents.into_iter().map(|d| ChildEntry {
                name: d.name.clone(),
                kind: ChildKind::Document,
            }))
            .collect();

        Self {
            id: folder.id,
            children,
            name: folder.name.clone(),
            parent: folder.parent_id,
        }
    }

    /// Looks up and serializes the folder with `id`.
    pub fn load(store: &EntityStore, id: u64) -> Result<Self> {
        let folder = store.folder(id)?;
        Ok(Self::build(store, folder))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResponse {
    pub id: u64,
    pub name: String,
    /// Stored file handle
    pub file: String,
    pub folder: u64,
    pub topic: Option<u64>,
}

impl From<&Document> for DocumentResponse {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id,
            name: document.name.clone(),
            file: document.file_ref.clone(),
            folder: document.folder_id,
            topic: document.topic_id,
        }
    }
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewDocument;
    use serde_json::json;

    #[test]
    fn test_topic_serialize() {
        let topic = Topic {
            id: 1,
            name: "Topic 1".to_string(),
        };
        let value = serde_json::to_value(TopicResponse::from(&topic)).unwrap();
        assert_eq!(value, json!({"id": 1, "name": "Topic 1"}));
    }

    #[test]
    fn test_folder_children_shape() {
        let mut store = EntityStore::new();
        let (root, _) = store.create_folder("Root".into(), None).unwrap();
        store.create_folder("F".into(), Some(root.id)).unwrap();
        store
            .create_document(NewDocument {
                name: "D".into(),
                folder_id: root.id,
                topic_id: None,
                file_ref: "documents/d.txt".into(),
            })
            .unwrap();

        let value = serde_json::to_value(FolderResponse::load(&store, root.id).unwrap()).unwrap();

        assert_eq!(value["name"], "Root");
        assert_eq!(value["parent"], serde_json::Value::Null);
        assert_eq!(
            value["children"],
            json!([
                {"name": "F", "type": "folder"},
                {"name": "D", "type": "document"}
            ])
        );
    }

    #[test]
    fn test_document_serialize() {
        let document = Document {
            id: 4,
            name: "Doc".into(),
            folder_id: 2,
            topic_id: None,
            file_ref: "documents/doc.txt".into(),
        };
        let value = serde_json::to_value(DocumentResponse::from(&document)).unwrap();
        assert_eq!(
            value,
            json!({"id": 4, "name": "Doc", "file": "documents/doc.txt", "folder": 2, "topic": null})
        );
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
