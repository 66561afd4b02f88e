//! Entity Store Module
//!
//! In-memory relational store for topics, folders and documents. Enforces
//! referential integrity, the acyclic folder tree, cascading folder deletes
//! and topic clearing on topic delete. Every write reports the records whose
//! serialized form it changed.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::catalog::{
    ChangeSet, Document, DocumentUpdate, EntityKind, Folder, FolderUpdate, NewDocument, Topic,
};
use crate::error::{CatalogError, Result};

// == Entity Store ==
#[derive(Debug, Default)]
pub struct EntityStore {
    topics: BTreeMap<u64, Topic>,
    folders: BTreeMap<u64, Folder>,
    documents: BTreeMap<u64, Document>,
    /// Last issued id per kind; each kind has its own sequence
    last_topic_id: u64,
    last_folder_id: u64,
    last_document_id: u64,
    /// Number of read queries served
    queries: AtomicU64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read queries served so far.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    // == Topics ==

    /// All topics ordered by id.
    pub fn topics(&self) -> Vec<&Topic> {
        self.record_query();
        self.topics.values().collect()
    }

    pub fn topic(&self, id: u64) -> Result<&Topic> {
        self.record_query();
        self.topics
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Topic, id))
    }

    pub fn create_topic(&mut self, name: String) -> (Topic, ChangeSet) {
        self.last_topic_id += 1;
        let topic = Topic {
            id: self.last_topic_id,
            name,
        };
        self.topics.insert(topic.id, topic.clone());

        let changes = ChangeSet::new().with(EntityKind::Topic, topic.id);
        (topic, changes)
    }

    /// Renames a topic; `None` saves it unchanged.
    pub fn update_topic(&mut self, id: u64, name: Option<String>) -> Result<(Topic, ChangeSet)> {
        let topic = self
            .topics
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Topic, id))?;
        if let Some(name) = name {
            topic.name = name;
        }

        Ok((topic.clone(), ChangeSet::new().with(EntityKind::Topic, id)))
    }

    /// Deletes a topic and clears it from every document that referenced it.
    pub fn delete_topic(&mut self, id: u64) -> Result<ChangeSet> {
        self.topics
            .remove(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Topic, id))?;

        let mut changes = ChangeSet::new().with(EntityKind::Topic, id);
        for document in self.documents.values_mut() {
            if document.topic_id == Some(id) {
                document.topic_id = None;
                changes.touch(EntityKind::Document, document.id);
            }
        }
        Ok(changes)
    }

    // == Folders ==

    /// All folders ordered by id.
    pub fn folders(&self) -> Vec<&Folder> {
        self.record_query();
        self.folders.values().collect()
    }

    pub fn folder(&self, id: u64) -> Result<&Folder> {
        self.record_query();
        self.folders
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Folder, id))
    }

    /// Immediate child folders and the documents directly inside `id`.
    pub fn folder_contents(&self, id: u64) -> (Vec<&Folder>, Vec<&Document>) {
        self.record_query();
        let folders = self
            .folders
            .values()
            .filter(|f| f.parent_id == Some(id))
            .collect();
        let documents = self
            .documents
            .values()
            .filter(|d| d.folder_id == id)
            .collect();
        (folders, documents)
    }

    /// Fully-qualified display name, e.g. `Parent/Child/Grandchild`.
    pub fn folder_path(&self, id: u64) -> Result<String> {
        self.record_query();
        let mut names = Vec::new();
        let mut current = Some(id);

        while let Some(folder_id) = current {
            let folder = self
                .folders
                .get(&folder_id)
                .ok_or_else(|| CatalogError::not_found(EntityKind::Folder, folder_id))?;
            names.push(folder.name.as_str());
            if names.len() > self.folders.len() {
                return Err(CatalogError::Storage(format!(
                    "folder {} has a cyclic ancestry",
                    id
                )));
            }
            current = folder.parent_id;
        }

        names.reverse();
        Ok(names.join("/"))
    }

    pub fn create_folder(
        &mut self,
        name: String,
        parent_id: Option<u64>,
    ) -> Result<(Folder, ChangeSet)> {
        if let Some(parent) = parent_id {
            self.require_folder(parent)?;
        }

        self.last_folder_id += 1;
        let folder = Folder {
            id: self.last_folder_id,
            name,
            parent_id,
        };
        self.folders.insert(folder.id, folder.clone());

        let mut changes = ChangeSet::new().with(EntityKind::Folder, folder.id);
        changes.touch_folder(parent_id);
        Ok((folder, changes))
    }

    /// Renames and/or moves a folder. A move may not place the folder under
    /// itself or one of its descendants.
    pub fn update_folder(&mut self, id: u64, update: FolderUpdate) -> Result<(Folder, ChangeSet)> {
        let old_parent = self
            .folders
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Folder, id))?
            .parent_id;

        if let Some(Some(new_parent)) = update.parent_id {
            self.require_folder(new_parent)?;
            if self.descendant_folders(id).contains(&new_parent) {
                return Err(CatalogError::Validation(
                    "parent: a folder cannot be moved into itself or one of its descendants"
                        .to_string(),
                ));
            }
        }

        let mut changes = ChangeSet::new().with(EntityKind::Folder, id);
        changes.touch_folder(old_parent);

        let folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Folder, id))?;
        if let Some(name) = update.name {
            folder.name = name;
        }
        if let Some(parent_id) = update.parent_id {
            folder.parent_id = parent_id;
        }
        changes.touch_folder(folder.parent_id);

        Ok((folder.clone(), changes))
    }

    /// Deletes a folder together with all descendant folders and documents.
    /// Returns the removed documents so their uploads can be discarded.
    pub fn delete_folder(&mut self, id: u64) -> Result<(Vec<Document>, ChangeSet)> {
        let parent_id = self
            .folders
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Folder, id))?
            .parent_id;

        let doomed = self.descendant_folders(id);
        let mut changes = ChangeSet::new();
        changes.touch_folder(parent_id);

        for folder_id in &doomed {
            self.folders.remove(folder_id);
            changes.touch(EntityKind::Folder, *folder_id);
        }

        let orphaned: Vec<u64> = self
            .documents
            .values()
            .filter(|d| doomed.contains(&d.folder_id))
            .map(|d| d.id)
            .collect();
        let mut removed = Vec::with_capacity(orphaned.len());
        for document_id in orphaned {
            if let Some(document) = self.documents.remove(&document_id) {
                removed.push(document);
            }
            changes.touch(EntityKind::Document, document_id);
        }

        Ok((removed, changes))
    }

    /// `root` and every folder beneath it.
    fn descendant_folders(&self, root: u64) -> BTreeSet<u64> {
        let mut found = BTreeSet::from([root]);
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for child in self.folders.values().filter(|f| f.parent_id == Some(current)) {
                if found.insert(child.id) {
                    queue.push_back(child.id);
                }
            }
        }
        found
    }

    // == Documents ==

    /// Documents ordered by id, optionally restricted to a topic name
    /// (exact, case-sensitive match).
    pub fn documents(&self, topic_name: Option<&str>) -> Vec<&Document> {
        self.record_query();
        self.documents
            .values()
            .filter(|d| match topic_name {
                None => true,
                Some(wanted) => d
                    .topic_id
                    .and_then(|t| self.topics.get(&t))
                    .is_some_and(|t| t.name == wanted),
            })
            .collect()
    }

    pub fn document(&self, id: u64) -> Result<&Document> {
        self.record_query();
        self.documents
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Document, id))
    }

    /// Checks that the referenced folder and topic, where given, exist.
    pub fn check_document_refs(&self, folder_id: Option<u64>, topic_id: Option<u64>) -> Result<()> {
        if let Some(folder) = folder_id {
            self.require_folder(folder)?;
        }
        if let Some(topic) = topic_id {
            self.require_topic(topic)?;
        }
        Ok(())
    }

    pub fn create_document(&mut self, new: NewDocument) -> Result<(Document, ChangeSet)> {
        self.check_document_refs(Some(new.folder_id), new.topic_id)?;

        self.last_document_id += 1;
        let document = Document {
            id: self.last_document_id,
            name: new.name,
            folder_id: new.folder_id,
            topic_id: new.topic_id,
            file_ref: new.file_ref,
        };
        self.documents.insert(document.id, document.clone());

        let changes = ChangeSet::new()
            .with(EntityKind::Document, document.id)
            .with(EntityKind::Folder, document.folder_id);
        Ok((document, changes))
    }

    pub fn update_document(
        &mut self,
        id: u64,
        update: DocumentUpdate,
    ) -> Result<(Document, ChangeSet)> {
        let old_folder = self
            .documents
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Document, id))?
            .folder_id;

        if let Some(folder_id) = update.folder_id {
            self.require_folder(folder_id)?;
        }
        if let Some(Some(topic_id)) = update.topic_id {
            self.require_topic(topic_id)?;
        }

        let document = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Document, id))?;
        if let Some(name) = update.name {
            document.name = name;
        }
        if let Some(folder_id) = update.folder_id {
            document.folder_id = folder_id;
        }
        if let Some(topic_id) = update.topic_id {
            document.topic_id = topic_id;
        }
        if let Some(file_ref) = update.file_ref {
            document.file_ref = file_ref;
        }

        let changes = ChangeSet::new()
            .with(EntityKind::Document, id)
            .with(EntityKind::Folder, old_folder)
            .with(EntityKind::Folder, document.folder_id);
        Ok((document.clone(), changes))
    }

    pub fn delete_document(&mut self, id: u64) -> Result<(Document, ChangeSet)> {
        let document = self
            .documents
            .remove(&id)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Document, id))?;

        let changes = ChangeSet::new()
            .with(EntityKind::Document, id)
            .with(EntityKind::Folder, document.folder_id);
        Ok((document, changes))
    }

    // == Reference checks ==

    fn require_folder(&self, id: u64) -> Result<()> {
        if self.folders.contains_key(&id) {
            Ok(())
        } else {
            Err(CatalogError::Validation(format!(
                "folder: invalid pk \"{}\" - object does not exist",
                id
            )))
        }
    }

    fn require_topic(&self, id: u64) -> Result<()> {
        if self.topics.contains_key(&id) {
            Ok(())
        } else {
            Err(CatalogError::Validation(format!(
                "topic: invalid pk \"{}\" - object does not exist",
                id
            )))
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, folder_id: u64, topic_id: Option<u64>) -> NewDocument {
        NewDocument {
            name: name.to_string(),
            folder_id,
            topic_id,
            file_ref: format!("documents/{}.txt", name),
        }
    }

    #[test]
    fn test_ids_are_sequenced_per_kind() {
        let mut store = EntityStore::new();

        let (topic, _) = store.create_topic("T".into());
        let (folder, _) = store.create_folder("F".into(), None).unwrap();

        assert_eq!(topic.id, 1);
        assert_eq!(folder.id, 1);
    }

    #[test]
    fn test_folder_path() {
        let mut store = EntityStore::new();

        let (parent, _) = store.create_folder("Parent".into(), None).unwrap();
        let (child, _) = store.create_folder("Child".into(), Some(parent.id)).unwrap();
        let (grandchild, _) = store
            .create_folder("Grandchild".into(), Some(child.id))
            .unwrap();

        assert_eq!(store.folder_path(parent.id).unwrap(), "Parent");
        assert_eq!(store.folder_path(child.id).unwrap(), "Parent/Child");
        assert_eq!(
            store.folder_path(grandchild.id).unwrap(),
            "Parent/Child/Grandchild"
        );
    }

    #[test]
    fn test_folder_contents_one_level() {
        let mut store = EntityStore::new();

        let (root, _) = store.create_folder("Root".into(), None).unwrap();
        let (sub, _) = store.create_folder("F".into(), Some(root.id)).unwrap();
        store.create_folder("Deep".into(), Some(sub.id)).unwrap();
        store.create_document(doc("D", root.id, None)).unwrap();
        store.create_document(doc("Nested", sub.id, None)).unwrap();

        let (folders, documents) = store.folder_contents(root.id);
        assert_eq!(folders.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["F"]);
        assert_eq!(documents.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), ["D"]);
    }

    #[test]
    fn test_create_folder_requires_parent() {
        let mut store = EntityStore::new();
        let result = store.create_folder("Orphan".into(), Some(9));
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(store.folder_count(), 0);
    }

    #[test]
    fn test_create_folder_touches_parent() {
        let mut store = EntityStore::new();
        let (parent, _) = store.create_folder("P".into(), None).unwrap();

        let (child, changes) = store.create_folder("C".into(), Some(parent.id)).unwrap();

        assert!(changes.contains(EntityKind::Folder, child.id));
        assert!(changes.contains(EntityKind::Folder, parent.id));
    }

    #[test]
    fn test_update_folder_rejects_cycles() {
        let mut store = EntityStore::new();
        let (a, _) = store.create_folder("A".into(), None).unwrap();
        let (b, _) = store.create_folder("B".into(), Some(a.id)).unwrap();

        let into_self = FolderUpdate {
            parent_id: Some(Some(a.id)),
            ..Default::default()
        };
        let into_child = FolderUpdate {
            parent_id: Some(Some(b.id)),
            ..Default::default()
        };

        assert!(matches!(
            store.update_folder(a.id, into_self),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            store.update_folder(a.id, into_child),
            Err(CatalogError::Validation(_))
        ));
        assert_eq!(store.folder(a.id).unwrap().parent_id, None);
    }

    #[test]
    fn test_move_folder_touches_old_and_new_parent() {
        let mut store = EntityStore::new();
        let (a, _) = store.create_folder("A".into(), None).unwrap();
        let (b, _) = store.create_folder("B".into(), None).unwrap();
        let (c, _) = store.create_folder("C".into(), Some(a.id)).unwrap();

        let update = FolderUpdate {
            parent_id: Some(Some(b.id)),
            ..Default::default()
        };
        let (moved, changes) = store.update_folder(c.id, update).unwrap();

        assert_eq!(moved.parent_id, Some(b.id));
        assert!(changes.contains(EntityKind::Folder, a.id));
        assert!(changes.contains(EntityKind::Folder, b.id));
        assert_eq!(store.folder_path(c.id).unwrap(), "B/C");
    }

    #[test]
    fn test_delete_folder_cascades() {
        let mut store = EntityStore::new();
        let (root, _) = store.create_folder("Root".into(), None).unwrap();
        let (a, _) = store.create_folder("A".into(), Some(root.id)).unwrap();
        let (b, _) = store.create_folder("B".into(), Some(a.id)).unwrap();
        let (keep, _) = store.create_folder("Keep".into(), Some(root.id)).unwrap();
        let (d1, _) = store.create_document(doc("d1", a.id, None)).unwrap();
        let (d2, _) = store.create_document(doc("d2", b.id, None)).unwrap();
        let (d3, _) = store.create_document(doc("d3", keep.id, None)).unwrap();

        let (removed, changes) = store.delete_folder(a.id).unwrap();

        let mut removed_ids: Vec<u64> = removed.iter().map(|d| d.id).collect();
        removed_ids.sort_unstable();
        assert_eq!(removed_ids, vec![d1.id, d2.id]);
        assert_eq!(store.folder_count(), 2);
        assert_eq!(store.document_count(), 1);
        assert!(store.document(d3.id).is_ok());
        for (kind, id) in [
            (EntityKind::Folder, a.id),
            (EntityKind::Folder, b.id),
            (EntityKind::Folder, root.id),
            (EntityKind::Document, d1.id),
            (EntityKind::Document, d2.id),
        ] {
            assert!(changes.contains(kind, id), "missing {} {}", kind, id);
        }
        assert!(!changes.contains(EntityKind::Document, d3.id));
    }

    #[test]
    fn test_delete_topic_clears_documents() {
        let mut store = EntityStore::new();
        let (topic, _) = store.create_topic("T".into());
        let (folder, _) = store.create_folder("F".into(), None).unwrap();
        let (d, _) = store
            .create_document(doc("d", folder.id, Some(topic.id)))
            .unwrap();

        let changes = store.delete_topic(topic.id).unwrap();

        assert_eq!(store.document(d.id).unwrap().topic_id, None);
        assert!(changes.contains(EntityKind::Document, d.id));
        assert_eq!(store.topic_count(), 0);
    }

    #[test]
    fn test_documents_filter_by_topic_name() {
        let mut store = EntityStore::new();
        let (t1, _) = store.create_topic("T1".into());
        let (t2, _) = store.create_topic("T2".into());
        let (folder, _) = store.create_folder("F".into(), None).unwrap();
        store.create_document(doc("a", folder.id, Some(t1.id))).unwrap();
        store.create_document(doc("b", folder.id, Some(t2.id))).unwrap();
        store.create_document(doc("c", folder.id, None)).unwrap();

        let names: Vec<_> = store
            .documents(Some("T1"))
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names, ["a"]);
        assert!(store.documents(Some("t1")).is_empty());
        assert_eq!(store.documents(None).len(), 3);
    }

    #[test]
    fn test_create_document_checks_references() {
        let mut store = EntityStore::new();
        let (folder, _) = store.create_folder("F".into(), None).unwrap();

        assert!(store.create_document(doc("x", 42, None)).is_err());
        assert!(store.create_document(doc("x", folder.id, Some(7))).is_err());
        assert_eq!(store.document_count(), 0);
    }

    #[test]
    fn test_update_document_touches_both_folders() {
        let mut store = EntityStore::new();
        let (f1, _) = store.create_folder("F1".into(), None).unwrap();
        let (f2, _) = store.create_folder("F2".into(), None).unwrap();
        let (d, _) = store.create_document(doc("d", f1.id, None)).unwrap();

        let update = DocumentUpdate {
            folder_id: Some(f2.id),
            ..Default::default()
        };
        let (moved, changes) = store.update_document(d.id, update).unwrap();

        assert_eq!(moved.folder_id, f2.id);
        assert!(changes.contains(EntityKind::Folder, f1.id));
        assert!(changes.contains(EntityKind::Folder, f2.id));
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let mut store = EntityStore::new();
        assert!(matches!(store.topic(1), Err(CatalogError::NotFound(_))));
        assert!(matches!(store.delete_folder(1), Err(CatalogError::NotFound(_))));
        assert!(matches!(
            store.update_document(1, DocumentUpdate::default()),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_reads_are_counted() {
        let mut store = EntityStore::new();
        store.create_topic("T".into());
        let before = store.query_count();

        store.topics();
        let _ = store.topic(1);

        assert_eq!(store.query_count(), before + 2);
    }
}
