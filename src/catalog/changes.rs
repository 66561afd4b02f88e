//! Change sets emitted by entity store writes

use std::collections::BTreeSet;

use crate::catalog::EntityKind;

/// Every record whose serialized form a write changed.
///
/// Besides the written record this includes parent folders whose `children`
/// changed, descendants removed by a cascading delete, and documents whose
/// topic was cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    records: BTreeSet<(EntityKind, u64)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, kind: EntityKind, id: u64) {
        self.records.insert((kind, id));
    }

    pub fn with(mut self, kind: EntityKind, id: u64) -> Self {
        self.touch(kind, id);
        self
    }

    /// Adds the folder when there is one; roots have no parent to touch.
    pub fn touch_folder(&mut self, folder_id: Option<u64>) {
        if let Some(id) = folder_id {
            self.touch(EntityKind::Folder, id);
        }
    }

    pub fn contains(&self, kind: EntityKind, id: u64) -> bool {
        self.records.contains(&(kind, id))
    }

    /// Distinct identifiers, regardless of kind.
    pub fn ids(&self) -> BTreeSet<u64> {
        self.records.iter().map(|(_, id)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
