// ── Generic ordered entity collection ──
//
// Insertion-ordered storage keyed by id. Every replacement bumps
// a version counter and swaps the shared snapshot handed to readers, so a
// snapshot taken earlier never changes underneath its holder.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::CoreError;
use crate::model::EntityId;

/// Shared, immutable view of a collection in source order.
pub type Records<T> = Arc<Vec<Arc<T>>>;

/// An insertion-ordered collection for a single entity type.
///
/// Source order matters: filters preserve it and ties in ranked counts
/// fall back to it, so the map is an `IndexMap` rather than a `HashMap`.
pub(crate) struct EntityCollection<T> {
    /// Primary storage: id -> entity, in insertion order.
    by_id: IndexMap<EntityId, Arc<T>>,

    /// Version counter, bumped on every replacement.
    version: u64,

    /// Full snapshot in insertion order.
    snapshot: Records<T>,
}

impl<T> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        Self {
            by_id: IndexMap::new(),
            version: 0,
            snapshot: Arc::new(Vec::new()),
        }
    }

    /// Build a collection from records, rejecting repeated ids.
    pub(crate) fn try_from_records(
        entity_type: &str,
        records: impl IntoIterator<Item = (EntityId, T)>,
    ) -> Result<Self, CoreError> {
        let mut collection = Self::new();
        for (id, entity) in records {
            if collection.by_id.contains_key(&id) {
                return Err(CoreError::DuplicateId {
                    entity_type: entity_type.to_owned(),
                    identifier: id.to_string(),
                });
            }
            collection.by_id.insert(id, Arc::new(entity));
        }
        collection.rebuild_snapshot();
        collection.bump_version();
        Ok(collection)
    }

    /// Swap in the contents of `other`, continuing this collection's version.
    pub(crate) fn replace_with(&mut self, other: Self) {
        self.by_id = other.by_id;
        self.snapshot = other.snapshot;
        self.bump_version();
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Records<T> {
        Arc::clone(&self.snapshot)
    }

    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&mut self) {
        self.snapshot = Arc::new(self.by_id.values().map(Arc::clone).collect());
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn collection(values: &[(&str, u32)]) -> EntityCollection<u32> {
        EntityCollection::try_from_records(
            "test",
            values.iter().map(|(id, v)| (EntityId::from(*id), *v)),
        )
        .unwrap()
    }

    #[test]
    fn old_snapshot_is_unaffected_by_replacement() {
        let mut col = collection(&[("a", 1)]);
        let before = col.snapshot();
        col.replace_with(collection(&[("a", 1), ("b", 2)]));

        assert_eq!(before.len(), 1);
        assert_eq!(col.snapshot().len(), 2);
    }

    #[test]
    fn replacement_continues_version() {
        let mut col = collection(&[("a", 1)]);
        let v0 = col.version();
        col.replace_with(collection(&[]));
        assert_eq!(col.version(), v0 + 1);
        assert!(col.is_empty());
    }

    #[test]
    fn try_from_records_rejects_duplicates() {
        let err = EntityCollection::try_from_records(
            "site",
            vec![(EntityId::from("s1"), 1), (EntityId::from("s1"), 2)],
        )
        .err()
        .unwrap();
        assert!(matches!(err, CoreError::DuplicateId { ref identifier, .. } if identifier == "s1"));
    }

    #[test]
    fn try_from_records_keeps_source_order() {
        let col = EntityCollection::try_from_records(
            "site",
            vec![(EntityId::from("z"), 1), (EntityId::from("a"), 2)],
        )
        .unwrap();
        let values: Vec<u32> = col.snapshot().iter().map(|v| **v).collect();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(col.len(), 2);
    }
}
