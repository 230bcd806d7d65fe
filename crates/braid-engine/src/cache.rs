//! Hash-based change detection between reconciliation cycles.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::snapshot::SchemaSnapshot;

type SnapshotSet = HashMap<String, SchemaSnapshot>;

/// Last reconciled schema snapshots, keyed by project and subgraph name.
///
/// A project's entry reflects the last cycle that made it through persist
/// and publish; a cycle that fails partway leaves the entry untouched so
/// the next cycle re-detects the same changes.
#[derive(Debug, Clone, Default)]
pub struct DefinitionCache {
    inner: Arc<RwLock<HashMap<String, SnapshotSet>>>,
}

impl DefinitionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshots in `fresh` whose content differs from the
    /// cached entry.
    ///
    /// A subgraph counts as changed when it has no cached snapshot or
    /// when its content hash differs. On a project's first cycle every
    /// subgraph is changed.
    #[must_use]
    pub fn changed_subgraphs<'a>(
        &self,
        project_id: &str,
        fresh: &'a [SchemaSnapshot],
    ) -> Vec<&'a SchemaSnapshot> {
        let cache = self.read_lock();
        let cached = cache.get(project_id);

        fresh
            .iter()
            .filter(|snapshot| {
                cached
                    .and_then(|set| set.get(&snapshot.subgraph_name))
                    .map_or(true, |previous| {
                        previous.content_hash != snapshot.content_hash
                    })
            })
            .collect()
    }

    /// Replaces the project's cached snapshot set with `fresh`.
    ///
    /// Subgraphs absent from `fresh` are dropped, so a subgraph removed
    /// from configuration does not linger.
    pub fn replace(&self, project_id: &str, fresh: &[SchemaSnapshot]) {
        let set: SnapshotSet = fresh
            .iter()
            .map(|snapshot| (snapshot.subgraph_name.clone(), snapshot.clone()))
            .collect();
        self.write_lock().insert(project_id.to_string(), set);
    }

    /// True when the project has a cached snapshot set.
    #[must_use]
    pub fn contains_project(&self, project_id: &str) -> bool {
        self.read_lock().contains_key(project_id)
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<String, SnapshotSet>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, HashMap<String, SnapshotSet>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
