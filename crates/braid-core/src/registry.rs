//! Shared registry of composed supergraph documents.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe store mapping project identifiers to composed supergraph
/// text.
///
/// A project appears in the registry only after at least one successful
/// composition. Clones share the underlying map, so the polling engine and
/// the HTTP layer can hold the same registry.
#[derive(Debug, Clone, Default)]
pub struct SupergraphRegistry {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl SupergraphRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the composed supergraph for a project, if one exists.
    #[must_use]
    pub fn get(&self, project_id: &str) -> Option<String> {
        self.read_lock().get(project_id).cloned()
    }

    /// Replaces the composed supergraph for a project.
    pub fn insert(&self, project_id: impl Into<String>, supergraph_sdl: impl Into<String>) {
        self.write_lock()
            .insert(project_id.into(), supergraph_sdl.into());
    }

    /// True when a composed supergraph exists for the project.
    #[must_use]
    pub fn contains(&self, project_id: &str) -> bool {
        self.read_lock().contains_key(project_id)
    }

    /// True when no project has composed successfully yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    /// Number of projects with a composed supergraph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_lock().len()
    }

    // A poisoned lock only means a writer panicked mid-insert; the map
    // itself remains usable, so recover instead of surfacing an error.
    fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
