//! Durable storage for fetched subgraph schemas.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Persists subgraph schemas so external tooling can pick them up.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Persists `sdl` for `project_id`/`subgraph` and returns the path it
    /// was written to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] when the schema cannot be written.
    async fn save(&self, project_id: &str, subgraph: &str, sdl: &str) -> Result<PathBuf>;
}

/// Filesystem-backed schema store.
///
/// Layout: `{base_dir}/{project_id}/{subgraph}/schema.graphql`. Missing
/// directories are created on demand; existing files are overwritten.
#[derive(Debug, Clone)]
pub struct FsSchemaStore {
    base_dir: PathBuf,
}

impl FsSchemaStore {
    /// Creates a store rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory this store writes under.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl SchemaStore for FsSchemaStore {
    async fn save(&self, project_id: &str, subgraph: &str, sdl: &str) -> Result<PathBuf> {
        let dir = self.base_dir.join(project_id).join(subgraph);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            Error::store_with_source(project_id, subgraph, format!("create {}", dir.display()), e)
        })?;

        let path = dir.join("schema.graphql");
        tokio::fs::write(&path, sdl).await.map_err(|e| {
            Error::store_with_source(project_id, subgraph, format!("write {}", path.display()), e)
        })?;

        tracing::info!(
            project = project_id,
            subgraph,
            path = %path.display(),
            "Schema saved"
        );
        Ok(path)
    }
}
