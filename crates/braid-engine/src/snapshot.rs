//! Schema snapshots observed during reconciliation cycles.

use braid_core::{content_hash, SubgraphRef};
use serde::{Deserialize, Serialize};

/// A subgraph schema as observed in one reconciliation cycle.
///
/// The content hash is computed over the raw SDL text, so formatting and
/// comment changes count as changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Name of the subgraph the schema belongs to.
    pub subgraph_name: String,
    /// Endpoint the schema was fetched from.
    pub url: String,
    /// Hex SHA-256 digest of the SDL text.
    pub content_hash: String,
    /// The schema document itself.
    pub sdl: String,
}

impl SchemaSnapshot {
    /// Builds a snapshot from freshly fetched SDL.
    #[must_use]
    pub fn new(subgraph: &SubgraphRef, sdl: impl Into<String>) -> Self {
        let sdl = sdl.into();
        Self {
            subgraph_name: subgraph.name.clone(),
            url: subgraph.url.clone(),
            content_hash: content_hash(&sdl),
            sdl,
        }
    }

    /// The view of this snapshot handed to the composition strategy.
    #[must_use]
    pub fn service_definition(&self) -> ServiceDefinition {
        ServiceDefinition {
            name: self.subgraph_name.clone(),
            url: self.url.clone(),
            sdl: self.sdl.clone(),
        }
    }
}

/// One service's schema as input to supergraph composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Service (subgraph) name.
    pub name: String,
    /// Routing URL recorded in the composed supergraph.
    pub url: String,
    /// The service's schema document.
    pub sdl: String,
}
