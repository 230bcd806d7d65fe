//! # braid-engine
//!
//! The reconciliation engine behind braid: polls federated subgraphs for
//! schema changes, persists and publishes changed schemas, and composes
//! per-project supergraphs into the shared registry.
//!
//! The engine is organized around one cycle per project per tick:
//!
//! - **Scheduler**: One polling task per project; overlapping ticks are
//!   dropped, never queued
//! - **Fetch**: Retrying schema introspection against subgraph endpoints
//! - **Cache**: Hash-based change detection between cycles
//! - **Reconcile**: Persist and publish changed schemas, then compose
//! - **Compose**: Pluggable composition strategy (CLI-backed in production)
//!
//! All external effects sit behind traits ([`fetch::SubgraphClient`],
//! [`store::SchemaStore`], [`publish::SchemaPublisher`],
//! [`compose::CompositionStrategy`], [`command::CommandRunner`]) so the
//! cycle logic can be exercised without network, filesystem, or processes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod command;
pub mod compose;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod publish;
pub mod reconciler;
pub mod scheduler;
pub mod snapshot;
pub mod store;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::cache::DefinitionCache;
    pub use crate::command::{CommandOutput, CommandRunner, TokioCommandRunner};
    pub use crate::compose::{CliComposer, CompositionOutcome, CompositionStrategy};
    pub use crate::error::{Error, Result};
    pub use crate::fetch::{
        BackoffPolicy, HttpSubgraphClient, SchemaFetcher, SubgraphClient,
    };
    pub use crate::publish::{HiveCliPublisher, PublishRequest, SchemaPublisher};
    pub use crate::reconciler::{CycleOutcome, Reconciler};
    pub use crate::scheduler::Scheduler;
    pub use crate::snapshot::{SchemaSnapshot, ServiceDefinition};
    pub use crate::store::{FsSchemaStore, SchemaStore};
}

pub use error::{Error, Result};
pub use reconciler::{CycleOutcome, Reconciler};
pub use scheduler::Scheduler;
