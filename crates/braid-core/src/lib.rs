//! # braid-core
//!
//! Shared foundations for the braid supergraph reconciliation service.
//!
//! This crate provides the pieces every other braid crate builds on:
//!
//! - **Configuration**: Project discovery from `SUBGRAPH_<PROJECT>_<SETTING>`
//!   environment variables
//! - **Registry**: The shared in-memory store of composed supergraph documents
//! - **Hashing**: Content hashing used for schema change detection
//! - **Observability**: Logging initialization and span helpers
//! - **Errors**: The core error type shared across crates
//!
//! ## Example
//!
//! ```rust,ignore
//! use braid_core::prelude::*;
//!
//! let projects = projects_from_env();
//! let registry = SupergraphRegistry::new();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod hash;
pub mod observability;
pub mod project;
pub mod registry;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::hash::content_hash;
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::project::{
        projects_from_env, ProjectConfig, RegistryCredentials, SubgraphRef,
    };
    pub use crate::registry::SupergraphRegistry;
}

pub use error::{Error, Result};
pub use hash::content_hash;
pub use observability::{init_logging, LogFormat};
pub use project::{projects_from_env, ProjectConfig, RegistryCredentials, SubgraphRef};
pub use registry::SupergraphRegistry;
