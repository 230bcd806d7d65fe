//! # braid-api
//!
//! HTTP serving layer for the braid supergraph reconciliation service.
//!
//! This crate is a thin composition layer: it wires the polling engine
//! together, serves composed supergraphs, and exposes operational
//! endpoints. All reconciliation logic lives in `braid-engine`.
//!
//! ## Endpoints
//!
//! ```text
//! GET /supergraph/{projectId} - Composed supergraph document (text/plain)
//! GET /health                 - Liveness check
//! GET /ready                  - Readiness check (any supergraph composed)
//! GET /metrics                - Prometheus metrics
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use braid_api::config::Config;
//! use braid_api::server::Server;
//! use braid_core::SupergraphRegistry;
//!
//! let registry = SupergraphRegistry::new();
//! let server = Server::new(Config::default(), registry);
//! server.serve().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod server;

pub use config::Config;
pub use server::Server;
