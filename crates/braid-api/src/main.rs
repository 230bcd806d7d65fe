//! `braid` binary entrypoint.
//!
//! Wires configuration, the polling engine, and the HTTP server
//! together and runs until the process is stopped.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::Arc;

use anyhow::Result;
use braid_api::config::Config;
use braid_api::server::Server;
use braid_core::observability::{init_logging, LogFormat};
use braid_core::{projects_from_env, SupergraphRegistry};
use braid_engine::command::{CommandRunner, TokioCommandRunner};
use braid_engine::compose::CliComposer;
use braid_engine::fetch::HttpSubgraphClient;
use braid_engine::publish::HiveCliPublisher;
use braid_engine::store::FsSchemaStore;
use braid_engine::{Reconciler, Scheduler};

/// Pretty output is opt-in for local development; JSON is the default.
fn log_format_from_env() -> LogFormat {
    match std::env::var("BRAID_LOG_FORMAT") {
        Ok(value) if value.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
        _ => LogFormat::Json,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(log_format_from_env());

    let projects = projects_from_env();
    if projects.is_empty() {
        anyhow::bail!("No projects found. Define SUBGRAPH_<PROJECT>_ env variables.");
    }
    tracing::info!(
        projects = projects.len(),
        port = config.port,
        "Starting braid"
    );

    let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner);
    let client = Arc::new(HttpSubgraphClient::new());
    let composer = Arc::new(CliComposer::new(
        Arc::clone(&runner),
        config.compose_binary.clone(),
        config.compose_dir.clone(),
    ));
    let store = Arc::new(FsSchemaStore::new(config.schema_dir.clone()));
    let publisher = Arc::new(HiveCliPublisher::new(
        Arc::clone(&runner),
        config.hive_binary.clone(),
    ));

    let registry = SupergraphRegistry::new();
    let reconciler = Arc::new(Reconciler::new(
        client,
        composer,
        store,
        publisher,
        registry.clone(),
    ));

    let scheduler = Scheduler::new(reconciler);
    let polling_tasks = scheduler.start(projects);
    tracing::info!(tasks = polling_tasks.len(), "Polling started");

    let server = Server::new(config, registry);
    server.serve().await?;
    Ok(())
}
