//! Schema publication to an external registry.
//!
//! Changed schemas are pushed to a Hive schema registry by shelling out
//! to the `hive` CLI. Publication happens per subgraph, sequentially,
//! and only for projects whose credential set is complete.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::command::CommandRunner;
use crate::error::{Error, Result};

/// One schema publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Registry target identifier.
    pub target: String,
    /// Service (subgraph) name.
    pub service: String,
    /// Routing URL of the service.
    pub url: String,
    /// Path of the schema file to publish.
    pub schema_path: PathBuf,
    /// Registry access token.
    pub access_token: String,
    /// Author recorded with the publication.
    pub author: String,
}

/// Pushes subgraph schemas to an external registry.
#[async_trait]
pub trait SchemaPublisher: Send + Sync {
    /// Publishes one schema file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Publish`] when the registry rejects the schema
    /// and [`Error::Command`] when the CLI cannot be run at all.
    async fn publish(&self, request: &PublishRequest) -> Result<()>;
}

/// Publisher that shells out to the Hive CLI.
pub struct HiveCliPublisher {
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl HiveCliPublisher {
    /// Creates a publisher invoking `program` (normally `hive`).
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }
}

#[async_trait]
impl SchemaPublisher for HiveCliPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<()> {
        let schema_path = request.schema_path.display().to_string();
        let args = [
            "schema:publish",
            "--registry.accessToken",
            request.access_token.as_str(),
            "--target",
            request.target.as_str(),
            "--service",
            request.service.as_str(),
            "--url",
            request.url.as_str(),
            "--author",
            request.author.as_str(),
            schema_path.as_str(),
        ];

        tracing::info!(
            registry_target = %request.target,
            service = %request.service,
            "Publishing schema via Hive CLI"
        );
        let output = self.runner.run(&self.program, &args).await?;

        let stdout = output.stdout.trim();
        if !stdout.is_empty() {
            tracing::info!(service = %request.service, "{stdout}");
        }
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            tracing::error!(service = %request.service, "{stderr}");
        }

        if output.success() {
            Ok(())
        } else {
            let code = output
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let message = if stderr.is_empty() {
                format!("exit status {code}")
            } else {
                format!("exit status {code}: {stderr}")
            };
            Err(Error::publish(&request.service, message))
        }
    }
}
