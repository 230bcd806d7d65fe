//! Supergraph composition.
//!
//! Composition merges the full set of subgraph schemas for a project into
//! one supergraph document. The strategy is pluggable; production shells
//! out to a federation composition CLI, tests swap in fakes.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::command::CommandRunner;
use crate::error::{Error, Result};
use crate::snapshot::ServiceDefinition;

/// Result of one composition attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionOutcome {
    /// The composed supergraph document, when one was produced.
    pub supergraph_sdl: Option<String>,
    /// Composition errors reported by the strategy.
    pub errors: Vec<String>,
}

impl CompositionOutcome {
    /// Creates a successful outcome carrying the composed document.
    #[must_use]
    pub fn success(supergraph_sdl: impl Into<String>) -> Self {
        Self {
            supergraph_sdl: Some(supergraph_sdl.into()),
            errors: Vec::new(),
        }
    }

    /// Creates a failed outcome carrying the reported errors.
    #[must_use]
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            supergraph_sdl: None,
            errors,
        }
    }

    /// True when composition produced a usable supergraph document.
    ///
    /// An outcome with errors, or without a non-blank document, is not
    /// usable; the registry must keep serving the previous supergraph.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
            && self
                .supergraph_sdl
                .as_deref()
                .is_some_and(|sdl| !sdl.trim().is_empty())
    }
}

/// Merges service schemas into one supergraph document.
///
/// Strategies always receive the project's full service set, changed or
/// not; composition is whole-project or nothing.
#[async_trait]
pub trait CompositionStrategy: Send + Sync {
    /// Composes `services` into a supergraph document for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure failures (the strategy
    /// could not run at all). Composition errors reported by the
    /// underlying tool belong in the outcome.
    async fn compose(
        &self,
        project_id: &str,
        services: &[ServiceDefinition],
    ) -> Result<CompositionOutcome>;
}

/// Composition strategy that shells out to a federation CLI.
///
/// Service schemas and a `supergraph.yaml` config are written under
/// `{scratch_dir}/{project_id}/`, then `{program} supergraph compose
/// --config <path>` is run. The composed document is read from stdout,
/// errors from stderr.
pub struct CliComposer {
    runner: Arc<dyn CommandRunner>,
    program: String,
    scratch_dir: PathBuf,
}

impl CliComposer {
    /// Creates a composer invoking `program` (normally `rover`).
    #[must_use]
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        program: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Writes schema files and a supergraph config, returning the config
    /// path.
    async fn write_config(
        &self,
        project_id: &str,
        services: &[ServiceDefinition],
    ) -> Result<PathBuf> {
        let dir = self.scratch_dir.join(project_id);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            Error::composition_with_source(project_id, format!("create {}", dir.display()), e)
        })?;

        let mut config = String::from("federation_version: 2\nsubgraphs:\n");
        for service in services {
            let schema_file = format!("{}.graphql", service.name);
            let schema_path = dir.join(&schema_file);
            tokio::fs::write(&schema_path, &service.sdl).await.map_err(|e| {
                Error::composition_with_source(
                    project_id,
                    format!("write {}", schema_path.display()),
                    e,
                )
            })?;

            config.push_str(&format!(
                "  {}:\n    routing_url: \"{}\"\n    schema:\n      file: \"{}\"\n",
                service.name, service.url, schema_file
            ));
        }

        let config_path = dir.join("supergraph.yaml");
        tokio::fs::write(&config_path, &config).await.map_err(|e| {
            Error::composition_with_source(
                project_id,
                format!("write {}", config_path.display()),
                e,
            )
        })?;
        Ok(config_path)
    }
}

#[async_trait]
impl CompositionStrategy for CliComposer {
    async fn compose(
        &self,
        project_id: &str,
        services: &[ServiceDefinition],
    ) -> Result<CompositionOutcome> {
        let config_path = self.write_config(project_id, services).await?;
        let config = config_path.display().to_string();
        let args = ["supergraph", "compose", "--config", config.as_str()];

        let output = self.runner.run(&self.program, &args).await?;

        if output.success() {
            if output.stdout.trim().is_empty() {
                Ok(CompositionOutcome::default())
            } else {
                Ok(CompositionOutcome::success(output.stdout))
            }
        } else {
            let mut errors: Vec<String> = output
                .stderr
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect();
            if errors.is_empty() {
                let code = output
                    .code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                errors.push(format!("exit status {code}"));
            }
            Ok(CompositionOutcome::failure(errors))
        }
    }
}
