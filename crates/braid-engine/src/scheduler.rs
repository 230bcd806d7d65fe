//! Per-project polling.
//!
//! Each project gets its own polling task on a fixed interval, with the
//! first cycle fired immediately at startup. A single-permit semaphore
//! guards each project: if a cycle is still running when the next tick
//! arrives, the tick is dropped, never queued. Projects never block one
//! another.

use std::sync::Arc;

use braid_core::ProjectConfig;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use crate::metrics::EngineMetrics;
use crate::reconciler::Reconciler;

/// Spawns and drives per-project polling tasks.
pub struct Scheduler {
    reconciler: Arc<Reconciler>,
    metrics: EngineMetrics,
}

impl Scheduler {
    /// Creates a scheduler driving `reconciler`.
    #[must_use]
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self {
            reconciler,
            metrics: EngineMetrics::new(),
        }
    }

    /// Starts one polling task per project.
    ///
    /// The returned handles run until aborted or the process exits;
    /// polling has no graceful-shutdown protocol.
    #[must_use]
    pub fn start(&self, projects: Vec<ProjectConfig>) -> Vec<JoinHandle<()>> {
        projects
            .into_iter()
            .map(|project| self.spawn_project(project))
            .collect()
    }

    fn spawn_project(&self, project: ProjectConfig) -> JoinHandle<()> {
        tracing::info!(
            project = %project.id,
            interval_secs = project.poll_interval.as_secs(),
            subgraphs = project.subgraphs.len(),
            "Polling project"
        );
        for subgraph in &project.subgraphs {
            tracing::info!(
                project = %project.id,
                subgraph = %subgraph.name,
                url = %subgraph.url,
                "Watching subgraph"
            );
        }

        let reconciler = Arc::clone(&self.reconciler);
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            let project = Arc::new(project);
            // One permit per project: holding it marks a cycle in flight.
            let in_flight = Arc::new(Semaphore::new(1));
            let mut ticker = tokio::time::interval(project.poll_interval);

            loop {
                ticker.tick().await;

                let permit = match Arc::clone(&in_flight).try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::debug!(
                            project = %project.id,
                            "Previous cycle still running, dropping tick"
                        );
                        metrics.record_tick_skipped(&project.id);
                        continue;
                    }
                };

                // The cycle runs off the timer task so a slow cycle
                // delays nothing but its own project's next admission.
                let reconciler = Arc::clone(&reconciler);
                let project = Arc::clone(&project);
                let metrics = metrics.clone();
                tokio::spawn(async move {
                    let _permit: OwnedSemaphorePermit = permit;
                    match reconciler.run_cycle(&project).await {
                        Ok(outcome) => {
                            metrics.record_cycle(&project.id, outcome.label());
                        }
                        Err(err) => {
                            metrics.record_cycle(&project.id, "failed");
                            tracing::error!(
                                project = %project.id,
                                error = %err,
                                "Polling cycle failed"
                            );
                        }
                    }
                });
            }
        })
    }
}
