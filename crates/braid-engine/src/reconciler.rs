//! The per-project reconciliation cycle.
//!
//! One cycle fetches every subgraph schema, diffs against the cache,
//! persists and publishes what changed, then recomposes the supergraph
//! from the full snapshot set. Failures split two ways:
//!
//! - Fetch, persist, and publish failures abort the cycle with an error
//!   and leave the cache untouched, so the next tick re-detects and
//!   retries the same changes.
//! - Composition failures complete the cycle: the registry keeps serving
//!   the previous supergraph, but the cache advances so an unchanged,
//!   uncomposable schema set is not republished every tick.

use std::path::Path;
use std::sync::Arc;

use braid_core::observability::reconcile_span;
use braid_core::{ProjectConfig, SupergraphRegistry};
use tracing::Instrument;

use crate::cache::DefinitionCache;
use crate::compose::{CompositionOutcome, CompositionStrategy};
use crate::error::{Error, Result};
use crate::fetch::{BackoffPolicy, SchemaFetcher, SubgraphClient};
use crate::metrics::{EngineMetrics, TimingGuard};
use crate::publish::{PublishRequest, SchemaPublisher};
use crate::snapshot::{SchemaSnapshot, ServiceDefinition};
use crate::store::SchemaStore;

/// What one reconciliation cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No subgraph content changed; the cache was refreshed.
    Unchanged {
        /// Number of subgraphs observed.
        subgraph_count: usize,
    },
    /// Changed schemas were persisted and published, and composition
    /// updated the registry.
    Recomposed {
        /// Names of the subgraphs that changed.
        changed: Vec<String>,
        /// Number of services handed to composition.
        service_count: usize,
    },
    /// Changed schemas were persisted and published, but composition
    /// failed; the registry was left unchanged.
    CompositionFailed {
        /// Names of the subgraphs that changed.
        changed: Vec<String>,
        /// Errors reported by the composition strategy.
        errors: Vec<String>,
    },
}

impl CycleOutcome {
    /// Outcome label recorded in metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged { .. } => "unchanged",
            Self::Recomposed { .. } => "recomposed",
            Self::CompositionFailed { .. } => "composition_failed",
        }
    }
}

/// Executes reconciliation cycles for projects.
///
/// The reconciler is shared across all per-project polling tasks; all of
/// its state lives behind thread-safe handles.
pub struct Reconciler {
    fetcher: SchemaFetcher,
    composer: Arc<dyn CompositionStrategy>,
    store: Arc<dyn SchemaStore>,
    publisher: Arc<dyn SchemaPublisher>,
    cache: DefinitionCache,
    registry: SupergraphRegistry,
    metrics: EngineMetrics,
}

impl Reconciler {
    /// Creates a reconciler from its collaborators.
    #[must_use]
    pub fn new(
        client: Arc<dyn SubgraphClient>,
        composer: Arc<dyn CompositionStrategy>,
        store: Arc<dyn SchemaStore>,
        publisher: Arc<dyn SchemaPublisher>,
        registry: SupergraphRegistry,
    ) -> Self {
        Self {
            fetcher: SchemaFetcher::new(client),
            composer,
            store,
            publisher,
            cache: DefinitionCache::new(),
            registry,
            metrics: EngineMetrics::new(),
        }
    }

    /// Overrides the fetch backoff policy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.fetcher = self.fetcher.with_backoff(backoff);
        self
    }

    /// The registry this reconciler publishes composed supergraphs into.
    #[must_use]
    pub fn registry(&self) -> &SupergraphRegistry {
        &self.registry
    }

    /// Runs one reconciliation cycle for `project`.
    ///
    /// # Errors
    ///
    /// Returns an error when any subgraph fetch exhausts its retries or
    /// when persisting or publishing a changed schema fails. The cache is
    /// not advanced on error.
    pub async fn run_cycle(&self, project: &ProjectConfig) -> Result<CycleOutcome> {
        let span = reconcile_span(&project.id);
        self.run_cycle_inner(project).instrument(span).await
    }

    async fn run_cycle_inner(&self, project: &ProjectConfig) -> Result<CycleOutcome> {
        let project_id = project.id.clone();
        let metrics = self.metrics.clone();
        let _timer = TimingGuard::new(move |duration| {
            metrics.observe_cycle_duration(&project_id, duration);
        });

        let fresh = self.fetch_all(project).await?;

        let changed = self.cache.changed_subgraphs(&project.id, &fresh);
        if changed.is_empty() {
            self.cache.replace(&project.id, &fresh);
            tracing::debug!(
                project = %project.id,
                subgraphs = fresh.len(),
                "No schema changes detected"
            );
            return Ok(CycleOutcome::Unchanged {
                subgraph_count: fresh.len(),
            });
        }

        for snapshot in &changed {
            tracing::info!(
                project = %project.id,
                subgraph = %snapshot.subgraph_name,
                hash = %snapshot.content_hash,
                "Subgraph schema changed"
            );
        }
        let changed_names: Vec<String> = changed
            .iter()
            .map(|snapshot| snapshot.subgraph_name.clone())
            .collect();

        self.persist_and_publish(project, &changed).await?;

        let outcome = self.compose_full_set(project, &fresh).await;
        match self.usable_sdl(project, outcome) {
            Ok(supergraph_sdl) => {
                self.registry.insert(&project.id, supergraph_sdl);
                self.cache.replace(&project.id, &fresh);
                tracing::info!(project = %project.id, "Supergraph updated");
                Ok(CycleOutcome::Recomposed {
                    changed: changed_names,
                    service_count: fresh.len(),
                })
            }
            Err(errors) => {
                self.cache.replace(&project.id, &fresh);
                tracing::error!(
                    project = %project.id,
                    errors = ?errors,
                    "Composition failed"
                );
                Ok(CycleOutcome::CompositionFailed {
                    changed: changed_names,
                    errors,
                })
            }
        }
    }

    /// Fetches every subgraph concurrently; any failure fails the cycle.
    async fn fetch_all(&self, project: &ProjectConfig) -> Result<Vec<SchemaSnapshot>> {
        let fetches = project.subgraphs.iter().map(|subgraph| async move {
            let sdl = self
                .fetcher
                .fetch_schema(&subgraph.url, project.max_fetch_retries)
                .await?;
            Ok::<_, Error>(SchemaSnapshot::new(subgraph, sdl))
        });

        // join_all keeps snapshot order aligned with configuration order.
        let results = futures::future::join_all(fetches).await;
        let mut fresh = Vec::with_capacity(results.len());
        for result in results {
            fresh.push(result?);
        }
        Ok(fresh)
    }

    /// Persists then publishes each changed subgraph, sequentially.
    async fn persist_and_publish(
        &self,
        project: &ProjectConfig,
        changed: &[&SchemaSnapshot],
    ) -> Result<()> {
        let publish_enabled = project.registry.is_complete();
        if !publish_enabled {
            tracing::info!(
                project = %project.id,
                "Registry credentials not configured, skipping publish"
            );
        }

        for snapshot in changed {
            let path = self
                .store
                .save(&project.id, &snapshot.subgraph_name, &snapshot.sdl)
                .await?;

            if publish_enabled {
                if let Some(request) = build_publish_request(project, snapshot, &path) {
                    self.publisher.publish(&request).await?;
                }
            }
        }
        Ok(())
    }

    /// Composes the full snapshot set, folding infrastructure errors into
    /// a failed outcome.
    async fn compose_full_set(
        &self,
        project: &ProjectConfig,
        fresh: &[SchemaSnapshot],
    ) -> CompositionOutcome {
        tracing::info!(
            project = %project.id,
            services = fresh.len(),
            "Composing supergraph"
        );
        let services: Vec<ServiceDefinition> = fresh
            .iter()
            .map(SchemaSnapshot::service_definition)
            .collect();

        match self.composer.compose(&project.id, &services).await {
            Ok(outcome) => outcome,
            Err(err) => CompositionOutcome::failure(vec![err.to_string()]),
        }
    }

    /// Extracts a servable supergraph document, or the reasons there is
    /// none.
    fn usable_sdl(
        &self,
        project: &ProjectConfig,
        outcome: CompositionOutcome,
    ) -> std::result::Result<String, Vec<String>> {
        let composition_outcome = if outcome.is_success() { "success" } else { "failure" };
        self.metrics.record_composition(&project.id, composition_outcome);

        if !outcome.errors.is_empty() {
            return Err(outcome.errors);
        }
        match outcome.supergraph_sdl {
            Some(sdl) if !sdl.trim().is_empty() => Ok(sdl),
            _ => Err(vec!["no supergraph SDL generated".to_string()]),
        }
    }
}

/// Builds the publish request for one changed subgraph.
///
/// Returns `None` when any credential is missing; callers gate on
/// [`braid_core::RegistryCredentials::is_complete`] first, so this is the
/// second line of defense.
fn build_publish_request(
    project: &ProjectConfig,
    snapshot: &SchemaSnapshot,
    schema_path: &Path,
) -> Option<PublishRequest> {
    let target = project.registry.target.clone()?;
    let access_token = project.registry.access_token.clone()?;
    let author = project.registry.author.clone()?;

    Some(PublishRequest {
        target,
        service: snapshot.subgraph_name.clone(),
        url: snapshot.url.clone(),
        schema_path: schema_path.to_path_buf(),
        access_token,
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use braid_core::{RegistryCredentials, SubgraphRef};

    use crate::fetch::SubgraphClient;

    fn fast_backoff() -> BackoffPolicy {
        BackoffPolicy {
            base: Duration::from_millis(1),
            max: Duration::from_millis(5),
            floor: Duration::from_millis(1),
            jitter: 0.25,
        }
    }

    /// Client serving fixed SDL per URL; URLs absent from the map fail.
    struct MapClient {
        schemas: Mutex<HashMap<String, String>>,
        calls: AtomicUsize,
    }

    impl MapClient {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                schemas: Mutex::new(
                    entries
                        .iter()
                        .map(|(url, sdl)| ((*url).to_string(), (*sdl).to_string()))
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            }
        }

        fn set_schema(&self, url: &str, sdl: &str) {
            self.schemas
                .lock()
                .expect("lock")
                .insert(url.to_string(), sdl.to_string());
        }

        fn remove_schema(&self, url: &str) {
            self.schemas.lock().expect("lock").remove(url);
        }
    }

    #[async_trait]
    impl SubgraphClient for MapClient {
        async fn fetch_sdl(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.schemas
                .lock()
                .expect("lock")
                .get(url)
                .cloned()
                .ok_or_else(|| Error::fetch_attempt(url, "connection refused"))
        }
    }

    /// Composer that records service sets and replays a fixed outcome.
    struct RecordingComposer {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        outcome: Mutex<CompositionOutcome>,
    }

    impl RecordingComposer {
        fn succeeding() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                outcome: Mutex::new(CompositionOutcome::success("composed supergraph")),
            }
        }

        fn failing(errors: Vec<&str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                outcome: Mutex::new(CompositionOutcome::failure(
                    errors.into_iter().map(ToString::to_string).collect(),
                )),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl CompositionStrategy for RecordingComposer {
        async fn compose(
            &self,
            project_id: &str,
            services: &[ServiceDefinition],
        ) -> Result<CompositionOutcome> {
            self.calls.lock().expect("lock").push((
                project_id.to_string(),
                services.iter().map(|s| s.name.clone()).collect(),
            ));
            Ok(self.outcome.lock().expect("lock").clone())
        }
    }

    /// Store that keeps schemas in memory and can be told to fail.
    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Vec<(String, String)>>,
        fail: std::sync::atomic::AtomicBool,
    }

    impl MemoryStore {
        fn saved_keys(&self) -> Vec<String> {
            self.saved
                .lock()
                .expect("lock")
                .iter()
                .map(|(key, _)| key.clone())
                .collect()
        }
    }

    #[async_trait]
    impl SchemaStore for MemoryStore {
        async fn save(&self, project_id: &str, subgraph: &str, sdl: &str) -> Result<PathBuf> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Store {
                    project: project_id.to_string(),
                    subgraph: subgraph.to_string(),
                    message: "disk full".to_string(),
                    source: None,
                });
            }
            self.saved
                .lock()
                .expect("lock")
                .push((format!("{project_id}/{subgraph}"), sdl.to_string()));
            Ok(PathBuf::from(format!(
                "/schemas/{project_id}/{subgraph}/schema.graphql"
            )))
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        requests: Mutex<Vec<PublishRequest>>,
    }

    impl RecordingPublisher {
        fn count(&self) -> usize {
            self.requests.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl SchemaPublisher for RecordingPublisher {
        async fn publish(&self, request: &PublishRequest) -> Result<()> {
            self.requests.lock().expect("lock").push(request.clone());
            Ok(())
        }
    }

    struct Harness {
        client: Arc<MapClient>,
        composer: Arc<RecordingComposer>,
        store: Arc<MemoryStore>,
        publisher: Arc<RecordingPublisher>,
        reconciler: Reconciler,
    }

    fn harness(client: MapClient, composer: RecordingComposer) -> Harness {
        let client = Arc::new(client);
        let composer = Arc::new(composer);
        let store = Arc::new(MemoryStore::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let reconciler = Reconciler::new(
            Arc::clone(&client) as Arc<dyn SubgraphClient>,
            Arc::clone(&composer) as Arc<dyn CompositionStrategy>,
            Arc::clone(&store) as Arc<dyn SchemaStore>,
            Arc::clone(&publisher) as Arc<dyn SchemaPublisher>,
            SupergraphRegistry::new(),
        )
        .with_backoff(fast_backoff());

        Harness {
            client,
            composer,
            store,
            publisher,
            reconciler,
        }
    }

    fn demo_project() -> ProjectConfig {
        ProjectConfig {
            id: "demo".to_string(),
            subgraphs: vec![
                SubgraphRef::new("users", "http://users.internal/graphql"),
                SubgraphRef::new("products", "http://products.internal/graphql"),
            ],
            poll_interval: Duration::from_secs(60),
            max_fetch_retries: 1,
            registry: RegistryCredentials::default(),
        }
    }

    fn demo_project_with_credentials() -> ProjectConfig {
        let mut project = demo_project();
        project.registry = RegistryCredentials {
            target: Some("org/project/target".to_string()),
            access_token: Some("secret".to_string()),
            author: Some("platform-team".to_string()),
        };
        project
    }

    fn demo_client() -> MapClient {
        MapClient::new(&[
            ("http://users.internal/graphql", "type Query { users: [User] }"),
            (
                "http://products.internal/graphql",
                "type Query { products: [Product] }",
            ),
        ])
    }

    #[tokio::test]
    async fn test_first_cycle_composes_and_fills_registry() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        let outcome = h.reconciler.run_cycle(&project).await.expect("cycle");

        match outcome {
            CycleOutcome::Recomposed {
                changed,
                service_count,
            } => {
                assert_eq!(changed, vec!["users".to_string(), "products".to_string()]);
                assert_eq!(service_count, 2);
            }
            other => panic!("expected Recomposed, got {other:?}"),
        }
        assert_eq!(
            h.reconciler.registry().get("demo").as_deref(),
            Some("composed supergraph")
        );
        assert_eq!(h.store.saved_keys(), vec!["demo/users", "demo/products"]);

        // The composer received the full service set, in order.
        let calls = h.composer.calls.lock().expect("lock");
        assert_eq!(calls[0].0, "demo");
        assert_eq!(calls[0].1, vec!["users".to_string(), "products".to_string()]);
    }

    #[tokio::test]
    async fn test_unchanged_cycle_skips_composition() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        h.reconciler.run_cycle(&project).await.expect("first cycle");
        let outcome = h.reconciler.run_cycle(&project).await.expect("second cycle");

        assert_eq!(outcome, CycleOutcome::Unchanged { subgraph_count: 2 });
        assert_eq!(h.composer.call_count(), 1);
        assert_eq!(h.store.saved_keys().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_change_persists_only_changed() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        h.reconciler.run_cycle(&project).await.expect("first cycle");
        h.client.set_schema(
            "http://users.internal/graphql",
            "type Query { users: [User!]! }",
        );
        let outcome = h.reconciler.run_cycle(&project).await.expect("second cycle");

        match outcome {
            CycleOutcome::Recomposed { changed, .. } => {
                assert_eq!(changed, vec!["users".to_string()]);
            }
            other => panic!("expected Recomposed, got {other:?}"),
        }
        // users was persisted again, products was not.
        assert_eq!(
            h.store.saved_keys(),
            vec!["demo/users", "demo/products", "demo/users"]
        );
        // Composition still received both services.
        let calls = h.composer.calls.lock().expect("lock");
        assert_eq!(calls[1].1.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_cycle_and_keeps_cache() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        h.reconciler.run_cycle(&project).await.expect("first cycle");

        // One subgraph goes dark; the whole cycle fails.
        h.client.remove_schema("http://products.internal/graphql");
        let err = h
            .reconciler
            .run_cycle(&project)
            .await
            .expect_err("cycle should fail");
        assert!(err.to_string().contains("after 2 attempts"));
        assert_eq!(h.composer.call_count(), 1);

        // Recovery with changed content is detected against the old cache.
        h.client.set_schema(
            "http://products.internal/graphql",
            "type Query { products: [Product!] }",
        );
        let outcome = h.reconciler.run_cycle(&project).await.expect("third cycle");
        match outcome {
            CycleOutcome::Recomposed { changed, .. } => {
                assert_eq!(changed, vec!["products".to_string()]);
            }
            other => panic!("expected Recomposed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_failure_aborts_before_composition() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        h.store.fail.store(true, Ordering::SeqCst);
        let err = h
            .reconciler
            .run_cycle(&project)
            .await
            .expect_err("cycle should fail");

        assert!(matches!(err, Error::Store { .. }));
        assert_eq!(h.composer.call_count(), 0);
        assert_eq!(h.reconciler.registry().get("demo"), None);

        // Once the store recovers, the same changes are retried.
        h.store.fail.store(false, Ordering::SeqCst);
        let outcome = h.reconciler.run_cycle(&project).await.expect("retry cycle");
        assert!(matches!(outcome, CycleOutcome::Recomposed { .. }));
        assert_eq!(h.store.saved_keys().len(), 2);
    }

    #[tokio::test]
    async fn test_publish_skipped_without_credentials() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        h.reconciler.run_cycle(&project).await.expect("cycle");

        assert_eq!(h.publisher.count(), 0);
        assert!(h.reconciler.registry().contains("demo"));
    }

    #[tokio::test]
    async fn test_publish_runs_per_changed_subgraph_with_credentials() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project_with_credentials();

        h.reconciler.run_cycle(&project).await.expect("cycle");

        let requests = h.publisher.requests.lock().expect("lock");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].service, "users");
        assert_eq!(requests[0].target, "org/project/target");
        assert_eq!(requests[0].author, "platform-team");
        assert_eq!(
            requests[0].schema_path,
            PathBuf::from("/schemas/demo/users/schema.graphql")
        );
        assert_eq!(requests[1].service, "products");
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_cycle() {
        struct FailingPublisher;

        #[async_trait]
        impl SchemaPublisher for FailingPublisher {
            async fn publish(&self, request: &PublishRequest) -> Result<()> {
                Err(Error::publish(&request.service, "exit status 1"))
            }
        }

        let client = Arc::new(demo_client());
        let composer = Arc::new(RecordingComposer::succeeding());
        let reconciler = Reconciler::new(
            Arc::clone(&client) as Arc<dyn SubgraphClient>,
            Arc::clone(&composer) as Arc<dyn CompositionStrategy>,
            Arc::new(MemoryStore::default()),
            Arc::new(FailingPublisher),
            SupergraphRegistry::new(),
        )
        .with_backoff(fast_backoff());

        let err = reconciler
            .run_cycle(&demo_project_with_credentials())
            .await
            .expect_err("publish failure should abort");

        assert!(matches!(err, Error::Publish { .. }));
        assert_eq!(composer.call_count(), 0);
        assert_eq!(reconciler.registry().get("demo"), None);
    }

    #[tokio::test]
    async fn test_composition_failure_keeps_registry_and_advances_cache() {
        let h = harness(
            demo_client(),
            RecordingComposer::failing(vec!["error: field clash"]),
        );
        let project = demo_project();

        let outcome = h.reconciler.run_cycle(&project).await.expect("cycle");

        match outcome {
            CycleOutcome::CompositionFailed { errors, .. } => {
                assert_eq!(errors, vec!["error: field clash".to_string()]);
            }
            other => panic!("expected CompositionFailed, got {other:?}"),
        }
        assert_eq!(h.reconciler.registry().get("demo"), None);

        // The schema set did not change, so the next cycle does not
        // recompose a set already known not to compose.
        let second = h.reconciler.run_cycle(&project).await.expect("second cycle");
        assert_eq!(second, CycleOutcome::Unchanged { subgraph_count: 2 });
        assert_eq!(h.composer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_composition_failure_keeps_previous_supergraph() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let project = demo_project();

        h.reconciler.run_cycle(&project).await.expect("first cycle");
        assert_eq!(
            h.reconciler.registry().get("demo").as_deref(),
            Some("composed supergraph")
        );

        // New schema version fails to compose; the old document stays up.
        h.client
            .set_schema("http://users.internal/graphql", "type Query { broken }");
        *h.composer.outcome.lock().expect("lock") =
            CompositionOutcome::failure(vec!["error: broken".to_string()]);
        let outcome = h.reconciler.run_cycle(&project).await.expect("second cycle");

        assert!(matches!(outcome, CycleOutcome::CompositionFailed { .. }));
        assert_eq!(
            h.reconciler.registry().get("demo").as_deref(),
            Some("composed supergraph")
        );
    }

    #[tokio::test]
    async fn test_blank_composition_output_is_failure() {
        struct BlankComposer;

        #[async_trait]
        impl CompositionStrategy for BlankComposer {
            async fn compose(
                &self,
                _project_id: &str,
                _services: &[ServiceDefinition],
            ) -> Result<CompositionOutcome> {
                Ok(CompositionOutcome::default())
            }
        }

        let client = Arc::new(demo_client());
        let reconciler = Reconciler::new(
            client,
            Arc::new(BlankComposer),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingPublisher::default()),
            SupergraphRegistry::new(),
        )
        .with_backoff(fast_backoff());

        let outcome = reconciler
            .run_cycle(&demo_project())
            .await
            .expect("cycle");

        match outcome {
            CycleOutcome::CompositionFailed { errors, .. } => {
                assert_eq!(errors, vec!["no supergraph SDL generated".to_string()]);
            }
            other => panic!("expected CompositionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_project_without_subgraphs_is_unchanged() {
        let h = harness(demo_client(), RecordingComposer::succeeding());
        let mut project = demo_project();
        project.subgraphs.clear();

        let outcome = h.reconciler.run_cycle(&project).await.expect("cycle");

        assert_eq!(outcome, CycleOutcome::Unchanged { subgraph_count: 0 });
        assert_eq!(h.composer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_projects_have_independent_caches_and_registries() {
        let h = harness(
            MapClient::new(&[
                ("http://users.internal/graphql", "type Query { users: [User] }"),
                (
                    "http://products.internal/graphql",
                    "type Query { products: [Product] }",
                ),
                ("http://pets.internal/graphql", "type Query { pets: [Pet] }"),
            ]),
            RecordingComposer::succeeding(),
        );
        let demo = demo_project();
        let mut zoo = demo_project();
        zoo.id = "zoo".to_string();
        zoo.subgraphs = vec![SubgraphRef::new("pets", "http://pets.internal/graphql")];

        h.reconciler.run_cycle(&demo).await.expect("demo cycle");
        h.reconciler.run_cycle(&zoo).await.expect("zoo cycle");

        assert!(h.reconciler.registry().contains("demo"));
        assert!(h.reconciler.registry().contains("zoo"));
        assert_eq!(h.composer.call_count(), 2);

        // Each project diffs against its own cache.
        let demo_again = h.reconciler.run_cycle(&demo).await.expect("demo again");
        assert_eq!(demo_again, CycleOutcome::Unchanged { subgraph_count: 2 });
    }
}
