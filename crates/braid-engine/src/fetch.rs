//! Subgraph schema fetching with retries.
//!
//! A fetch issues the federation SDL introspection query against a
//! subgraph endpoint and retries failed attempts with jittered
//! exponential backoff. Structural failures (a 200 response without an
//! SDL document) are retried exactly like transport failures; a broken
//! deploy usually resolves the same way a flaky network does.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use braid_core::observability::fetch_span;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::metrics::EngineMetrics;

/// The federation SDL introspection query.
const SDL_QUERY: &str = "query GetServiceSDL { _service { sdl } }";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry budget applied when the caller does not specify one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct IntrospectionRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    data: Option<IntrospectionData>,
}

#[derive(Debug, Deserialize)]
struct IntrospectionData {
    #[serde(rename = "_service")]
    service: Option<ServiceField>,
}

#[derive(Debug, Deserialize)]
struct ServiceField {
    sdl: Option<String>,
}

/// Issues a single schema introspection request.
///
/// Implementations perform exactly one attempt; retry policy lives in
/// [`SchemaFetcher`].
#[async_trait]
pub trait SubgraphClient: Send + Sync {
    /// Fetches the SDL document from the subgraph at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchAttempt`] for transport failures and
    /// [`Error::InvalidSchema`] when the response carries no SDL.
    async fn fetch_sdl(&self, url: &str) -> Result<String>;
}

/// HTTP subgraph client backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpSubgraphClient {
    client: reqwest::Client,
}

impl HttpSubgraphClient {
    /// Creates a client with a 30 second request timeout.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpSubgraphClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubgraphClient for HttpSubgraphClient {
    async fn fetch_sdl(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(&IntrospectionRequest { query: SDL_QUERY })
            .send()
            .await
            .map_err(|e| Error::fetch_attempt(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch_attempt(
                url,
                format!("request failed with status code {}", status.as_u16()),
            ));
        }

        let body: IntrospectionResponse = response
            .json()
            .await
            .map_err(|e| Error::fetch_attempt(url, e.to_string()))?;

        body.data
            .and_then(|data| data.service)
            .and_then(|service| service.sdl)
            .filter(|sdl| !sdl.is_empty())
            .ok_or_else(|| Error::invalid_schema(url))
    }
}

/// Backoff configuration for fetch retries.
///
/// The delay before retry `attempt` (0-indexed) is
/// `min(base * 2^attempt, max)` with `jitter` applied as a relative
/// factor, clamped to `[floor, max]`.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Delay before the first retry, pre-jitter.
    pub base: Duration,
    /// Upper bound on any delay.
    pub max: Duration,
    /// Lower bound on any delay.
    pub floor: Duration,
    /// Relative jitter, e.g. `0.25` for plus or minus 25 percent.
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
            max: Duration::from_millis(30_000),
            floor: Duration::from_millis(100),
            jitter: 0.25,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retrying after failed attempt `attempt` (0-indexed).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let spread = rand::random::<f64>() * 2.0 - 1.0;
        self.delay_with_spread(attempt, spread)
    }

    /// Deterministic variant; `spread` must lie in `[-1, 1]`.
    #[must_use]
    pub fn delay_with_spread(&self, attempt: u32, spread: f64) -> Duration {
        let exponential = self
            .base
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max);
        let factor = (1.0 + self.jitter * spread).max(0.0);
        exponential.mul_f64(factor).clamp(self.floor, self.max)
    }
}

/// Retrying fetch transport for subgraph schemas.
pub struct SchemaFetcher {
    client: Arc<dyn SubgraphClient>,
    backoff: BackoffPolicy,
    metrics: EngineMetrics,
}

impl SchemaFetcher {
    /// Creates a fetcher with the default backoff policy.
    #[must_use]
    pub fn new(client: Arc<dyn SubgraphClient>) -> Self {
        Self {
            client,
            backoff: BackoffPolicy::default(),
            metrics: EngineMetrics::new(),
        }
    }

    /// Overrides the backoff policy. Tests shrink the base to keep retry
    /// paths fast.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetches the schema at `url` with the default retry budget.
    ///
    /// # Errors
    ///
    /// See [`SchemaFetcher::fetch_schema`].
    pub async fn fetch_schema_default(&self, url: &str) -> Result<String> {
        self.fetch_schema(url, DEFAULT_MAX_RETRIES).await
    }

    /// Fetches the schema at `url`, retrying up to `max_retries` times.
    ///
    /// Makes at most `max_retries + 1` attempts. Every failed attempt is
    /// retried after a backoff delay, whether it failed at the transport
    /// level or structurally.
    ///
    /// # Errors
    ///
    /// With a zero retry budget the single attempt's error is returned
    /// as-is; otherwise exhaustion returns [`Error::FetchExhausted`]
    /// wrapping the final attempt's error.
    pub async fn fetch_schema(&self, url: &str, max_retries: u32) -> Result<String> {
        let span = fetch_span(url);
        self.fetch_with_retries(url, max_retries).instrument(span).await
    }

    async fn fetch_with_retries(&self, url: &str, max_retries: u32) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            match self.client.fetch_sdl(url).await {
                Ok(sdl) => {
                    if attempt > 0 {
                        tracing::info!(
                            url,
                            attempts = attempt + 1,
                            "Successfully fetched schema after retries"
                        );
                    }
                    return Ok(sdl);
                }
                Err(err) => {
                    if attempt >= max_retries {
                        return Err(if max_retries == 0 {
                            err
                        } else {
                            Error::fetch_exhausted(url, max_retries.saturating_add(1), err)
                        });
                    }
                    let delay = self.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        url,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Schema fetch failed, retrying"
                    );
                    self.metrics.record_fetch_retry(url);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
