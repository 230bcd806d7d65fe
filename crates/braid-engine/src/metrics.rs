//! Metrics instrumentation for the reconciliation engine.
//!
//! ## Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `braid_cycle_duration_seconds` | Histogram | `project` | Wall time of one reconciliation cycle |
//! | `braid_cycles_total` | Counter | `project`, `outcome` | Completed cycles by outcome |
//! | `braid_ticks_skipped_total` | Counter | `project` | Ticks dropped because a cycle was still running |
//! | `braid_fetch_retries_total` | Counter | `url` | Schema fetch retries |
//! | `braid_compositions_total` | Counter | `project`, `outcome` | Composition attempts by outcome |
//!
//! ## Usage
//!
//! ```rust,ignore
//! let metrics = EngineMetrics::new();
//! metrics.record_cycle("demo", "recomposed");
//! ```
//!
//! Recording is a no-op until a metrics recorder is installed; the API
//! binary installs the Prometheus recorder at startup.

use std::time::{Duration, Instant};

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Histogram of reconciliation cycle durations.
    pub const CYCLE_DURATION_SECONDS: &str = "braid_cycle_duration_seconds";
    /// Counter of completed cycles by outcome.
    pub const CYCLES_TOTAL: &str = "braid_cycles_total";
    /// Counter of dropped polling ticks.
    pub const TICKS_SKIPPED_TOTAL: &str = "braid_ticks_skipped_total";
    /// Counter of schema fetch retries.
    pub const FETCH_RETRIES_TOTAL: &str = "braid_fetch_retries_total";
    /// Counter of composition attempts by outcome.
    pub const COMPOSITIONS_TOTAL: &str = "braid_compositions_total";
}

/// Metric label constants.
pub mod labels {
    /// Project identifier label.
    pub const PROJECT: &str = "project";
    /// Cycle or composition outcome label.
    pub const OUTCOME: &str = "outcome";
    /// Subgraph endpoint label.
    pub const URL: &str = "url";
}

/// Recorder facade for engine metrics.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics;

impl EngineMetrics {
    /// Creates a metrics facade.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Records the duration of one reconciliation cycle.
    pub fn observe_cycle_duration(&self, project: &str, duration: Duration) {
        histogram!(
            names::CYCLE_DURATION_SECONDS,
            labels::PROJECT => project.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Records a completed cycle with its outcome label.
    pub fn record_cycle(&self, project: &str, outcome: &'static str) {
        counter!(
            names::CYCLES_TOTAL,
            labels::PROJECT => project.to_string(),
            labels::OUTCOME => outcome
        )
        .increment(1);
    }

    /// Records a polling tick dropped due to an in-flight cycle.
    pub fn record_tick_skipped(&self, project: &str) {
        counter!(
            names::TICKS_SKIPPED_TOTAL,
            labels::PROJECT => project.to_string()
        )
        .increment(1);
    }

    /// Records one schema fetch retry.
    pub fn record_fetch_retry(&self, url: &str) {
        counter!(
            names::FETCH_RETRIES_TOTAL,
            labels::URL => url.to_string()
        )
        .increment(1);
    }

    /// Records a composition attempt with its outcome label.
    pub fn record_composition(&self, project: &str, outcome: &'static str) {
        counter!(
            names::COMPOSITIONS_TOTAL,
            labels::PROJECT => project.to_string(),
            labels::OUTCOME => outcome
        )
        .increment(1);
    }
}

/// Runs a closure with the elapsed duration when dropped.
///
/// Used to time cycles without sprinkling `Instant::now()` bookkeeping
/// through the reconcile path.
pub struct TimingGuard<F: FnOnce(Duration)> {
    start: Instant,
    on_drop: Option<F>,
}

impl<F: FnOnce(Duration)> TimingGuard<F> {
    /// Starts timing; `on_drop` receives the elapsed time.
    #[must_use]
    pub fn new(on_drop: F) -> Self {
        Self {
            start: Instant::now(),
            on_drop: Some(on_drop),
        }
    }

    /// Elapsed time since the guard was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<F: FnOnce(Duration)> Drop for TimingGuard<F> {
    fn drop(&mut self) {
        if let Some(f) = self.on_drop.take() {
            f(self.elapsed());
        }
    }
}
