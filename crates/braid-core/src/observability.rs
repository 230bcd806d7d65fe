//! Logging initialization and span helpers.
//!
//! Call [`init_logging`] once at process startup. Log level is controlled
//! via the `RUST_LOG` environment variable and defaults to `info`.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON output, one event per line.
    Json,
    /// Human-readable output for local development.
    #[default]
    Pretty,
}

/// Initializes the global tracing subscriber.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span covering one reconciliation cycle for a project.
#[must_use]
pub fn reconcile_span(project_id: &str) -> tracing::Span {
    tracing::info_span!("reconcile", project = project_id)
}

/// Creates a span covering one subgraph schema fetch.
#[must_use]
pub fn fetch_span(url: &str) -> tracing::Span {
    tracing::info_span!("fetch", url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_idempotent() {
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Json);
    }

    #[test]
    fn test_reconcile_span_records_project() {
        init_logging(LogFormat::Pretty);
        let span = reconcile_span("demo");
        let _guard = span.enter();
        tracing::info!("inside reconcile span");
    }

    #[test]
    fn test_fetch_span_records_url() {
        let span = fetch_span("http://localhost:4001/graphql");
        let _guard = span.enter();
        tracing::debug!("inside fetch span");
    }
}
