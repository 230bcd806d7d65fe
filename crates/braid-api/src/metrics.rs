//! Prometheus metrics for the HTTP layer.
//!
//! The recorder is installed once at startup; engine metrics share it.
//! Request metrics are recorded by [`metrics_middleware`] and exposed at
//! `/metrics` by [`serve_metrics`].

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::extract::MatchedPath;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram of request durations in seconds.
pub const API_REQUEST_DURATION: &str = "api_request_duration_seconds";
/// Counter of requests by endpoint, method, and status class.
pub const API_REQUEST_TOTAL: &str = "api_request_total";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder and registers metric descriptions.
///
/// Idempotent; later calls return the existing handle.
///
/// # Panics
///
/// Panics when the recorder cannot be installed, which only happens if a
/// different recorder was installed outside this function.
#[allow(clippy::panic)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .unwrap_or_else(|e| panic!("failed to install Prometheus recorder: {e}"));

            describe_histogram!(
                API_REQUEST_DURATION,
                "Duration of HTTP requests in seconds"
            );
            describe_counter!(API_REQUEST_TOTAL, "Total HTTP requests");
            describe_histogram!(
                braid_engine::metrics::names::CYCLE_DURATION_SECONDS,
                "Duration of reconciliation cycles in seconds"
            );
            describe_counter!(
                braid_engine::metrics::names::CYCLES_TOTAL,
                "Completed reconciliation cycles by outcome"
            );
            describe_counter!(
                braid_engine::metrics::names::TICKS_SKIPPED_TOTAL,
                "Polling ticks dropped because a cycle was still running"
            );
            describe_counter!(
                braid_engine::metrics::names::FETCH_RETRIES_TOTAL,
                "Schema fetch retries"
            );
            describe_counter!(
                braid_engine::metrics::names::COMPOSITIONS_TOTAL,
                "Supergraph composition attempts by outcome"
            );

            handle
        })
        .clone()
}

/// Records duration and count for every request passing through.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let endpoint = endpoint_label(&request);

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = status_class(response.status());

    histogram!(
        API_REQUEST_DURATION,
        "endpoint" => endpoint.clone(),
        "method" => method.clone(),
        "status" => status
    )
    .record(elapsed.as_secs_f64());
    counter!(
        API_REQUEST_TOTAL,
        "endpoint" => endpoint.clone(),
        "method" => method,
        "status" => status
    )
    .increment(1);

    if elapsed > Duration::from_secs(1) {
        tracing::warn!(
            endpoint = %endpoint,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Slow request"
        );
    }

    response
}

/// Serves the Prometheus exposition text.
pub async fn serve_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.get().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Metrics not initialized".to_string(),
            )
        },
        |handle| (StatusCode::OK, handle.render()),
    )
}

/// The route template for matched requests, so label cardinality stays
/// bounded.
fn endpoint_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string())
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "1xx"
    }
}
