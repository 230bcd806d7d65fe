//! The braid HTTP server.
//!
//! Serves composed supergraphs out of the shared registry, plus health,
//! readiness, and metrics endpoints. The server holds no reconciliation
//! logic; it only reads what the engine has composed.

use std::fmt;
use std::net::SocketAddr;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use braid_core::error::{Error, Result};
use braid_core::SupergraphRegistry;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::ApiError;

/// Body of `/health` responses.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    /// Always `"ok"` while the process is up.
    pub status: String,
}

/// Body of `/ready` responses.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ReadyResponse {
    /// True once at least one supergraph has composed.
    pub ready: bool,
    /// Explanation when not ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    registry: SupergraphRegistry,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry.len())
            .finish()
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if state.registry.is_empty() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                message: Some("No supergraph available".to_string()),
            }),
        )
    } else {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                message: None,
            }),
        )
    }
}

async fn get_supergraph(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> std::result::Result<Response, ApiError> {
    state
        .registry
        .get(&project_id)
        .map(|sdl| {
            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                sdl,
            )
                .into_response()
        })
        .ok_or_else(|| ApiError::not_found("Supergraph is not available"))
}

/// The braid HTTP server.
pub struct Server {
    config: Config,
    registry: SupergraphRegistry,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("registry", &self.registry.len())
            .finish()
    }
}

impl Server {
    /// Creates a server reading from `registry`.
    #[must_use]
    pub fn new(config: Config, registry: SupergraphRegistry) -> Self {
        Self { config, registry }
    }

    /// Starts a builder with default configuration.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    fn create_router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
        };

        // Middleware order matters: metrics outermost for timing, then
        // trace, then CORS.
        Router::new()
            .route("/supergraph/:project_id", get(get_supergraph))
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/metrics", get(crate::metrics::serve_metrics))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn(crate::metrics::metrics_middleware))
            .with_state(state)
    }

    /// Binds and serves until the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error when the listen address cannot be bound or the
    /// server loop fails.
    pub async fn serve(self) -> Result<()> {
        crate::metrics::init_metrics();
        let router = self.create_router();

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            Error::internal(format!("failed to bind to {addr}: {e}"))
        })?;
        tracing::info!(addr = %addr, "HTTP server listening");

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("server error: {e}")))
    }

    /// Router for in-process testing without binding a socket.
    #[doc(hidden)]
    #[must_use]
    pub fn test_router(&self) -> Router {
        self.create_router()
    }
}

/// Builder for [`Server`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Config,
    registry: Option<SupergraphRegistry>,
}

impl ServerBuilder {
    /// Sets the server configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the listen port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the supergraph registry the server reads from.
    #[must_use]
    pub fn registry(mut self, registry: SupergraphRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the server, defaulting to an empty registry.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            config: self.config,
            registry: self.registry.unwrap_or_default(),
        }
    }
}
