//! Error types for the reconciliation engine.

/// Result type alias using the engine error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while fetching, storing, publishing, or composing
/// schemas.
///
/// The fetch variants keep the exact message shapes emitted per attempt
/// and after retry exhaustion; operators grep for them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single introspection attempt failed at the transport level.
    #[error("Failed to fetch schema from {url}: {message}")]
    FetchAttempt {
        /// Endpoint that was queried.
        url: String,
        /// Transport-level failure description.
        message: String,
    },

    /// The introspection response did not contain a usable SDL document.
    #[error("Invalid response structure from {url}: SDL not found")]
    InvalidSchema {
        /// Endpoint that returned the malformed response.
        url: String,
    },

    /// A schema fetch exhausted its retry budget.
    #[error("Failed to fetch schema from {url} after {attempts} attempts")]
    FetchExhausted {
        /// Endpoint that was queried.
        url: String,
        /// Total attempts made, retries included.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        source: Box<Error>,
    },

    /// Writing a schema file to durable storage failed.
    #[error("failed to save schema for project {project}/{subgraph}: {message}")]
    Store {
        /// Project the schema belongs to.
        project: String,
        /// Subgraph whose schema was being written.
        subgraph: String,
        /// Description of the filesystem failure.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Publishing a schema to the external registry failed.
    #[error("failed to publish schema for service {service}: {message}")]
    Publish {
        /// Service name that was being published.
        service: String,
        /// Description of the publication failure.
        message: String,
    },

    /// Preparing or running composition failed before it could report a
    /// result.
    #[error("composition failed for project {project}: {message}")]
    Composition {
        /// Project being composed.
        project: String,
        /// Description of the failure.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Running an external command failed before producing output.
    #[error("command {program} failed: {message}")]
    Command {
        /// Program that was invoked.
        program: String,
        /// Description of the spawn or wait failure.
        message: String,
        /// Underlying process error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error bubbled up from braid-core.
    #[error("core error: {0}")]
    Core(#[from] braid_core::Error),
}

impl Error {
    /// Creates a transport-level fetch error for one attempt.
    #[must_use]
    pub fn fetch_attempt(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchAttempt {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a structural fetch error for one attempt.
    #[must_use]
    pub fn invalid_schema(url: impl Into<String>) -> Self {
        Self::InvalidSchema { url: url.into() }
    }

    /// Creates a retry-exhaustion error wrapping the final attempt's error.
    #[must_use]
    pub fn fetch_exhausted(url: impl Into<String>, attempts: u32, source: Error) -> Self {
        Self::FetchExhausted {
            url: url.into(),
            attempts,
            source: Box::new(source),
        }
    }

    /// Creates a storage error with an underlying cause.
    #[must_use]
    pub fn store_with_source(
        project: impl Into<String>,
        subgraph: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            project: project.into(),
            subgraph: subgraph.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a publication error.
    #[must_use]
    pub fn publish(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a composition infrastructure error with an underlying cause.
    #[must_use]
    pub fn composition_with_source(
        project: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Composition {
            project: project.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a command error with an underlying cause.
    #[must_use]
    pub fn command_with_source(
        program: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Command {
            program: program.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
