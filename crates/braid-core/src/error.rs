//! Error types for braid-core.
//!
//! This module defines the core error type shared across braid crates.
//! Domain crates wrap it in their own error enums via `#[from]`.

use std::fmt;

/// Result type alias using the core error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for braid operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Input validation failed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A requested resource was not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// The kind of resource that was requested.
        resource_type: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal failure.
        message: String,
    },
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a not-found error for a resource.
    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = Error::configuration("no projects defined");
        assert_eq!(
            err.to_string(),
            "configuration error: no projects defined"
        );
    }

    #[test]
    fn test_invalid_input_display() {
        let err = Error::InvalidInput("PORT must be a u16".to_string());
        assert_eq!(err.to_string(), "invalid input: PORT must be a u16");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("supergraph", "demo");
        assert_eq!(err.to_string(), "supergraph not found: demo");
    }

    #[test]
    fn test_internal_display() {
        let err = Error::internal("lock poisoned");
        assert_eq!(err.to_string(), "internal error: lock poisoned");
    }
}
