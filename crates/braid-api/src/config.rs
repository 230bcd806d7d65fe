//! Server configuration from environment variables.

use std::path::PathBuf;

use braid_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the braid server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Directory fetched subgraph schemas are written under.
    pub schema_dir: PathBuf,
    /// Program invoked to publish schemas to the registry.
    pub hive_binary: String,
    /// Program invoked to compose supergraphs.
    pub compose_binary: String,
    /// Scratch directory for composition inputs.
    pub compose_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            schema_dir: PathBuf::from("./schemas"),
            hive_binary: "hive".to_string(),
            compose_binary: "rover".to_string(),
            compose_dir: PathBuf::from("./compose"),
        }
    }
}

impl Config {
    /// Builds configuration from environment variables.
    ///
    /// Supported variables:
    ///
    /// - `PORT` (fallback `BRAID_PORT`): HTTP listen port
    /// - `BRAID_SCHEMA_DIR`: schema storage directory
    /// - `BRAID_HIVE_BIN`: registry publisher program
    /// - `BRAID_COMPOSE_BIN`: composition program
    /// - `BRAID_COMPOSE_DIR`: composition scratch directory
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_u16("PORT")? {
            config.port = port;
        } else if let Some(port) = env_u16("BRAID_PORT")? {
            config.port = port;
        }
        if let Some(dir) = env_string("BRAID_SCHEMA_DIR") {
            config.schema_dir = PathBuf::from(dir);
        }
        if let Some(program) = env_string("BRAID_HIVE_BIN") {
            config.hive_binary = program;
        }
        if let Some(program) = env_string("BRAID_COMPOSE_BIN") {
            config.compose_binary = program;
        }
        if let Some(dir) = env_string("BRAID_COMPOSE_DIR") {
            config.compose_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

/// Reads a trimmed, non-empty string variable.
fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads a u16 variable, erroring on values that do not parse.
fn env_u16(name: &str) -> Result<Option<u16>> {
    match env_string(name) {
        Some(value) => value
            .parse::<u16>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a u16: {e}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
        assert_eq!(config.hive_binary, "hive");
        assert_eq!(config.compose_binary, "rover");
        assert_eq!(config.compose_dir, PathBuf::from("./compose"));
    }

    #[test]
    fn test_env_string_trims_and_drops_empty() {
        std::env::set_var("BRAID_TEST_STRING_SET", "  value  ");
        std::env::set_var("BRAID_TEST_STRING_BLANK", "   ");

        assert_eq!(
            env_string("BRAID_TEST_STRING_SET").as_deref(),
            Some("value")
        );
        assert_eq!(env_string("BRAID_TEST_STRING_BLANK"), None);
        assert_eq!(env_string("BRAID_TEST_STRING_UNSET"), None);
    }

    #[test]
    fn test_env_u16_parses() {
        std::env::set_var("BRAID_TEST_U16_OK", "9090");
        assert_eq!(env_u16("BRAID_TEST_U16_OK").expect("parse"), Some(9090));
        assert_eq!(env_u16("BRAID_TEST_U16_UNSET").expect("parse"), None);
    }

    #[test]
    fn test_env_u16_rejects_garbage() {
        std::env::set_var("BRAID_TEST_U16_BAD", "not-a-port");
        let err = env_u16("BRAID_TEST_U16_BAD").expect_err("should fail");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("BRAID_TEST_U16_BAD"));
    }
}
