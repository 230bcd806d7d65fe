//! Project discovery from environment variables.
//!
//! Projects are declared entirely through `SUBGRAPH_<PROJECT>_<SETTING>`
//! environment variables. For example:
//!
//! ```text
//! SUBGRAPH_DEMO_USERS=http://localhost:4001/graphql
//! SUBGRAPH_DEMO_PRODUCTS=http://localhost:4002/graphql
//! SUBGRAPH_DEMO_POLL_INTERVAL_S=30
//! ```
//!
//! declares one project `demo` with two subgraphs polled every 30 seconds.
//! Setting names that are not reserved are treated as subgraph declarations,
//! with the lowercased setting name as the subgraph name and the value as
//! its URL.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default polling interval when `POLL_INTERVAL_S` is absent or invalid.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default fetch retry budget when `MAX_RUNTIME_ERRORS` is absent or invalid.
pub const DEFAULT_MAX_FETCH_RETRIES: u32 = 5;

const ENV_PREFIX: &str = "SUBGRAPH_";

const SETTING_POLL_INTERVAL: &str = "POLL_INTERVAL_S";
const SETTING_MAX_RUNTIME_ERRORS: &str = "MAX_RUNTIME_ERRORS";
const SETTING_HIVE_TARGET: &str = "HIVE_TARGET";
const SETTING_HIVE_ACCESS_TOKEN: &str = "HIVE_ACCESS_TOKEN";
const SETTING_HIVE_AUTHOR: &str = "HIVE_AUTHOR";

/// One subgraph endpoint within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphRef {
    /// Subgraph name, lowercased from the environment setting name.
    pub name: String,
    /// GraphQL endpoint URL of the subgraph.
    pub url: String,
}

impl SubgraphRef {
    /// Creates a subgraph reference.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Credentials for publishing subgraph schemas to an external registry.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCredentials {
    /// Registry target identifier.
    pub target: Option<String>,
    /// Registry access token.
    pub access_token: Option<String>,
    /// Author recorded with each publication.
    pub author: Option<String>,
}

impl RegistryCredentials {
    /// True when all three credentials are present.
    ///
    /// Publication is attempted only for complete credential sets.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.target.is_some() && self.access_token.is_some() && self.author.is_some()
    }
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("target", &self.target)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("author", &self.author)
            .finish()
    }
}

/// Configuration for one supergraph project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project identifier, lowercased from the environment variable name.
    pub id: String,
    /// Subgraphs belonging to this project, in declaration order.
    pub subgraphs: Vec<SubgraphRef>,
    /// Interval between polling cycles.
    pub poll_interval: Duration,
    /// Retry budget for a single subgraph fetch. A budget of `n` allows
    /// `n + 1` attempts in total.
    pub max_fetch_retries: u32,
    /// Registry publication credentials.
    pub registry: RegistryCredentials,
}

impl ProjectConfig {
    /// Creates a project with default polling settings and no credentials.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subgraphs: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_fetch_retries: DEFAULT_MAX_FETCH_RETRIES,
            registry: RegistryCredentials::default(),
        }
    }
}

/// Discovers projects from the process environment.
///
/// Returns an empty vector when no `SUBGRAPH_` variables are set; callers
/// decide whether that is fatal.
#[must_use]
pub fn projects_from_env() -> Vec<ProjectConfig> {
    projects_from_entries(std::env::vars())
}

/// Discovers projects from explicit key/value pairs.
///
/// Variables that do not match `SUBGRAPH_<PROJECT>_<SETTING>` or carry an
/// empty value are ignored. Projects are returned sorted by identifier;
/// subgraphs keep their declaration order.
#[must_use]
pub fn projects_from_entries(
    entries: impl IntoIterator<Item = (String, String)>,
) -> Vec<ProjectConfig> {
    let mut projects: BTreeMap<String, ProjectConfig> = BTreeMap::new();

    for (key, value) in entries {
        if !key.starts_with(ENV_PREFIX) || value.is_empty() {
            continue;
        }
        let parts: Vec<&str> = key.split('_').collect();
        if parts.len() < 3 {
            continue;
        }
        let project_id = parts[1].to_lowercase();
        let setting = parts[2..].join("_");

        let project = projects
            .entry(project_id.clone())
            .or_insert_with(|| ProjectConfig::new(project_id));

        match setting.as_str() {
            SETTING_POLL_INTERVAL => {
                project.poll_interval = parse_poll_interval(&value);
            }
            SETTING_MAX_RUNTIME_ERRORS => {
                project.max_fetch_retries =
                    parse_lenient(&value).unwrap_or(DEFAULT_MAX_FETCH_RETRIES);
            }
            SETTING_HIVE_TARGET => {
                project.registry.target = Some(value);
            }
            SETTING_HIVE_ACCESS_TOKEN => {
                project.registry.access_token = Some(value);
            }
            SETTING_HIVE_AUTHOR => {
                project.registry.author = Some(value);
            }
            _ => {
                project
                    .subgraphs
                    .push(SubgraphRef::new(setting.to_lowercase(), value));
            }
        }
    }

    projects.into_values().collect()
}

/// Parses a polling interval in seconds, falling back to the default.
///
/// Non-numeric and negative values fall back; so does zero, since a zero
/// period cannot be scheduled.
fn parse_poll_interval(raw: &str) -> Duration {
    match parse_lenient::<u64>(raw) {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => DEFAULT_POLL_INTERVAL,
    }
}

/// Parses an unsigned number, returning `None` for anything malformed.
fn parse_lenient<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
