//! Typed error hierarchy for agentry.
//!
//! Three enums cover the three places where input can be rejected:
//! - `CatalogError`: unknown agent or change-category names
//! - `SchedulerError`: invalid dependency graphs
//! - `ConfigError`: `agentry.toml` loading and resolution failures
//!
//! Response extraction has no error type: it degrades to a textual fallback.

use thiserror::Error;

/// Errors from parsing agent and change-category names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("Unknown change category '{0}'")]
    UnknownCategory(String),
}

/// Errors from building a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("Cycle detected in agent dependencies. Involved agents: {agents:?}")]
    CycleDetected { agents: Vec<String> },

    #[error("Duplicate dependency entry for agent '{agent}'")]
    DuplicateAgent { agent: String },
}

/// Errors from loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse agentry.toml: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("Failed to serialize agentry.toml: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("Unknown agent '{name}' in [{section}]")]
    UnknownAgent { section: String, name: String },

    #[error("Unknown change category '{name}' in [triggers]")]
    UnknownCategory { name: String },

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
