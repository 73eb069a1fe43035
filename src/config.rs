//! Configuration loaded from `agentry.toml`.
//!
//! The file supplies extraction defaults and, optionally, a replacement
//! dependency graph and trigger table. Sections that are absent fall back to
//! the built-in catalog. Settings are layered file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [extract]
//! fallback_to_text = true
//! allow_multiple = false
//! preferred_keys = ["openapi_spec"]
//!
//! [dependencies]
//! business_logic_policy = []
//! product_requirements = ["business_logic_policy"]
//!
//! [triggers]
//! code_change = ["change_impact", "quality_test"]
//! ```

use crate::agents::{AgentId, ChangeCategory, default_dependencies, default_triggers};
use crate::dag::{AgentScheduler, DagBuilder, TriggerMap};
use crate::errors::ConfigError;
use crate::extract::ExtractOptions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "agentry.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "AGENTRY_CONFIG";

/// Environment variable overriding `extract.fallback_to_text`.
pub const FALLBACK_ENV: &str = "AGENTRY_FALLBACK_TO_TEXT";

/// Parsed contents of `agentry.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentryToml {
    /// Default extraction options
    #[serde(default)]
    pub extract: ExtractOptions,
    /// Agent -> agents it depends on. Absent means the built-in graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, Vec<String>>>,
    /// Change category -> agents it triggers. Absent means the built-in table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<BTreeMap<String, Vec<String>>>,
}

impl AgentryToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Load configuration from `path`, or the defaults if it doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using built-in catalog");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A configuration spelling out the built-in tables.
    pub fn builtin() -> Self {
        let dependencies = default_dependencies()
            .into_iter()
            .map(|(agent, deps)| (agent.to_string(), names(&deps)))
            .collect();
        let triggers = default_triggers()
            .into_iter()
            .map(|(category, agents)| (category.to_string(), names(&agents)))
            .collect();

        Self {
            extract: ExtractOptions::default(),
            dependencies: Some(dependencies),
            triggers: Some(triggers),
        }
    }

    /// Resolved dependency entries.
    pub fn dependency_entries(&self) -> Result<Vec<(AgentId, Vec<AgentId>)>, ConfigError> {
        let Some(table) = &self.dependencies else {
            return Ok(default_dependencies());
        };

        table
            .iter()
            .map(|(agent, deps)| -> Result<_, ConfigError> {
                Ok((
                    parse_agent("dependencies", agent)?,
                    deps.iter()
                        .map(|dep| parse_agent("dependencies", dep))
                        .collect::<Result<Vec<_>, _>>()?,
                ))
            })
            .collect()
    }

    /// Resolved trigger entries.
    pub fn trigger_entries(&self) -> Result<Vec<(ChangeCategory, Vec<AgentId>)>, ConfigError> {
        let Some(table) = &self.triggers else {
            return Ok(default_triggers());
        };

        table
            .iter()
            .map(|(category, agents)| -> Result<_, ConfigError> {
                let category = category
                    .parse::<ChangeCategory>()
                    .map_err(|_| ConfigError::UnknownCategory {
                        name: category.clone(),
                    })?;
                let agents = agents
                    .iter()
                    .map(|agent| parse_agent("triggers", agent))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((category, agents))
            })
            .collect()
    }

    /// Build a scheduler from the configured graph and triggers.
    pub fn scheduler(&self) -> Result<AgentScheduler, ConfigError> {
        let graph = DagBuilder::new(self.dependency_entries()?).build()?;
        let triggers = TriggerMap::new(self.trigger_entries()?);
        Ok(AgentScheduler::new(graph, triggers))
    }

    /// Extraction options with the environment override applied.
    pub fn extract_options(&self) -> ExtractOptions {
        let mut options = self.extract.clone();
        let raw = std::env::var(FALLBACK_ENV).ok();
        if let Some(value) = &raw
            && !is_boolean(value)
        {
            warn!(
                value = %value,
                "{} is not a boolean, treating it as true", FALLBACK_ENV
            );
        }
        if let Some(fallback) = fallback_override(raw) {
            options.fallback_to_text = fallback;
        }
        options
    }

    /// Validate the configuration.
    ///
    /// Unknown names and cyclic graphs are errors; suspicious but usable
    /// settings are returned as warnings.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        let scheduler = self.scheduler()?;
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for key in &self.extract.preferred_keys {
            if !seen.insert(key) {
                warnings.push(format!("Duplicate preferred key '{}'", key));
            }
        }

        for category in ChangeCategory::ALL {
            let agents = scheduler.affected_agents(category);
            if self.triggers.is_some() && agents.is_empty() {
                warnings.push(format!("Change category '{}' triggers no agents", category));
            }
            for agent in agents {
                if !scheduler.graph().contains(agent) {
                    warnings.push(format!(
                        "Agent '{}' is triggered by '{}' but has no dependency entry",
                        agent, category
                    ));
                }
            }
        }

        Ok(warnings)
    }
}

fn names(agents: &[AgentId]) -> Vec<String> {
    agents.iter().map(ToString::to_string).collect()
}

fn parse_agent(section: &str, name: &str) -> Result<AgentId, ConfigError> {
    name.parse().map_err(|_| ConfigError::UnknownAgent {
        section: section.to_string(),
        name: name.to_string(),
    })
}

fn is_boolean(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "false" | "1" | "0"
    )
}

/// Interpret the fallback environment override. Anything but `false`/`0`
/// enables the fallback.
fn fallback_override(value: Option<String>) -> Option<bool> {
    value.map(|v| {
        let v = v.trim().to_lowercase();
        v != "false" && v != "0"
    })
}
