//! Change-category to agent lookup table.

use crate::agents::{AgentId, ChangeCategory, default_triggers};
use std::collections::HashMap;

/// Immutable map from change category to the agents it triggers.
#[derive(Debug, Clone, Default)]
pub struct TriggerMap {
    triggers: HashMap<ChangeCategory, Vec<AgentId>>,
}

impl TriggerMap {
    /// Build a trigger map from `(category, agents)` entries.
    ///
    /// A later entry for the same category replaces the earlier one.
    /// Repeated agents within an entry keep their first position.
    pub fn new(entries: Vec<(ChangeCategory, Vec<AgentId>)>) -> Self {
        let mut triggers = HashMap::new();
        for (category, agents) in entries {
            let mut unique = Vec::with_capacity(agents.len());
            for agent in agents {
                if !unique.contains(&agent) {
                    unique.push(agent);
                }
            }
            triggers.insert(category, unique);
        }
        Self { triggers }
    }

    /// The built-in trigger table.
    pub fn builtin() -> Self {
        Self::new(default_triggers())
    }

    /// Agents triggered by a category; empty when the category has no entry.
    pub fn get(&self, category: ChangeCategory) -> &[AgentId] {
        self.triggers.get(&category).map_or(&[], |v| v.as_slice())
    }

    /// Categories with an entry, in canonical order.
    pub fn categories(&self) -> Vec<ChangeCategory> {
        ChangeCategory::ALL
            .into_iter()
            .filter(|c| self.triggers.contains_key(c))
            .collect()
    }
}
