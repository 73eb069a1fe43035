//! Agent scheduler: dependency ordering and change-trigger lookup.
//!
//! The scheduler holds an immutable dependency graph and trigger map supplied
//! at construction. Every operation is a pure function of that configuration
//! and its arguments, so a single scheduler can be shared freely.

use crate::agents::{AgentId, ChangeCategory, default_dependencies};
use crate::dag::builder::{DagBuilder, DependencyGraph};
use crate::dag::impact::{ImpactAnalysis, RiskLevel};
use crate::dag::triggers::TriggerMap;
use crate::errors::SchedulerError;
use std::collections::HashSet;
use tracing::debug;

/// Orders agents by their declared dependencies.
#[derive(Debug, Clone)]
pub struct AgentScheduler {
    graph: DependencyGraph,
    triggers: TriggerMap,
}

impl AgentScheduler {
    /// Create a scheduler over a validated graph and trigger map.
    pub fn new(graph: DependencyGraph, triggers: TriggerMap) -> Self {
        Self { graph, triggers }
    }

    /// Create a scheduler from the built-in dependency and trigger tables.
    pub fn builtin() -> Result<Self, SchedulerError> {
        let graph = DagBuilder::new(default_dependencies()).build()?;
        Ok(Self::new(graph, TriggerMap::builtin()))
    }

    /// Get the dependency graph.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Get the trigger map.
    pub fn triggers(&self) -> &TriggerMap {
        &self.triggers
    }

    /// Order the requested agents so that each runs after its requested
    /// dependencies.
    ///
    /// Duplicates are ignored; the first occurrence of each agent fixes where
    /// the traversal starts. Dependencies that were not requested are not
    /// added to the result.
    pub fn execution_order<I>(&self, requested: I) -> Vec<AgentId>
    where
        I: IntoIterator<Item = AgentId>,
    {
        let (requested, wanted) = dedup(requested);

        let mut visited = HashSet::with_capacity(requested.len());
        let mut ordered = Vec::with_capacity(requested.len());

        for agent in &requested {
            self.visit(*agent, &wanted, &mut visited, &mut ordered);
        }

        debug!(order = ?ordered, "computed execution order");
        ordered
    }

    // Post-order DFS. Terminates because the graph was validated acyclic.
    fn visit(
        &self,
        agent: AgentId,
        wanted: &HashSet<AgentId>,
        visited: &mut HashSet<AgentId>,
        ordered: &mut Vec<AgentId>,
    ) {
        if !visited.insert(agent) {
            return;
        }

        for dep in self.graph.dependencies(agent) {
            if wanted.contains(&dep) {
                self.visit(dep, wanted, visited, ordered);
            }
        }

        ordered.push(agent);
    }

    /// Group the requested agents into waves that can run together.
    ///
    /// Every agent in a wave has all of its requested dependencies in
    /// earlier waves. Agents keep their request order within a wave.
    pub fn execution_waves<I>(&self, requested: I) -> Vec<Vec<AgentId>>
    where
        I: IntoIterator<Item = AgentId>,
    {
        let (requested, wanted) = dedup(requested);

        let mut waves = Vec::new();
        let mut completed: HashSet<AgentId> = HashSet::new();

        loop {
            let ready: Vec<AgentId> = requested
                .iter()
                .copied()
                .filter(|agent| !completed.contains(agent))
                .filter(|agent| {
                    self.graph
                        .dependencies(*agent)
                        .iter()
                        .all(|dep| !wanted.contains(dep) || completed.contains(dep))
                })
                .collect();

            if ready.is_empty() {
                break;
            }

            completed.extend(ready.iter().copied());
            waves.push(ready);
        }

        waves
    }

    /// Agents triggered by a change category.
    pub fn affected_agents(&self, category: ChangeCategory) -> Vec<AgentId> {
        self.triggers.get(category).to_vec()
    }

    /// Agents triggered by a change category given by name.
    ///
    /// Unknown names yield an empty list rather than an error.
    pub fn affected_agents_by_name(&self, name: &str) -> Vec<AgentId> {
        match name.parse::<ChangeCategory>() {
            Ok(category) => self.affected_agents(category),
            Err(e) => {
                debug!(error = %e, "no agents for unrecognized change category");
                Vec::new()
            }
        }
    }

    /// Analyse a change: classify its risk and plan the agent re-runs.
    pub fn analyze_change_impact(
        &self,
        category: ChangeCategory,
        affected_rule_ids: &[String],
        affected_agents: &[AgentId],
    ) -> ImpactAnalysis {
        let required_reruns = self.execution_order(affected_agents.iter().copied());
        let risk_level = RiskLevel::classify(category, affected_rule_ids.len());

        ImpactAnalysis {
            change_type: category,
            affected_rule_ids: affected_rule_ids.to_vec(),
            affected_agents: affected_agents.to_vec(),
            estimated_impact: required_reruns.len(),
            required_reruns,
            risk_level,
        }
    }
}

fn dedup<I>(requested: I) -> (Vec<AgentId>, HashSet<AgentId>)
where
    I: IntoIterator<Item = AgentId>,
{
    let mut wanted = HashSet::new();
    let ordered = requested
        .into_iter()
        .filter(|agent| wanted.insert(*agent))
        .collect();
    (ordered, wanted)
}
