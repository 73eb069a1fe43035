//! DAG builder for constructing agent dependency graphs.
//!
//! The builder takes a table of agents with their declared dependencies and
//! constructs an immutable directed acyclic graph that the scheduler orders
//! requested agents against.

use crate::agents::AgentId;
use crate::errors::SchedulerError;
use std::collections::{HashMap, HashSet};

/// Index into the agent list.
pub type AgentIndex = usize;

/// An immutable, validated graph of agent dependencies.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Agents indexed by their position
    agents: Vec<AgentId>,
    /// Map from agent to index
    index_map: HashMap<AgentId, AgentIndex>,
    /// Forward edges: index -> agents that depend on it
    forward_edges: Vec<Vec<AgentIndex>>,
    /// Reverse edges: index -> agents it depends on, in declaration order
    reverse_edges: Vec<Vec<AgentIndex>>,
}

impl DependencyGraph {
    /// Get the number of agents in the graph.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// All agents known to the graph, declared entries first.
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// Get the index for an agent.
    pub fn get_index(&self, agent: AgentId) -> Option<AgentIndex> {
        self.index_map.get(&agent).copied()
    }

    /// Check if the graph has an entry for the agent.
    pub fn contains(&self, agent: AgentId) -> bool {
        self.index_map.contains_key(&agent)
    }

    /// Declared dependencies of an agent, in declaration order.
    ///
    /// Agents the graph does not know have no dependencies.
    pub fn dependencies(&self, agent: AgentId) -> Vec<AgentId> {
        self.get_index(agent)
            .and_then(|i| self.reverse_edges.get(i))
            .map(|deps| deps.iter().map(|&d| self.agents[d]).collect())
            .unwrap_or_default()
    }

    /// Agents that declare a dependency on the given agent.
    pub fn dependents(&self, agent: AgentId) -> Vec<AgentId> {
        self.get_index(agent)
            .and_then(|i| self.forward_edges.get(i))
            .map(|deps| deps.iter().map(|&d| self.agents[d]).collect())
            .unwrap_or_default()
    }

    /// Agents with no dependencies (entry points).
    pub fn root_agents(&self) -> Vec<AgentId> {
        self.reverse_edges
            .iter()
            .enumerate()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(i, _)| self.agents[i])
            .collect()
    }

    /// Agents that nothing depends on (exit points).
    pub fn leaf_agents(&self) -> Vec<AgentId> {
        self.forward_edges
            .iter()
            .enumerate()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(i, _)| self.agents[i])
            .collect()
    }
}

/// Builder for constructing dependency graphs.
pub struct DagBuilder {
    entries: Vec<(AgentId, Vec<AgentId>)>,
}

impl DagBuilder {
    /// Create a new builder from `(agent, dependencies)` entries.
    pub fn new(entries: Vec<(AgentId, Vec<AgentId>)>) -> Self {
        Self { entries }
    }

    /// Build the dependency graph.
    ///
    /// This validates the graph structure:
    /// - Each agent may have at most one entry
    /// - No cycles are allowed
    ///
    /// Dependencies on agents without an entry of their own are added as
    /// nodes with no dependencies. Repeated dependencies within one entry
    /// are collapsed.
    pub fn build(self) -> Result<DependencyGraph, SchedulerError> {
        let mut agents = Vec::new();
        let mut index_map = HashMap::new();

        for (agent, _) in &self.entries {
            if index_map.contains_key(agent) {
                return Err(SchedulerError::DuplicateAgent {
                    agent: agent.to_string(),
                });
            }
            index_map.insert(*agent, agents.len());
            agents.push(*agent);
        }

        for (_, deps) in &self.entries {
            for dep in deps {
                if !index_map.contains_key(dep) {
                    index_map.insert(*dep, agents.len());
                    agents.push(*dep);
                }
            }
        }

        let mut forward_edges: Vec<Vec<AgentIndex>> = vec![Vec::new(); agents.len()];
        let mut reverse_edges: Vec<Vec<AgentIndex>> = vec![Vec::new(); agents.len()];

        for (agent, deps) in &self.entries {
            let to_idx = index_map[agent];
            let mut seen = HashSet::new();
            for dep in deps {
                if !seen.insert(*dep) {
                    continue;
                }
                let from_idx = index_map[dep];
                // from must run before to
                forward_edges[from_idx].push(to_idx);
                reverse_edges[to_idx].push(from_idx);
            }
        }

        let graph = DependencyGraph {
            agents,
            index_map,
            forward_edges,
            reverse_edges,
        };

        Self::validate_no_cycles(&graph)?;

        Ok(graph)
    }

    /// Validate that the graph has no cycles using Kahn's algorithm.
    fn validate_no_cycles(graph: &DependencyGraph) -> Result<(), SchedulerError> {
        let mut in_degree: Vec<usize> = graph.reverse_edges.iter().map(|deps| deps.len()).collect();

        let mut queue: Vec<AgentIndex> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, deg)| *deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut processed = 0;

        while let Some(node) = queue.pop() {
            processed += 1;

            for &dependent in &graph.forward_edges[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push(dependent);
                }
            }
        }

        if processed != graph.len() {
            let agents: Vec<String> = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, deg)| *deg > 0)
                .map(|(i, _)| graph.agents[i].to_string())
                .collect();

            return Err(SchedulerError::CycleDetected { agents });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AgentId::*;

    #[test]
    fn test_build_simple_graph() {
        let graph = DagBuilder::new(vec![
            (BusinessLogicPolicy, vec![]),
            (ProductRequirements, vec![BusinessLogicPolicy]),
            (ApiContract, vec![BusinessLogicPolicy]),
            (QualityTest, vec![ProductRequirements, ApiContract]),
        ])
        .build()
        .unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.root_agents(), vec![BusinessLogicPolicy]);
        assert_eq!(graph.leaf_agents(), vec![QualityTest]);
    }

    #[test]
    fn test_dependencies_and_dependents() {
        let graph = DagBuilder::new(vec![
            (BusinessLogicPolicy, vec![]),
            (ProductRequirements, vec![BusinessLogicPolicy]),
            (ApiContract, vec![BusinessLogicPolicy]),
        ])
        .build()
        .unwrap();

        assert!(graph.dependencies(BusinessLogicPolicy).is_empty());
        assert_eq!(
            graph.dependencies(ProductRequirements),
            vec![BusinessLogicPolicy]
        );
        let dependents = graph.dependents(BusinessLogicPolicy);
        assert!(dependents.contains(&ProductRequirements));
        assert!(dependents.contains(&ApiContract));
    }

    #[test]
    fn test_undeclared_dependency_becomes_root() {
        let graph = DagBuilder::new(vec![(ReleaseReadiness, vec![QualityTest])])
            .build()
            .unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.contains(QualityTest));
        assert!(graph.dependencies(QualityTest).is_empty());
    }

    #[test]
    fn test_unknown_agent_has_no_dependencies() {
        let graph = DagBuilder::new(vec![(ApiSpec, vec![])]).build().unwrap();
        assert!(graph.dependencies(Documentation).is_empty());
        assert!(!graph.contains(Documentation));
    }

    #[test]
    fn test_cycle_detection() {
        let result = DagBuilder::new(vec![
            (ApiContract, vec![QualityTest]),
            (TechnicalArchitecture, vec![ApiContract]),
            (QualityTest, vec![TechnicalArchitecture]),
            (Documentation, vec![]),
        ])
        .build();

        match result {
            Err(SchedulerError::CycleDetected { agents }) => {
                assert_eq!(agents.len(), 3);
                assert!(agents.contains(&"api_contract".to_string()));
                assert!(!agents.contains(&"documentation".to_string()));
            }
            other => panic!("Expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let result = DagBuilder::new(vec![(UnitTest, vec![UnitTest])]).build();
        assert!(matches!(result, Err(SchedulerError::CycleDetected { .. })));
    }

    #[test]
    fn test_duplicate_agent_entry() {
        let result = DagBuilder::new(vec![(UnitTest, vec![]), (UnitTest, vec![])]).build();
        assert!(matches!(result, Err(SchedulerError::DuplicateAgent { .. })));
    }

    #[test]
    fn test_repeated_dependency_collapsed() {
        let graph = DagBuilder::new(vec![
            (CodeReview, vec![]),
            (BugScanner, vec![CodeReview, CodeReview]),
        ])
        .build()
        .unwrap();

        assert_eq!(graph.dependencies(BugScanner), vec![CodeReview]);
        assert_eq!(graph.dependents(CodeReview), vec![BugScanner]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DagBuilder::new(vec![]).build().unwrap();
        assert!(graph.is_empty());
    }
}
