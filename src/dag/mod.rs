//! Dependency-ordered agent scheduling.
//!
//! This module orders agents by a static dependency graph and maps change
//! categories to the agents they trigger.
//!
//! ## Architecture
//!
//! 1. **Builder** - Constructs and validates a dependency graph (rejects cycles)
//! 2. **Triggers** - Immutable change-category to agent table
//! 3. **Scheduler** - Computes execution order and waves, analyses change impact
//!
//! ## Example
//!
//! ```
//! use agentry::agents::{AgentId, ChangeCategory};
//! use agentry::dag::AgentScheduler;
//!
//! # fn example() -> anyhow::Result<()> {
//! let scheduler = AgentScheduler::builtin()?;
//!
//! let agents = scheduler.affected_agents(ChangeCategory::ApiContractChange);
//! let order = scheduler.execution_order(agents);
//! assert_eq!(order, vec![AgentId::QualityTest, AgentId::ReleaseReadiness]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod builder;
mod impact;
mod scheduler;
mod triggers;

pub use builder::{AgentIndex, DagBuilder, DependencyGraph};
pub use impact::{ImpactAnalysis, RiskLevel};
pub use scheduler::AgentScheduler;
pub use triggers::TriggerMap;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentId, ChangeCategory};
    use crate::errors::SchedulerError;

    #[test]
    fn test_builtin_graph_is_acyclic() {
        let scheduler = AgentScheduler::builtin().unwrap();
        assert_eq!(scheduler.graph().len(), 7);
        assert_eq!(
            scheduler.graph().root_agents(),
            vec![AgentId::BusinessLogicPolicy, AgentId::ChangeImpact]
        );
    }

    #[test]
    fn test_cyclic_configuration_is_rejected() {
        let result = DagBuilder::new(vec![
            (AgentId::QualityTest, vec![AgentId::ReleaseReadiness]),
            (AgentId::ReleaseReadiness, vec![AgentId::QualityTest]),
        ])
        .build();

        let err = result.unwrap_err();
        assert!(matches!(err, SchedulerError::CycleDetected { .. }));
        assert!(err.to_string().contains("Cycle"));
    }

    #[test]
    fn test_trigger_then_order() {
        let scheduler = AgentScheduler::builtin().unwrap();
        let agents = scheduler.affected_agents(ChangeCategory::CodeChange);
        let order = scheduler.execution_order(agents);
        assert_eq!(order, vec![AgentId::ChangeImpact, AgentId::QualityTest]);
    }
}
