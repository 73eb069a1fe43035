//! Built-in dependency graph and change-trigger tables.

use super::{AgentId, ChangeCategory};

/// Declared dependencies of the orchestrated agents.
///
/// Agents absent from this table (the demo and legacy agents) have no
/// dependencies and run wherever they land in the requested order.
pub fn default_dependencies() -> Vec<(AgentId, Vec<AgentId>)> {
    use AgentId::*;

    vec![
        (BusinessLogicPolicy, vec![]),
        (ProductRequirements, vec![BusinessLogicPolicy]),
        (ApiContract, vec![BusinessLogicPolicy, ProductRequirements]),
        (
            TechnicalArchitecture,
            vec![BusinessLogicPolicy, ProductRequirements],
        ),
        (
            QualityTest,
            vec![BusinessLogicPolicy, ApiContract, TechnicalArchitecture],
        ),
        (ChangeImpact, vec![]),
        (ReleaseReadiness, vec![QualityTest, ApiContract]),
    ]
}

/// Agents that conventionally re-run after each category of change.
pub fn default_triggers() -> Vec<(ChangeCategory, Vec<AgentId>)> {
    use AgentId::*;

    vec![
        (
            ChangeCategory::BusinessRuleUpdate,
            vec![
                ProductRequirements,
                ApiContract,
                TechnicalArchitecture,
                QualityTest,
                ReleaseReadiness,
            ],
        ),
        (
            ChangeCategory::ApiContractChange,
            vec![QualityTest, ReleaseReadiness],
        ),
        (ChangeCategory::CodeChange, vec![ChangeImpact, QualityTest]),
        (
            ChangeCategory::ArchitectureChange,
            vec![QualityTest, ReleaseReadiness],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_has_triggers() {
        let categories: HashSet<_> = default_triggers().into_iter().map(|(c, _)| c).collect();
        for category in ChangeCategory::ALL {
            assert!(categories.contains(&category), "missing {}", category);
        }
    }

    #[test]
    fn test_dependencies_reference_declared_agents() {
        let table = default_dependencies();
        let declared: HashSet<_> = table.iter().map(|(a, _)| *a).collect();
        for (_, deps) in &table {
            for dep in deps {
                assert!(declared.contains(dep), "{} is not declared", dep);
            }
        }
    }
}
