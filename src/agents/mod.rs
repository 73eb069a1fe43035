//! Agent and change-category identifiers.
//!
//! Agents are opaque to the scheduler: each variant is only a node in the
//! dependency graph. The wire name (`snake_case`) is what appears in
//! `agentry.toml`, on the command line and in serialized impact reports.

mod catalog;

pub use catalog::{default_dependencies, default_triggers};

use crate::errors::CatalogError;
use serde::{Deserialize, Serialize};

/// Identifier of an agent in the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    BusinessLogicPolicy,
    ProductRequirements,
    ApiContract,
    TechnicalArchitecture,
    QualityTest,
    ChangeImpact,
    ReleaseReadiness,
    IntegrationAgent,
    CodeTemplateAgent,
    PromptAmplifierAgent,
    UnitTest,
    ApiSpec,
    BusinessLogic,
    BugScanner,
    CodeReview,
    Documentation,
}

impl AgentId {
    /// Every agent, in declaration order.
    pub const ALL: [AgentId; 16] = [
        AgentId::BusinessLogicPolicy,
        AgentId::ProductRequirements,
        AgentId::ApiContract,
        AgentId::TechnicalArchitecture,
        AgentId::QualityTest,
        AgentId::ChangeImpact,
        AgentId::ReleaseReadiness,
        AgentId::IntegrationAgent,
        AgentId::CodeTemplateAgent,
        AgentId::PromptAmplifierAgent,
        AgentId::UnitTest,
        AgentId::ApiSpec,
        AgentId::BusinessLogic,
        AgentId::BugScanner,
        AgentId::CodeReview,
        AgentId::Documentation,
    ];

    /// The wire name of this agent.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::BusinessLogicPolicy => "business_logic_policy",
            AgentId::ProductRequirements => "product_requirements",
            AgentId::ApiContract => "api_contract",
            AgentId::TechnicalArchitecture => "technical_architecture",
            AgentId::QualityTest => "quality_test",
            AgentId::ChangeImpact => "change_impact",
            AgentId::ReleaseReadiness => "release_readiness",
            AgentId::IntegrationAgent => "integration_agent",
            AgentId::CodeTemplateAgent => "code_template_agent",
            AgentId::PromptAmplifierAgent => "prompt_amplifier_agent",
            AgentId::UnitTest => "unit_test",
            AgentId::ApiSpec => "api_spec",
            AgentId::BusinessLogic => "business_logic",
            AgentId::BugScanner => "bug_scanner",
            AgentId::CodeReview => "code_review",
            AgentId::Documentation => "documentation",
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AgentId::ALL
            .into_iter()
            .find(|agent| agent.as_str() == normalized)
            .ok_or_else(|| CatalogError::UnknownAgent(s.to_string()))
    }
}

/// Classification of an update, used to look up which agents re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    BusinessRuleUpdate,
    ApiContractChange,
    CodeChange,
    ArchitectureChange,
}

impl ChangeCategory {
    pub const ALL: [ChangeCategory; 4] = [
        ChangeCategory::BusinessRuleUpdate,
        ChangeCategory::ApiContractChange,
        ChangeCategory::CodeChange,
        ChangeCategory::ArchitectureChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::BusinessRuleUpdate => "business_rule_update",
            ChangeCategory::ApiContractChange => "api_contract_change",
            ChangeCategory::CodeChange => "code_change",
            ChangeCategory::ArchitectureChange => "architecture_change",
        }
    }
}

impl std::fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ChangeCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_wire_names_round_trip() {
        for agent in AgentId::ALL {
            assert_eq!(agent.as_str().parse::<AgentId>().unwrap(), agent);
        }
    }

    #[test]
    fn test_agent_parse_accepts_kebab_case() {
        assert_eq!(
            "release-readiness".parse::<AgentId>().unwrap(),
            AgentId::ReleaseReadiness
        );
        assert_eq!(
            " API_CONTRACT ".parse::<AgentId>().unwrap(),
            AgentId::ApiContract
        );
    }

    #[test]
    fn test_agent_parse_unknown() {
        let err = "policy_wizard".parse::<AgentId>().unwrap_err();
        assert_eq!(err, CatalogError::UnknownAgent("policy_wizard".into()));
    }

    #[test]
    fn test_agent_serde_matches_display() {
        let json = serde_json::to_string(&AgentId::PromptAmplifierAgent).unwrap();
        assert_eq!(json, "\"prompt_amplifier_agent\"");
        let back: AgentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AgentId::PromptAmplifierAgent);
    }

    #[test]
    fn test_change_category_parse() {
        assert_eq!(
            "code_change".parse::<ChangeCategory>().unwrap(),
            ChangeCategory::CodeChange
        );
        assert!("nonexistent".parse::<ChangeCategory>().is_err());
    }
}
