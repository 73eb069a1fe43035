//! Change-impact reports.

use crate::agents::{AgentId, ChangeCategory};
use serde::{Deserialize, Serialize};

/// Risk attached to a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Rule-count threshold above which a business rule update is high risk.
    pub const RULE_COUNT_THRESHOLD: usize = 3;

    /// Classify the risk of a change.
    pub fn classify(category: ChangeCategory, affected_rules: usize) -> Self {
        match category {
            ChangeCategory::BusinessRuleUpdate if affected_rules > Self::RULE_COUNT_THRESHOLD => {
                RiskLevel::High
            }
            ChangeCategory::BusinessRuleUpdate => RiskLevel::Medium,
            ChangeCategory::ApiContractChange => RiskLevel::High,
            ChangeCategory::CodeChange | ChangeCategory::ArchitectureChange => RiskLevel::Low,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Result of analysing a change against the agent graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub change_type: ChangeCategory,
    pub affected_rule_ids: Vec<String>,
    pub affected_agents: Vec<AgentId>,
    /// Affected agents in execution order
    pub required_reruns: Vec<AgentId>,
    pub risk_level: RiskLevel,
    /// Number of agents that must re-run
    pub estimated_impact: usize,
}
