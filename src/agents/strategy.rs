//! Strategy Agent: final stage of the council.

use crate::models::{PolicyRecommendation, RecoveryScenario, RiskAnalysis, RiskLevel, Synthesis};
use crate::report::format_currency;

/// Strategy agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyAgent;

impl StrategyAgent {
    pub fn new() -> Self {
        Self
    }

    /// Combine the risk analysis and recovery scenarios into one view.
    pub fn synthesize_insights(
        &self,
        risk: &RiskAnalysis,
        scenarios: &[RecoveryScenario],
    ) -> Synthesis {
        Synthesis {
            executive_summary: format!(
                "Climate damages: {}",
                format_currency(risk.total_damages)
            ),
            key_findings: vec![
                format!("Risk level: {}", risk.risk_level),
                format!("{} recovery scenarios identified", scenarios.len()),
            ],
            priority_level: risk.risk_level,
            total_investment_required: scenarios.iter().map(|s| s.estimated_cost).sum(),
        }
    }

    /// Headline policies budgeted against the total investment.
    pub fn create_policy_recommendations(&self, synthesis: &Synthesis) -> Vec<PolicyRecommendation> {
        let total = synthesis.total_investment_required;
        vec![
            headline_policy(
                "POL-001",
                "Emergency Climate Damage Response Fund",
                RiskLevel::Critical,
                "Establish dedicated emergency fund for immediate climate disaster response",
                total * 0.15,
            ),
            headline_policy(
                "POL-002",
                "National Climate-Resilient Infrastructure Program",
                RiskLevel::High,
                "Comprehensive program to upgrade infrastructure with climate resilience",
                total * 0.40,
            ),
        ]
    }
}

fn headline_policy(
    id: &str,
    title: &str,
    priority: RiskLevel,
    description: &str,
    budget: f64,
) -> PolicyRecommendation {
    PolicyRecommendation {
        policy_id: id.to_string(),
        title: title.to_string(),
        category: None,
        priority,
        description: description.to_string(),
        estimated_budget: budget,
        timeframe: None,
        implementation_steps: Vec::new(),
        expected_outcomes: Vec::new(),
        rank: None,
        urgency_score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::recovery_architect::RecoveryArchitectAgent;
    use crate::models::Correlations;

    fn risk() -> RiskAnalysis {
        RiskAnalysis {
            total_damages: 7_500_000.0,
            average_damages: 937_500.0,
            max_damage: 2_000_000.0,
            data_points: 8,
            countries_analyzed: 8,
            risk_level: RiskLevel::Medium,
            correlations: Correlations::default(),
            high_risk_countries: Vec::new(),
        }
    }

    #[test]
    fn test_synthesize_insights() {
        let risk = risk();
        let scenarios = RecoveryArchitectAgent::new().generate_recovery_scenarios(&risk);
        let synthesis = StrategyAgent::new().synthesize_insights(&risk, &scenarios);

        assert_eq!(synthesis.executive_summary, "Climate damages: $7,500,000.00");
        assert_eq!(
            synthesis.key_findings,
            vec!["Risk level: MEDIUM", "3 recovery scenarios identified"]
        );
        assert_eq!(synthesis.priority_level, RiskLevel::Medium);
        assert!((synthesis.total_investment_required - 7_500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_create_policy_recommendations() {
        let agent = StrategyAgent::new();
        let synthesis = Synthesis {
            executive_summary: String::new(),
            key_findings: Vec::new(),
            priority_level: RiskLevel::High,
            total_investment_required: 1_000_000.0,
        };
        let policies = agent.create_policy_recommendations(&synthesis);

        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].policy_id, "POL-001");
        assert_eq!(policies[0].priority, RiskLevel::Critical);
        assert_eq!(policies[0].estimated_budget, 150_000.0);
        assert_eq!(policies[1].priority, RiskLevel::High);
        assert_eq!(policies[1].estimated_budget, 400_000.0);
    }

    #[test]
    fn test_synthesis_without_scenarios() {
        let synthesis = StrategyAgent::new().synthesize_insights(&risk(), &[]);
        assert_eq!(synthesis.total_investment_required, 0.0);
        assert_eq!(synthesis.key_findings[1], "0 recovery scenarios identified");
    }
}
