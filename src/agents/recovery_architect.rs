//! Recovery Architect: second stage of the council.
//!
//! Converts the risk picture into costed recovery pathways.

use super::strings;
use crate::models::{RecoveryScenario, RiskAnalysis};
use serde::{Deserialize, Serialize};

/// Share of total damages allocated to each recovery scenario.
const SCENARIO_SHARES: [f64; 3] = [0.15, 0.35, 0.50];

/// One period of a country's recovery pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStage {
    pub period: String,
    pub gdp_impact: String,
    pub recovery_investment: f64,
    pub expected_recovery: String,
}

/// Multi-year economic recovery model for a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryModel {
    pub country: String,
    pub baseline_damage: f64,
    pub recovery_pathway: Vec<RecoveryStage>,
    pub total_investment_needed: f64,
    pub roi_estimate: String,
}

/// Projected outcome of an intervention under one set of assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCase {
    pub damage_reduction: String,
    pub economic_growth: String,
    pub jobs_created: u64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionOutcomes {
    pub best_case: OutcomeCase,
    pub expected_case: OutcomeCase,
    pub worst_case: OutcomeCase,
}

/// Simulated outcomes of funding a recovery scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionSimulation {
    pub scenario: String,
    pub investment: f64,
    pub outcomes: InterventionOutcomes,
    pub risk_factors: Vec<String>,
}

/// Recovery Architect agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryArchitectAgent;

impl RecoveryArchitectAgent {
    pub fn new() -> Self {
        Self
    }

    /// Three recovery scenarios costed as shares of the total damages.
    pub fn generate_recovery_scenarios(&self, risk: &RiskAnalysis) -> Vec<RecoveryScenario> {
        let total = risk.total_damages;
        let [immediate, short_term, long_term] = SCENARIO_SHARES;

        vec![
            RecoveryScenario {
                scenario_name: "Immediate Emergency Response".to_string(),
                timeframe: "0-6 months".to_string(),
                focus: "Emergency relief and immediate damage mitigation".to_string(),
                estimated_cost: total * immediate,
                expected_impact: "Prevent further immediate losses, stabilize affected regions"
                    .to_string(),
                key_actions: strings(&[
                    "Deploy emergency relief funds",
                    "Establish disaster response coordination",
                    "Provide immediate financial aid to affected populations",
                    "Assess and secure critical infrastructure",
                ]),
            },
            RecoveryScenario {
                scenario_name: "Short-term Recovery & Rebuilding".to_string(),
                timeframe: "6-24 months".to_string(),
                focus: "Infrastructure rebuilding and economic stabilization".to_string(),
                estimated_cost: total * short_term,
                expected_impact:
                    "Restore 60-70% of economic activity, rebuild critical infrastructure"
                        .to_string(),
                key_actions: strings(&[
                    "Rebuild damaged infrastructure with climate-resilient designs",
                    "Provide business recovery loans and grants",
                    "Implement temporary economic stimulus programs",
                    "Establish early warning systems",
                ]),
            },
            RecoveryScenario {
                scenario_name: "Long-term Climate Resilience".to_string(),
                timeframe: "2-10 years".to_string(),
                focus: "Systemic resilience building and prevention".to_string(),
                estimated_cost: total * long_term,
                expected_impact:
                    "Reduce future climate damages by 40-60%, build sustainable economy"
                        .to_string(),
                key_actions: strings(&[
                    "Invest in renewable energy infrastructure",
                    "Implement comprehensive climate adaptation strategies",
                    "Develop climate-smart agriculture and industry",
                    "Create green jobs and sustainable economic sectors",
                    "Establish climate risk insurance mechanisms",
                ]),
            },
        ]
    }

    /// Ten-year recovery pathway for a country with the given damage baseline.
    pub fn model_economic_recovery(&self, country: &str, baseline_damage: f64) -> RecoveryModel {
        let stage = |period: &str, gdp_impact: &str, share: f64, expected: &str| RecoveryStage {
            period: period.to_string(),
            gdp_impact: gdp_impact.to_string(),
            recovery_investment: baseline_damage * share,
            expected_recovery: expected.to_string(),
        };

        RecoveryModel {
            country: country.to_string(),
            baseline_damage,
            recovery_pathway: vec![
                stage("year_1", "-5% to -8%", 0.15, "20-25%"),
                stage("year_2", "-2% to -4%", 0.25, "50-60%"),
                stage("year_3_5", "0% to +2%", 0.40, "85-95%"),
                stage(
                    "year_6_10",
                    "+2% to +5%",
                    0.30,
                    "100%+ (with resilience dividend)",
                ),
            ],
            total_investment_needed: baseline_damage * 1.10,
            roi_estimate: "Every $1 invested yields $4-6 in prevented future damages".to_string(),
        }
    }

    /// Best, expected and worst case outcomes of funding a scenario.
    pub fn simulate_intervention_outcomes(
        &self,
        scenario: &RecoveryScenario,
    ) -> InterventionSimulation {
        let cost = scenario.estimated_cost;
        let case = |reduction: &str, growth: &str, cost_per_job: f64, roi: f64| OutcomeCase {
            damage_reduction: reduction.to_string(),
            economic_growth: growth.to_string(),
            jobs_created: jobs_for(cost, cost_per_job),
            roi,
        };

        InterventionSimulation {
            scenario: scenario.scenario_name.clone(),
            investment: cost,
            outcomes: InterventionOutcomes {
                best_case: case("60-70%", "+3% to +5%", 100_000.0, 6.0),
                expected_case: case("40-50%", "+2% to +3%", 150_000.0, 4.0),
                worst_case: case("20-30%", "0% to +1%", 250_000.0, 2.0),
            },
            risk_factors: strings(&[
                "Political stability and policy continuity",
                "International cooperation and funding",
                "Technology adoption rates",
                "Public acceptance and behavioral change",
            ]),
        }
    }
}

fn jobs_for(cost: f64, cost_per_job: f64) -> u64 {
    if cost.is_finite() && cost > 0.0 {
        (cost / cost_per_job).floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Correlations, RiskLevel};

    fn risk(total: f64) -> RiskAnalysis {
        RiskAnalysis {
            total_damages: total,
            average_damages: 0.0,
            max_damage: 0.0,
            data_points: 0,
            countries_analyzed: 0,
            risk_level: RiskLevel::Medium,
            correlations: Correlations::default(),
            high_risk_countries: Vec::new(),
        }
    }

    #[test]
    fn test_generate_recovery_scenarios() {
        let scenarios = RecoveryArchitectAgent::new().generate_recovery_scenarios(&risk(7_500_000.0));

        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].scenario_name, "Immediate Emergency Response");
        assert_eq!(scenarios[0].estimated_cost, 1_125_000.0);
        assert_eq!(scenarios[1].estimated_cost, 2_625_000.0);
        assert_eq!(scenarios[2].estimated_cost, 3_750_000.0);
        assert_eq!(scenarios[2].key_actions.len(), 5);

        let total: f64 = scenarios.iter().map(|s| s.estimated_cost).sum();
        assert!((total - 7_500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_model_economic_recovery() {
        let model = RecoveryArchitectAgent::new().model_economic_recovery("India", 1_000_000.0);

        assert_eq!(model.country, "India");
        assert_eq!(model.recovery_pathway.len(), 4);
        assert_eq!(model.recovery_pathway[0].period, "year_1");
        assert_eq!(model.recovery_pathway[0].recovery_investment, 150_000.0);
        assert_eq!(model.recovery_pathway[3].expected_recovery, "100%+ (with resilience dividend)");
        assert!((model.total_investment_needed - 1_100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_simulate_intervention_outcomes() {
        let agent = RecoveryArchitectAgent::new();
        let scenarios = agent.generate_recovery_scenarios(&risk(7_500_000.0));
        let simulation = agent.simulate_intervention_outcomes(&scenarios[0]);

        assert_eq!(simulation.scenario, "Immediate Emergency Response");
        assert_eq!(simulation.investment, 1_125_000.0);
        assert_eq!(simulation.outcomes.best_case.jobs_created, 11);
        assert_eq!(simulation.outcomes.expected_case.jobs_created, 7);
        assert_eq!(simulation.outcomes.worst_case.jobs_created, 4);
        assert_eq!(simulation.outcomes.expected_case.roi, 4.0);
        assert_eq!(simulation.risk_factors.len(), 4);
    }

    #[test]
    fn test_zero_damages_create_no_jobs() {
        let agent = RecoveryArchitectAgent::new();
        let scenarios = agent.generate_recovery_scenarios(&risk(0.0));
        let simulation = agent.simulate_intervention_outcomes(&scenarios[2]);
        assert_eq!(simulation.outcomes.best_case.jobs_created, 0);
    }
}
