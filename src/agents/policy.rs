//! Policy specialist.
//!
//! Produces the detailed policy catalog, ranks it by urgency, and plans
//! how each policy would be rolled out.

use super::strings;
use crate::models::{PolicyRecommendation, RiskLevel};
use crate::report::format_currency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Qualitative ratings of how realistic a policy is to implement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityRatings {
    pub political_feasibility: String,
    pub technical_feasibility: String,
    pub financial_feasibility: String,
    pub social_acceptance: String,
    pub implementation_complexity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityAssessment {
    pub policy_id: String,
    pub policy_title: String,
    /// Overall score, 0-100
    pub feasibility_score: f64,
    pub assessment: FeasibilityRatings,
    pub barriers: Vec<String>,
    pub enablers: Vec<String>,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: u8,
    pub name: String,
    pub duration: String,
    pub activities: Vec<String>,
    pub deliverables: Vec<String>,
    /// Percent of the policy budget spent in this phase
    pub budget_share: u8,
    pub budget_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub month: u32,
    pub milestone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationRoadmap {
    pub policy_id: String,
    pub policy_title: String,
    pub phases: Vec<RoadmapPhase>,
    pub key_milestones: Vec<Milestone>,
    pub success_metrics: Vec<String>,
}

/// Policy specialist agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyAgent;

impl PolicyAgent {
    pub fn new() -> Self {
        Self
    }

    /// The four-policy catalog, budgeted against total damages.
    pub fn generate_policy_recommendations(
        &self,
        risk_level: RiskLevel,
        total_damages: f64,
    ) -> Vec<PolicyRecommendation> {
        let emergency_priority = if risk_level >= RiskLevel::High {
            RiskLevel::Critical
        } else {
            RiskLevel::High
        };
        let finance_budget = total_damages * 0.20;

        vec![
            PolicyRecommendation {
                policy_id: "POL-001".to_string(),
                title: "Climate Emergency Response Framework".to_string(),
                category: Some("Emergency Management".to_string()),
                priority: emergency_priority,
                description:
                    "Establish comprehensive emergency response protocols for climate disasters"
                        .to_string(),
                estimated_budget: total_damages * 0.15,
                timeframe: Some("0-6 months".to_string()),
                implementation_steps: strings(&[
                    "Create national climate emergency coordination center",
                    "Deploy early warning systems",
                    "Establish emergency relief funds",
                    "Train first responders in climate disaster management",
                ]),
                expected_outcomes: strings(&[
                    "Reduce emergency response time by 50%",
                    "Save lives and minimize immediate damages",
                    "Coordinate multi-agency responses effectively",
                ]),
                rank: None,
                urgency_score: None,
            },
            PolicyRecommendation {
                policy_id: "POL-002".to_string(),
                title: "Climate-Resilient Infrastructure Development".to_string(),
                category: Some("Infrastructure".to_string()),
                priority: RiskLevel::High,
                description: "Modernize infrastructure to withstand climate impacts".to_string(),
                estimated_budget: total_damages * 0.35,
                timeframe: Some("6-36 months".to_string()),
                implementation_steps: strings(&[
                    "Conduct infrastructure vulnerability assessments",
                    "Upgrade critical infrastructure (power, water, transport)",
                    "Implement green infrastructure solutions",
                    "Establish building codes for climate resilience",
                ]),
                expected_outcomes: strings(&[
                    "Reduce infrastructure damage by 40%",
                    "Improve service continuity during extreme events",
                    "Create construction jobs",
                ]),
                rank: None,
                urgency_score: None,
            },
            PolicyRecommendation {
                policy_id: "POL-003".to_string(),
                title: "National Climate Finance Mechanism".to_string(),
                category: Some("Finance".to_string()),
                priority: RiskLevel::High,
                description: "Create dedicated funding mechanism for climate adaptation"
                    .to_string(),
                estimated_budget: finance_budget,
                timeframe: Some("3-12 months".to_string()),
                implementation_steps: strings(&[
                    "Establish climate adaptation fund",
                    "Create green bonds program",
                    "Implement carbon pricing mechanism",
                    "Develop insurance schemes for climate risks",
                ]),
                expected_outcomes: vec![
                    format!("Mobilize {} for climate action", format_currency(finance_budget)),
                    "Incentivize private sector investment".to_string(),
                    "Provide financial protection for vulnerable populations".to_string(),
                ],
                rank: None,
                urgency_score: None,
            },
            PolicyRecommendation {
                policy_id: "POL-004".to_string(),
                title: "Accelerated Renewable Energy Transition".to_string(),
                category: Some("Energy".to_string()),
                priority: RiskLevel::Medium,
                description: "Transition to 100% renewable energy by 2040".to_string(),
                estimated_budget: total_damages * 0.30,
                timeframe: Some("1-10 years".to_string()),
                implementation_steps: strings(&[
                    "Phase out fossil fuel subsidies",
                    "Invest in solar, wind, and hydro infrastructure",
                    "Modernize power grid for distributed generation",
                    "Provide incentives for renewable energy adoption",
                ]),
                expected_outcomes: strings(&[
                    "Reduce carbon emissions by 70% by 2035",
                    "Create 500,000 green energy jobs",
                    "Improve energy security and independence",
                ]),
                rank: None,
                urgency_score: None,
            },
        ]
    }

    /// Order policies by priority (most urgent first) and assign ranks.
    ///
    /// Policies of equal priority keep their input order.
    pub fn prioritize_interventions(
        &self,
        mut policies: Vec<PolicyRecommendation>,
    ) -> Vec<PolicyRecommendation> {
        policies.sort_by_key(|p| std::cmp::Reverse(p.priority.weight()));

        for (idx, policy) in policies.iter_mut().enumerate() {
            policy.rank = Some(idx + 1);
            policy.urgency_score = Some(policy.priority.weight() * 25);
        }

        policies
    }

    /// Look up a catalog policy by id (case-insensitive).
    pub fn find_policy(
        &self,
        policy_id: &str,
        risk_level: RiskLevel,
        total_damages: f64,
    ) -> Option<PolicyRecommendation> {
        self.generate_policy_recommendations(risk_level, total_damages)
            .into_iter()
            .find(|p| p.policy_id.eq_ignore_ascii_case(policy_id.trim()))
    }

    pub fn assess_policy_feasibility(&self, policy: &PolicyRecommendation) -> FeasibilityAssessment {
        FeasibilityAssessment {
            policy_id: policy.policy_id.clone(),
            policy_title: policy.title.clone(),
            feasibility_score: 72.0,
            assessment: FeasibilityRatings {
                political_feasibility: "Medium".to_string(),
                technical_feasibility: "High".to_string(),
                financial_feasibility: "Medium".to_string(),
                social_acceptance: "High".to_string(),
                implementation_complexity: "Medium".to_string(),
            },
            barriers: strings(&[
                "Political resistance from fossil fuel interests",
                "Initial high capital costs",
                "Need for technical capacity building",
            ]),
            enablers: strings(&[
                "Growing public awareness of climate risks",
                "Declining renewable energy costs",
                "International climate commitments",
            ]),
            risk_factors: strings(&[
                "Budget constraints",
                "Coordination challenges across agencies",
                "Potential delays in procurement",
            ]),
        }
    }

    /// Four-phase rollout plan with milestones and success metrics.
    pub fn create_implementation_roadmap(
        &self,
        policy: &PolicyRecommendation,
    ) -> ImplementationRoadmap {
        let budget = policy.estimated_budget;
        let phase = |number: u8,
                     name: &str,
                     duration: &str,
                     activities: &[&str],
                     deliverables: &[&str],
                     share: u8| RoadmapPhase {
            phase: number,
            name: name.to_string(),
            duration: duration.to_string(),
            activities: strings(activities),
            deliverables: strings(deliverables),
            budget_share: share,
            budget_amount: budget * f64::from(share) / 100.0,
        };

        let milestones: BTreeMap<u32, &str> = BTreeMap::from([
            (3, "Policy framework approved"),
            (9, "Pilot completed successfully"),
            (12, "50% national coverage achieved"),
            (24, "100% national coverage achieved"),
        ]);

        ImplementationRoadmap {
            policy_id: policy.policy_id.clone(),
            policy_title: policy.title.clone(),
            phases: vec![
                phase(
                    1,
                    "Planning and Design",
                    "Months 1-3",
                    &[
                        "Conduct stakeholder consultations",
                        "Develop detailed policy framework",
                        "Secure budget approval",
                        "Establish implementation team",
                    ],
                    &[
                        "Policy framework document",
                        "Budget allocation",
                        "Implementation team roster",
                    ],
                    10,
                ),
                phase(
                    2,
                    "Pilot Implementation",
                    "Months 4-9",
                    &[
                        "Launch pilot programs in selected regions",
                        "Monitor and evaluate pilot results",
                        "Gather stakeholder feedback",
                        "Refine implementation approach",
                    ],
                    &[
                        "Pilot program reports",
                        "Lessons learned document",
                        "Revised implementation plan",
                    ],
                    20,
                ),
                phase(
                    3,
                    "Full-Scale Rollout",
                    "Months 10-24",
                    &[
                        "Scale up to national level",
                        "Provide training and capacity building",
                        "Establish monitoring systems",
                        "Coordinate with local governments",
                    ],
                    &[
                        "National implementation",
                        "Training materials",
                        "M&E framework",
                    ],
                    50,
                ),
                phase(
                    4,
                    "Monitoring and Optimization",
                    "Months 25+",
                    &[
                        "Continuous performance monitoring",
                        "Impact evaluation",
                        "Policy adjustments based on data",
                        "Knowledge sharing and documentation",
                    ],
                    &[
                        "Annual impact reports",
                        "Policy optimization recommendations",
                        "Best practices documentation",
                    ],
                    20,
                ),
            ],
            key_milestones: milestones
                .into_iter()
                .map(|(month, milestone)| Milestone {
                    month,
                    milestone: milestone.to_string(),
                })
                .collect(),
            success_metrics: strings(&[
                "Number of beneficiaries reached",
                "Reduction in climate damages",
                "Stakeholder satisfaction score",
                "Budget utilization rate",
            ]),
        }
    }
}
