//! Economic specialist.
//!
//! Prices the damage: share of GDP lost, investment needed for recovery,
//! and which event types (sectors) carry most of the cost.

use crate::analysis::{self, stats};
use crate::models::ClimateRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicImpact {
    pub total_economic_loss: f64,
    /// Loss as a share of the summed GDP column; 0 without GDP data
    pub gdp_impact_percentage: f64,
    pub affected_countries: usize,
    /// Damage per event type
    pub sector_impacts: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiProjection {
    pub expected_damage_reduction: String,
    pub payback_period_years: String,
    pub benefit_cost_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentNeeds {
    pub immediate_relief: f64,
    pub short_term_recovery: f64,
    pub long_term_resilience: f64,
    pub total_investment_required: f64,
    pub roi_projection: RoiProjection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPhase {
    pub phase: String,
    pub duration: String,
    pub gdp_impact: String,
    pub employment_impact: String,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTimeline {
    pub country: String,
    pub baseline_damage: f64,
    pub recovery_phases: Vec<RecoveryPhase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Proceed,
    Reconsider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBenefit {
    pub investment: f64,
    pub expected_benefits: f64,
    pub benefit_cost_ratio: f64,
    pub net_present_value: f64,
    pub recommendation: Recommendation,
}

/// Damage attributed to one event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorShare {
    pub sector: String,
    pub total_damage: f64,
    pub percentage_of_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorVulnerability {
    pub high_risk_sectors: Vec<SectorShare>,
    pub medium_risk_sectors: Vec<SectorShare>,
    pub low_risk_sectors: Vec<SectorShare>,
}

/// Economic specialist agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicAgent;

impl EconomicAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_economic_impact(&self, records: &[ClimateRecord]) -> EconomicImpact {
        let total_economic_loss = stats::sum(&analysis::damage_values(records));
        let gdp: Vec<f64> = records.iter().filter_map(|r| r.gdp).collect();
        let total_gdp = stats::sum(&gdp);

        let gdp_impact_percentage = if total_gdp > 0.0 {
            total_economic_loss / total_gdp * 100.0
        } else {
            0.0
        };

        EconomicImpact {
            total_economic_loss,
            gdp_impact_percentage,
            affected_countries: analysis::unique_countries(records),
            sector_impacts: analysis::damages_by_event_type(records),
        }
    }

    /// Investment split across relief, recovery and resilience.
    pub fn assess_investment_needs(
        &self,
        records: &[ClimateRecord],
        recovery_multiplier: f64,
    ) -> InvestmentNeeds {
        let total = stats::sum(&analysis::damage_values(records));

        InvestmentNeeds {
            immediate_relief: total * 0.15,
            short_term_recovery: total * 0.35,
            long_term_resilience: total * 0.50,
            total_investment_required: total * recovery_multiplier,
            roi_projection: RoiProjection {
                expected_damage_reduction: "40-60%".to_string(),
                payback_period_years: "5-10".to_string(),
                benefit_cost_ratio: 3.0,
            },
        }
    }

    pub fn model_recovery_timeline(&self, baseline_damage: f64, country: &str) -> RecoveryTimeline {
        let phase = |name: &str, duration: &str, gdp: &str, employment: &str, share: f64| {
            RecoveryPhase {
                phase: name.to_string(),
                duration: duration.to_string(),
                gdp_impact: gdp.to_string(),
                employment_impact: employment.to_string(),
                estimated_cost: baseline_damage * share,
            }
        };

        RecoveryTimeline {
            country: country.to_string(),
            baseline_damage,
            recovery_phases: vec![
                phase("Emergency Response", "0-6 months", "-5% to -8%", "High unemployment", 0.15),
                phase("Reconstruction", "6-24 months", "-2% to -4%", "Gradual recovery", 0.35),
                phase("Long-term Recovery", "2-5 years", "0% to +2%", "Full recovery", 0.50),
            ],
        }
    }

    pub fn calculate_cost_benefit_ratio(
        &self,
        investment: f64,
        expected_damage_reduction: f64,
    ) -> CostBenefit {
        let benefit_cost_ratio = if investment > 0.0 {
            expected_damage_reduction / investment
        } else {
            0.0
        };

        CostBenefit {
            investment,
            expected_benefits: expected_damage_reduction,
            benefit_cost_ratio,
            net_present_value: expected_damage_reduction - investment,
            recommendation: if benefit_cost_ratio > 1.0 {
                Recommendation::Proceed
            } else {
                Recommendation::Reconsider
            },
        }
    }

    /// Bucket event types by their share of total damage.
    pub fn assess_sector_vulnerability(&self, records: &[ClimateRecord]) -> SectorVulnerability {
        let mut sectors: Vec<(String, f64)> =
            analysis::damages_by_event_type(records).into_iter().collect();
        sectors.sort_by(|a, b| b.1.total_cmp(&a.1));
        let total: f64 = sectors.iter().map(|(_, d)| d).sum();

        let mut vulnerability = SectorVulnerability::default();
        for (sector, damage) in sectors {
            let percentage = if total > 0.0 { damage / total * 100.0 } else { 0.0 };
            let share = SectorShare {
                sector,
                total_damage: damage,
                percentage_of_total: percentage,
            };

            if percentage > 30.0 {
                vulnerability.high_risk_sectors.push(share);
            } else if percentage > 15.0 {
                vulnerability.medium_risk_sectors.push(share);
            } else {
                vulnerability.low_risk_sectors.push(share);
            }
        }

        vulnerability
    }
}
