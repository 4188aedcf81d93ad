//! Risk Analyst: first stage of the council.
//!
//! Turns raw damage records into totals, a dataset-wide risk level,
//! indicator correlations and a ranking of the most affected countries.

use crate::analysis::{self, stats};
use crate::config::AnalysisConfig;
use crate::models::{ClimateRecord, Correlations, CountryRisk, RiskAnalysis, RiskLevel};
use tracing::debug;

/// Damage thresholds separating the risk levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 1_000_000_000.0,
            critical: 5_000_000_000.0,
        }
    }
}

/// Risk Analyst agent.
#[derive(Debug, Clone)]
pub struct RiskAnalystAgent {
    thresholds: RiskThresholds,
    top_countries: usize,
}

impl Default for RiskAnalystAgent {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            top_countries: 10,
        }
    }
}

impl From<&AnalysisConfig> for RiskAnalystAgent {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            thresholds: RiskThresholds {
                high: config.high_risk_threshold,
                critical: config.critical_risk_threshold,
            },
            top_countries: config.top_countries,
        }
    }
}

impl RiskAnalystAgent {
    /// Summarize damages across the whole dataset.
    ///
    /// Correlations and the country ranking are left empty; see
    /// [`Self::calculate_co2_correlation`] and
    /// [`Self::identify_high_risk_countries`].
    pub fn analyze_climate_data(&self, records: &[ClimateRecord]) -> RiskAnalysis {
        let damages = analysis::damage_values(records);
        let total_damages = stats::sum(&damages);
        let average_damages = stats::mean(&damages).unwrap_or(0.0);
        let max_damage = if damages.is_empty() {
            0.0
        } else {
            damages.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        };

        debug!(
            "Risk analysis over {} rows: total={}, avg={}",
            records.len(),
            total_damages,
            average_damages
        );

        RiskAnalysis {
            total_damages,
            average_damages,
            max_damage,
            data_points: records.len(),
            countries_analyzed: analysis::unique_countries(records),
            risk_level: self.calculate_risk_level(total_damages),
            correlations: Correlations::default(),
            high_risk_countries: Vec::new(),
        }
    }

    /// Map a damage total onto a risk level.
    pub fn calculate_risk_level(&self, total_damages: f64) -> RiskLevel {
        if total_damages <= 0.0 {
            RiskLevel::Low
        } else if total_damages < self.thresholds.high {
            RiskLevel::Medium
        } else if total_damages < self.thresholds.critical {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Pearson correlations of CO2 emissions and GDP against damages.
    pub fn calculate_co2_correlation(&self, records: &[ClimateRecord]) -> Correlations {
        let (co2, co2_damage) =
            analysis::paired_values(records, |r| r.co2_emissions, |r| r.damage_cost);
        let (gdp, gdp_damage) = analysis::paired_values(records, |r| r.gdp, |r| r.damage_cost);

        Correlations {
            co2_damage_correlation: stats::pearson(&co2, &co2_damage),
            gdp_damage_correlation: stats::pearson(&gdp, &gdp_damage),
        }
    }

    /// Countries ranked by total damage, most affected first.
    pub fn identify_high_risk_countries(&self, records: &[ClimateRecord]) -> Vec<CountryRisk> {
        let mut countries: Vec<CountryRisk> = analysis::damages_by_country(records)
            .into_iter()
            .map(|(country, totals)| CountryRisk {
                country,
                total_damage: totals.total,
                avg_damage: totals.average(),
                incident_count: totals.count,
            })
            .collect();

        // BTreeMap order already breaks ties by name; the sort is stable.
        countries.sort_by(|a, b| b.total_damage.total_cmp(&a.total_damage));
        countries.truncate(self.top_countries);
        countries
    }

    /// Damage totals and risk level for a single country (case-insensitive).
    pub fn assess_country(
        &self,
        records: &[ClimateRecord],
        country: &str,
    ) -> Option<(CountryRisk, RiskLevel)> {
        let (name, totals) = analysis::damages_by_country(records)
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(country.trim()))?;

        let level = self.calculate_risk_level(totals.total);
        Some((
            CountryRisk {
                country: name,
                total_damage: totals.total,
                avg_damage: totals.average(),
                incident_count: totals.count,
            },
            level,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_csv;

    const FIXTURE: &str = include_str!("../../fixtures/climate_damages.csv");

    fn fixture() -> Vec<ClimateRecord> {
        parse_csv("fixture", FIXTURE.as_bytes()).unwrap().records
    }

    #[test]
    fn test_analyze_climate_data() {
        let agent = RiskAnalystAgent::default();
        let analysis = agent.analyze_climate_data(&fixture());

        assert_eq!(analysis.total_damages, 7_500_000.0);
        assert_eq!(analysis.average_damages, 937_500.0);
        assert_eq!(analysis.max_damage, 2_000_000.0);
        assert_eq!(analysis.data_points, 8);
        assert_eq!(analysis.countries_analyzed, 8);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_analyze_empty_records() {
        let agent = RiskAnalystAgent::default();
        let analysis = agent.analyze_climate_data(&[]);

        assert_eq!(analysis.total_damages, 0.0);
        assert_eq!(analysis.average_damages, 0.0);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_max_damage_with_negative_values() {
        let records: Vec<ClimateRecord> = [-50.0, -20.0]
            .into_iter()
            .map(|damage| ClimateRecord {
                damage_cost: Some(damage),
                ..Default::default()
            })
            .collect();

        let analysis = RiskAnalystAgent::default().analyze_climate_data(&records);
        assert_eq!(analysis.max_damage, -20.0);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_calculate_risk_level_boundaries() {
        let agent = RiskAnalystAgent::default();
        assert_eq!(agent.calculate_risk_level(0.0), RiskLevel::Low);
        assert_eq!(agent.calculate_risk_level(999_999_999.0), RiskLevel::Medium);
        assert_eq!(agent.calculate_risk_level(1_000_000_000.0), RiskLevel::High);
        assert_eq!(agent.calculate_risk_level(4_999_999_999.0), RiskLevel::High);
        assert_eq!(agent.calculate_risk_level(5_000_000_000.0), RiskLevel::Critical);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = AnalysisConfig {
            high_risk_threshold: 1_000_000.0,
            critical_risk_threshold: 5_000_000.0,
            ..Default::default()
        };
        let agent = RiskAnalystAgent::from(&config);
        assert_eq!(agent.analyze_climate_data(&fixture()).risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_correlations() {
        let agent = RiskAnalystAgent::default();
        let correlations = agent.calculate_co2_correlation(&fixture());

        let co2 = correlations.co2_damage_correlation.unwrap();
        let gdp = correlations.gdp_damage_correlation.unwrap();
        assert!((co2 - 0.8994).abs() < 1e-3);
        assert!((gdp - 0.4880).abs() < 1e-3);
    }

    #[test]
    fn test_correlations_absent_without_indicators() {
        let agent = RiskAnalystAgent::default();
        let records = vec![ClimateRecord {
            damage_cost: Some(10.0),
            ..Default::default()
        }];
        assert_eq!(agent.calculate_co2_correlation(&records), Correlations::default());
    }

    #[test]
    fn test_identify_high_risk_countries() {
        let config = AnalysisConfig {
            top_countries: 3,
            ..Default::default()
        };
        let agent = RiskAnalystAgent::from(&config);
        let countries = agent.identify_high_risk_countries(&fixture());

        let names: Vec<&str> = countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["China", "India", "USA"]);
        assert_eq!(countries[0].total_damage, 2_000_000.0);
        assert_eq!(countries[0].incident_count, 1);
    }

    #[test]
    fn test_assess_country() {
        let agent = RiskAnalystAgent::default();
        let (risk, level) = agent.assess_country(&fixture(), "india").unwrap();

        assert_eq!(risk.country, "India");
        assert_eq!(risk.total_damage, 1_500_000.0);
        assert_eq!(level, RiskLevel::Medium);
        assert!(agent.assess_country(&fixture(), "Atlantis").is_none());
    }
}
