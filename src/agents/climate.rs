//! Climate specialist.
//!
//! Looks at the physical side of the dataset: temperature and
//! precipitation trends, extreme damage events, and how exposure is
//! spread across countries.

use super::strings;
use crate::analysis::{self, stats};
use crate::models::ClimateRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Direction of a series between its first and last point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    fn between(first: f64, last: f64) -> Self {
        match last.partial_cmp(&first) {
            Some(Ordering::Greater) => TrendDirection::Increasing,
            Some(Ordering::Less) => TrendDirection::Decreasing,
            _ => TrendDirection::Stable,
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureTrend {
    /// Mean of the yearly mean temperatures
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationStats {
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateTrends {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<PrecipitationStats>,
}

/// A row whose damage lies above the extreme-event threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub country: String,
    pub damage_cost: f64,
    pub event_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryVulnerability {
    pub country: String,
    pub total_damage: f64,
    pub avg_damage: f64,
    pub event_count: usize,
    /// Total damage relative to the worst-hit country (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProjection {
    pub projection_period: u32,
    pub risk_trend: TrendDirection,
    pub confidence_level: String,
    pub key_risks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_annual_increase_pct: Option<f64>,
}

const UNKNOWN: &str = "Unknown";

/// Climate specialist agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateAgent;

impl ClimateAgent {
    pub fn new() -> Self {
        Self
    }

    /// Temperature trend over yearly means and overall precipitation spread.
    pub fn analyze_climate_trends(&self, records: &[ClimateRecord]) -> ClimateTrends {
        let yearly: Vec<f64> = analysis::mean_by_year(records, |r| r.temperature)
            .into_values()
            .collect();

        let temperature = match (yearly.first(), yearly.last(), stats::mean(&yearly)) {
            (Some(&first), Some(&last), Some(mean)) => Some(TemperatureTrend {
                mean,
                std: stats::sample_std(&yearly),
                trend: TrendDirection::between(first, last),
            }),
            _ => None,
        };

        let precipitation_values: Vec<f64> = records.iter().filter_map(|r| r.precipitation).collect();
        let precipitation = stats::mean(&precipitation_values).map(|mean| PrecipitationStats {
            mean,
            variability: stats::sample_std(&precipitation_values),
        });

        ClimateTrends {
            temperature,
            precipitation,
        }
    }

    /// Rows whose damage is strictly above the given percentile, in input order.
    pub fn detect_extreme_events(
        &self,
        records: &[ClimateRecord],
        percentile: f64,
    ) -> Vec<ExtremeEvent> {
        let Some(threshold) = stats::quantile(&analysis::damage_values(records), percentile / 100.0)
        else {
            return Vec::new();
        };

        records
            .iter()
            .filter_map(|r| {
                let damage = r.damage_cost?;
                (damage > threshold).then(|| ExtremeEvent {
                    year: r.year,
                    country: r.country.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                    damage_cost: damage,
                    event_type: r.event_type.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                })
            })
            .collect()
    }

    /// Per-country exposure scored against the worst-hit country.
    pub fn assess_regional_vulnerability(
        &self,
        records: &[ClimateRecord],
    ) -> Vec<CountryVulnerability> {
        let by_country = analysis::damages_by_country(records);
        let max_damage = by_country.values().map(|t| t.total).fold(f64::MIN, f64::max);

        let mut countries: Vec<CountryVulnerability> = by_country
            .into_iter()
            .map(|(country, totals)| CountryVulnerability {
                country,
                total_damage: totals.total,
                avg_damage: totals.average(),
                event_count: totals.count,
                vulnerability_score: (max_damage > 0.0).then(|| totals.total / max_damage * 100.0),
            })
            .collect();

        countries.sort_by(|a, b| {
            let a = a.vulnerability_score.unwrap_or(0.0);
            let b = b.vulnerability_score.unwrap_or(0.0);
            b.total_cmp(&a)
        });
        countries
    }

    /// Project the damage trend from the mean year-over-year change.
    pub fn predict_climate_risk(&self, records: &[ClimateRecord], years: u32) -> ClimateProjection {
        let yearly: Vec<f64> = analysis::damages_by_year(records).into_values().collect();
        let avg_annual_increase_pct = stats::mean(&stats::pct_changes(&yearly)).map(|m| m * 100.0);

        let risk_trend = match avg_annual_increase_pct {
            Some(pct) => TrendDirection::between(0.0, pct),
            None => TrendDirection::Increasing,
        };

        ClimateProjection {
            projection_period: years,
            risk_trend,
            confidence_level: "medium".to_string(),
            key_risks: strings(&[
                "Increased frequency of extreme weather events",
                "Rising temperatures",
                "Changes in precipitation patterns",
            ]),
            avg_annual_increase_pct,
        }
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

    fn record(year: i32, country: &str, damage: f64) -> ClimateRecord {
        ClimateRecord {
            year: Some(year),
            country: Some(country.to_string()),
            damage_cost: Some(damage),
            ..Default::default()
        }
    }

    #[test]
    fn test_analyze_climate_trends() {
        let trends = ClimateAgent::new().analyze_climate_trends(&fixture());

        let temperature = trends.temperature.unwrap();
        assert!((temperature.mean - 16.5125).abs() < 1e-9);
        assert!(temperature.std.is_some());
        assert_eq!(temperature.trend, TrendDirection::Decreasing);

        let precipitation = trends.precipitation.unwrap();
        assert!((precipitation.mean - 963.75).abs() < 1e-9);
        assert!(precipitation.variability.unwrap() > 0.0);
    }

    #[test]
    fn test_trends_absent_without_columns() {
        let trends = ClimateAgent::new().analyze_climate_trends(&[record(2020, "Peru", 1.0)]);
        assert_eq!(trends, ClimateTrends::default());
    }

    #[test]
    fn test_stable_temperature_trend() {
        let records: Vec<ClimateRecord> = [2020, 2021]
            .iter()
            .map(|&year| ClimateRecord {
                year: Some(year),
                temperature: Some(20.0),
                ..Default::default()
            })
            .collect();
        let trends = ClimateAgent::new().analyze_climate_trends(&records);
        assert_eq!(trends.temperature.unwrap().trend, TrendDirection::Stable);
    }

    #[test]
    fn test_detect_extreme_events() {
        let events = ClimateAgent::new().detect_extreme_events(&fixture(), 95.0);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].country, "China");
        assert_eq!(events[0].year, Some(2019));
        assert_eq!(events[0].event_type, "Storm");
    }

    #[test]
    fn test_detect_extreme_events_fills_unknown() {
        let records = vec![
            ClimateRecord {
                damage_cost: Some(1.0),
                ..Default::default()
            },
            ClimateRecord {
                damage_cost: Some(100.0),
                ..Default::default()
            },
        ];
        let events = ClimateAgent::new().detect_extreme_events(&records, 50.0);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].country, "Unknown");
        assert_eq!(events[0].event_type, "Unknown");
        assert!(ClimateAgent::new().detect_extreme_events(&[], 95.0).is_empty());
    }

    #[test]
    fn test_assess_regional_vulnerability() {
        let countries = ClimateAgent::new().assess_regional_vulnerability(&fixture());

        assert_eq!(countries.len(), 8);
        assert_eq!(countries[0].country, "China");
        assert_eq!(countries[0].vulnerability_score, Some(100.0));
        assert_eq!(countries[1].country, "India");
        assert_eq!(countries[1].vulnerability_score, Some(75.0));
    }

    #[test]
    fn test_vulnerability_without_positive_damage() {
        let countries =
            ClimateAgent::new().assess_regional_vulnerability(&[record(2020, "Chad", 0.0)]);
        assert_eq!(countries[0].vulnerability_score, None);
    }

    #[test]
    fn test_predict_climate_risk() {
        let projection = ClimateAgent::new().predict_climate_risk(&fixture(), 10);

        assert_eq!(projection.projection_period, 10);
        assert_eq!(projection.risk_trend, TrendDirection::Decreasing);
        assert_eq!(projection.confidence_level, "medium");
        assert_eq!(projection.key_risks.len(), 3);
        let pct = projection.avg_annual_increase_pct.unwrap();
        assert!((pct - -32.527).abs() < 1e-2);
    }

    #[test]
    fn test_predict_single_year_defaults_to_increasing() {
        let projection =
            ClimateAgent::new().predict_climate_risk(&[record(2020, "Fiji", 5.0)], 5);
        assert_eq!(projection.avg_annual_increase_pct, None);
        assert_eq!(projection.risk_trend, TrendDirection::Increasing);
    }

    #[test]
    fn test_predict_rising_damages() {
        let records = vec![record(2020, "Fiji", 100.0), record(2021, "Fiji", 150.0)];
        let projection = ClimateAgent::new().predict_climate_risk(&records, 5);
        assert_eq!(projection.risk_trend, TrendDirection::Increasing);
        assert!((projection.avg_annual_increase_pct.unwrap() - 50.0).abs() < 1e-9);
    }
}
