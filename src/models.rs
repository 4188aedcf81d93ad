//! Data models for the climate risk council.
//!
//! This module contains the core data structures shared by the dataset
//! loader, the council agents, the report generator and the HTTP API.

use crate::agents::climate::{ClimateProjection, ClimateTrends, CountryVulnerability, ExtremeEvent};
use crate::agents::economic::{EconomicImpact, InvestmentNeeds, SectorVulnerability};
use crate::agents::recovery_architect::InterventionSimulation;
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk level of a dataset, a country or a policy priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// No recorded damages
    Low,
    /// Damages below the high-risk threshold
    Medium,
    /// Damages below the critical threshold
    High,
    /// Damages at or above the critical threshold
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

impl RiskLevel {
    /// Returns an emoji representation of the risk level.
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }

    /// Numeric weight used when ranking priorities (LOW=1 .. CRITICAL=4).
    pub fn weight(&self) -> u32 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }
}

/// A single row of a climate damage dataset.
///
/// Every field is optional: datasets differ in which indicators they carry,
/// and the agents only use the columns that are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(
        alias = "damage",
        alias = "damages",
        alias = "damage_usd",
        alias = "economic_damage",
        deserialize_with = "measurement",
        skip_serializing_if = "Option::is_none"
    )]
    pub damage_cost: Option<f64>,
    #[serde(
        alias = "co2",
        alias = "emissions",
        alias = "co2_emission",
        deserialize_with = "measurement",
        skip_serializing_if = "Option::is_none"
    )]
    pub co2_emissions: Option<f64>,
    #[serde(
        alias = "gdp_usd",
        deserialize_with = "measurement",
        skip_serializing_if = "Option::is_none"
    )]
    pub gdp: Option<f64>,
    #[serde(
        alias = "event",
        alias = "hazard",
        alias = "disaster_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_type: Option<String>,
    #[serde(deserialize_with = "measurement", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "measurement", skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}

/// Cell values read as a missing measurement.
const MISSING_MARKERS: [&str; 8] = ["na", "n/a", "#n/a", "<na>", "nan", "null", "none", "-"];

/// Deserialize an optional numeric measurement.
///
/// Non-finite numbers and missing-value markers such as `NA` become `None`.
fn measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(MeasurementVisitor)
}

struct MeasurementVisitor;

impl<'de> Visitor<'de> for MeasurementVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a missing-value marker")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.is_finite().then_some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty()
            || MISSING_MARKERS
                .iter()
                .any(|marker| trimmed.eq_ignore_ascii_case(marker))
        {
            return Ok(None);
        }

        match trimmed.parse::<f64>() {
            Ok(value) => self.visit_f64(value),
            Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

impl ClimateRecord {
    /// Canonical column names, in report order.
    pub const COLUMNS: [&'static str; 8] = [
        "country",
        "year",
        "damage_cost",
        "co2_emissions",
        "gdp",
        "event_type",
        "temperature",
        "precipitation",
    ];

    /// Names of the canonical columns this record has a value for.
    pub fn present_columns(&self) -> Vec<&'static str> {
        let present = [
            self.country.is_some(),
            self.year.is_some(),
            self.damage_cost.is_some(),
            self.co2_emissions.is_some(),
            self.gdp.is_some(),
            self.event_type.is_some(),
            self.temperature.is_some(),
            self.precipitation.is_some(),
        ];

        Self::COLUMNS
            .iter()
            .zip(present)
            .filter(|(_, p)| *p)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Damage totals for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRisk {
    pub country: String,
    pub total_damage: f64,
    pub avg_damage: f64,
    pub incident_count: usize,
}

/// Correlations between damages and economic indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Correlations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_damage_correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdp_damage_correlation: Option<f64>,
}

/// Output of the Risk Analyst stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub total_damages: f64,
    pub average_damages: f64,
    pub max_damage: f64,
    pub data_points: usize,
    pub countries_analyzed: usize,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub correlations: Correlations,
    #[serde(default)]
    pub high_risk_countries: Vec<CountryRisk>,
}

/// A recovery pathway produced by the Recovery Architect stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryScenario {
    pub scenario_name: String,
    pub timeframe: String,
    pub focus: String,
    pub estimated_cost: f64,
    pub expected_impact: String,
    pub key_actions: Vec<String>,
}

/// Combined view the Strategy stage builds from risk and recovery output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub priority_level: RiskLevel,
    pub total_investment_required: f64,
}

/// A policy recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRecommendation {
    pub policy_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub priority: RiskLevel,
    pub description: String,
    pub estimated_budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_outcomes: Vec<String>,
    /// Position after prioritization (1 = most urgent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_score: Option<u32>,
}

/// Headline numbers of a council run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilSummary {
    pub total_damages: f64,
    pub risk_level: RiskLevel,
    pub total_investment_required: f64,
    pub number_of_scenarios: usize,
    pub number_of_policies: usize,
}

/// LLM commentary attached to a council stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentNarrative {
    pub agent: String,
    pub content: String,
}

/// Findings from the climate, economic and policy specialists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistFindings {
    pub climate_trends: ClimateTrends,
    pub extreme_events: Vec<ExtremeEvent>,
    pub regional_vulnerability: Vec<CountryVulnerability>,
    pub projection: ClimateProjection,
    pub economic_impact: EconomicImpact,
    pub investment_needs: InvestmentNeeds,
    pub sector_vulnerability: SectorVulnerability,
    pub intervention_simulations: Vec<InterventionSimulation>,
    pub prioritized_policies: Vec<PolicyRecommendation>,
}

/// Metadata about a council report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the dataset came from (path or upload label).
    pub dataset_source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// LLM used for commentary, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    /// Number of dataset rows analyzed.
    pub records_analyzed: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete output of the Council of Agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilReport {
    pub metadata: ReportMetadata,
    pub risk_analysis: RiskAnalysis,
    pub recovery_scenarios: Vec<RecoveryScenario>,
    pub synthesis: Synthesis,
    pub policy_recommendations: Vec<PolicyRecommendation>,
    pub summary: CouncilSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialists: Option<SpecialistFindings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub narratives: Vec<AgentNarrative>,
}
