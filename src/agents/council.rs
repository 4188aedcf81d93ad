//! Council of Agents orchestration.
//!
//! Runs Risk Analyst -> Recovery Architect -> Strategy Agent over a
//! dataset, attaches the specialists' findings and, when an LLM client is
//! configured, asks each stage agent for a short commentary.

use super::climate::ClimateAgent;
use super::economic::EconomicAgent;
use super::llm::LlmClient;
use super::policy::PolicyAgent;
use super::prompts::{
    COMMENTARY_INSTRUCTION, RECOVERY_ARCHITECT_SYSTEM_MESSAGE, RISK_ANALYST_SYSTEM_MESSAGE,
    STRATEGY_AGENT_SYSTEM_MESSAGE,
};
use super::recovery_architect::RecoveryArchitectAgent;
use super::risk_analyst::RiskAnalystAgent;
use super::strategy::StrategyAgent;
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::models::{
    AgentNarrative, Correlations, CouncilReport, CouncilSummary, PolicyRecommendation,
    RecoveryScenario, ReportMetadata, RiskAnalysis, RiskLevel, SpecialistFindings, Synthesis,
};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const RISK_ANALYST: &str = "Risk Analyst";
pub const RECOVERY_ARCHITECT: &str = "Recovery Architect";
pub const STRATEGY_AGENT: &str = "Strategy Agent";

/// Recovery and strategy output for a damage total without a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyPlan {
    pub synthesis: Synthesis,
    pub scenarios: Vec<RecoveryScenario>,
    pub policies: Vec<PolicyRecommendation>,
}

/// The council: three pipeline stages plus three specialists.
#[derive(Debug, Clone)]
pub struct AgentCouncil {
    config: AnalysisConfig,
    risk_analyst: RiskAnalystAgent,
    recovery_architect: RecoveryArchitectAgent,
    strategy: StrategyAgent,
    climate: ClimateAgent,
    economic: EconomicAgent,
    policy: PolicyAgent,
    llm: Option<LlmClient>,
    show_progress: bool,
}

impl AgentCouncil {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            risk_analyst: RiskAnalystAgent::from(&config),
            recovery_architect: RecoveryArchitectAgent::new(),
            strategy: StrategyAgent::new(),
            climate: ClimateAgent::new(),
            economic: EconomicAgent::new(),
            policy: PolicyAgent::new(),
            llm: None,
            show_progress: false,
            config,
        }
    }

    /// Attach an LLM client for stage commentary.
    pub fn with_llm(mut self, llm: LlmClient) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Show a terminal spinner while the pipeline runs.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn risk_analyst(&self) -> &RiskAnalystAgent {
        &self.risk_analyst
    }

    pub fn recovery_architect(&self) -> &RecoveryArchitectAgent {
        &self.recovery_architect
    }

    pub fn economic(&self) -> &EconomicAgent {
        &self.economic
    }

    pub fn policy(&self) -> &PolicyAgent {
        &self.policy
    }

    pub fn llm(&self) -> Option<&LlmClient> {
        self.llm.as_ref()
    }

    /// Run the deterministic pipeline.
    pub fn analyze_and_recommend(&self, dataset: &Dataset) -> CouncilReport {
        let start = Instant::now();
        let records = &dataset.records;
        let progress = self.spinner();

        // Stage 1
        stage(&progress, "Step 1: Running risk analysis...");
        let mut risk_analysis = self.risk_analyst.analyze_climate_data(records);
        risk_analysis.correlations = self.risk_analyst.calculate_co2_correlation(records);
        risk_analysis.high_risk_countries = self.risk_analyst.identify_high_risk_countries(records);
        info!(
            "Risk analysis complete - risk level: {}",
            risk_analysis.risk_level
        );

        // Stage 2
        stage(&progress, "Step 2: Generating recovery scenarios...");
        let recovery_scenarios = self
            .recovery_architect
            .generate_recovery_scenarios(&risk_analysis);
        info!("Generated {} recovery scenarios", recovery_scenarios.len());

        // Stage 3
        stage(&progress, "Step 3: Creating policy recommendations...");
        let synthesis = self
            .strategy
            .synthesize_insights(&risk_analysis, &recovery_scenarios);
        let policy_recommendations = self.strategy.create_policy_recommendations(&synthesis);
        info!(
            "Created {} policy recommendations",
            policy_recommendations.len()
        );

        let specialists = if self.config.include_specialists {
            stage(&progress, "Consulting climate, economic and policy specialists...");
            Some(self.consult_specialists(dataset, &risk_analysis, &recovery_scenarios))
        } else {
            None
        };

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let summary = CouncilSummary {
            total_damages: risk_analysis.total_damages,
            risk_level: risk_analysis.risk_level,
            total_investment_required: synthesis.total_investment_required,
            number_of_scenarios: recovery_scenarios.len(),
            number_of_policies: policy_recommendations.len(),
        };

        info!("Council analysis complete");

        CouncilReport {
            metadata: ReportMetadata {
                dataset_source: dataset.source.clone(),
                analysis_date: Utc::now(),
                model_used: None,
                records_analyzed: records.len(),
                duration_seconds: start.elapsed().as_secs_f64(),
            },
            risk_analysis,
            recovery_scenarios,
            synthesis,
            policy_recommendations,
            summary,
            specialists,
            narratives: Vec::new(),
        }
    }

    /// Run the pipeline, then collect LLM commentary if a client is attached.
    ///
    /// Commentary failures are logged and skipped; they never fail the run.
    pub async fn run(&self, dataset: &Dataset) -> CouncilReport {
        let start = Instant::now();
        let mut report = self.analyze_and_recommend(dataset);

        if let Some(llm) = &self.llm {
            info!("Requesting commentary from {}", llm.model_name());
            report.narratives = self.collect_narratives(llm, &report).await;
            report.metadata.model_used = Some(llm.model_name().to_string());
            report.metadata.duration_seconds = start.elapsed().as_secs_f64();
        }

        report
    }

    /// Recovery scenarios, synthesis and policies for a bare damage total.
    ///
    /// Without an explicit level the Risk Analyst thresholds decide it.
    pub fn plan_for_damages(&self, total_damages: f64, risk_level: Option<RiskLevel>) -> StrategyPlan {
        let risk = RiskAnalysis {
            total_damages,
            average_damages: total_damages,
            max_damage: total_damages,
            data_points: 0,
            countries_analyzed: 0,
            risk_level: risk_level
                .unwrap_or_else(|| self.risk_analyst.calculate_risk_level(total_damages)),
            correlations: Correlations::default(),
            high_risk_countries: Vec::new(),
        };

        let scenarios = self.recovery_architect.generate_recovery_scenarios(&risk);
        let synthesis = self.strategy.synthesize_insights(&risk, &scenarios);
        let policies = self.strategy.create_policy_recommendations(&synthesis);

        StrategyPlan {
            synthesis,
            scenarios,
            policies,
        }
    }

    fn consult_specialists(
        &self,
        dataset: &Dataset,
        risk: &RiskAnalysis,
        scenarios: &[RecoveryScenario],
    ) -> SpecialistFindings {
        let records = &dataset.records;
        debug!("Consulting specialists over {} records", records.len());

        let policies = self
            .policy
            .generate_policy_recommendations(risk.risk_level, risk.total_damages);

        SpecialistFindings {
            climate_trends: self.climate.analyze_climate_trends(records),
            extreme_events: self
                .climate
                .detect_extreme_events(records, self.config.extreme_event_percentile),
            regional_vulnerability: self.climate.assess_regional_vulnerability(records),
            projection: self
                .climate
                .predict_climate_risk(records, self.config.projection_years),
            economic_impact: self.economic.calculate_economic_impact(records),
            investment_needs: self
                .economic
                .assess_investment_needs(records, self.config.recovery_multiplier),
            sector_vulnerability: self.economic.assess_sector_vulnerability(records),
            intervention_simulations: scenarios
                .iter()
                .map(|s| self.recovery_architect.simulate_intervention_outcomes(s))
                .collect(),
            prioritized_policies: self.policy.prioritize_interventions(policies),
        }
    }

    async fn collect_narratives(
        &self,
        llm: &LlmClient,
        report: &CouncilReport,
    ) -> Vec<AgentNarrative> {
        let stages = [
            (
                RISK_ANALYST,
                RISK_ANALYST_SYSTEM_MESSAGE,
                serde_json::to_string_pretty(&report.risk_analysis),
            ),
            (
                RECOVERY_ARCHITECT,
                RECOVERY_ARCHITECT_SYSTEM_MESSAGE,
                serde_json::to_string_pretty(&report.recovery_scenarios),
            ),
            (
                STRATEGY_AGENT,
                STRATEGY_AGENT_SYSTEM_MESSAGE,
                serde_json::to_string_pretty(&(&report.synthesis, &report.policy_recommendations)),
            ),
        ];

        let requests = stages.into_iter().filter_map(|(agent, system, payload)| {
            let payload = match payload {
                Ok(json) => json,
                Err(e) => {
                    warn!("Could not serialize {} output: {}", agent, e);
                    return None;
                }
            };
            let prompt = format!("{}\n\n{}", COMMENTARY_INSTRUCTION, payload);
            Some(async move { (agent, llm.complete(system, &prompt).await) })
        });

        futures::future::join_all(requests)
            .await
            .into_iter()
            .filter_map(|(agent, result)| match result {
                Ok(content) => Some(AgentNarrative {
                    agent: agent.to_string(),
                    content: content.trim().to_string(),
                }),
                Err(e) => {
                    warn!("{} commentary unavailable: {}", agent, e);
                    None
                }
            })
            .collect()
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

fn stage(progress: &Option<ProgressBar>, message: &'static str) {
    debug!("{}", message);
    if let Some(pb) = progress {
        pb.set_message(message);
    }
}
