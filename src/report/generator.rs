//! Report generation.
//!
//! This module renders a [`CouncilReport`] as Markdown, as JSON, or as the
//! boxed plain-text executive summary printed by the CLI.

use crate::config::ReportFormat;
use crate::models::{
    AgentNarrative, CouncilReport, CountryRisk, PolicyRecommendation, RecoveryScenario,
    ReportMetadata, RiskAnalysis, SpecialistFindings,
};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &CouncilReport) -> String {
    let mut output = String::new();

    output.push_str("# Project Phoenix Climate Risk Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_executive_summary_section(report));
    output.push_str(&generate_risk_section(&report.risk_analysis));
    output.push_str(&generate_countries_section(&report.risk_analysis.high_risk_countries));
    output.push_str(&generate_scenarios_section(&report.recovery_scenarios));
    output.push_str(&generate_policies_section(&report.policy_recommendations));

    if let Some(ref specialists) = report.specialists {
        output.push_str(&generate_specialists_section(specialists));
    }

    output.push_str(&generate_commentary_section(&report.narratives));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset_source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    match metadata.model_used {
        Some(ref model) => section.push_str(&format!("- **Commentary Model:** `{}`\n", model)),
        None => section.push_str("- **Commentary Model:** none (deterministic council only)\n"),
    }
    section.push_str(&format!(
        "- **Records Analyzed:** {}\n",
        metadata.records_analyzed
    ));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_table_of_contents(report: &CouncilReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Executive Summary](#executive-summary)\n");
    toc.push_str("- [Risk Assessment](#risk-assessment)\n");
    toc.push_str("- [High-Risk Countries](#high-risk-countries)\n");
    toc.push_str("- [Recovery Scenarios](#recovery-scenarios)\n");
    toc.push_str("- [Policy Recommendations](#policy-recommendations)\n");

    if report.specialists.is_some() {
        toc.push_str("- [Specialist Findings](#specialist-findings)\n");
    }
    if !report.narratives.is_empty() {
        toc.push_str("- [Agent Commentary](#agent-commentary)\n");
    }

    toc.push('\n');
    toc
}

fn generate_executive_summary_section(report: &CouncilReport) -> String {
    let mut section = String::new();
    let summary = &report.summary;

    section.push_str("## Executive Summary\n\n");
    section.push_str(&format!("{}\n\n", report.synthesis.executive_summary));

    for finding in &report.synthesis.key_findings {
        section.push_str(&format!("- {}\n", finding));
    }
    section.push('\n');

    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!(
        "| Total Climate Damages | {} |\n",
        format_currency(summary.total_damages)
    ));
    section.push_str(&format!(
        "| Overall Risk Level | {} {} |\n",
        summary.risk_level.emoji(),
        summary.risk_level
    ));
    section.push_str(&format!(
        "| Recovery Scenarios | {} |\n",
        summary.number_of_scenarios
    ));
    section.push_str(&format!(
        "| Total Investment Required | {} |\n",
        format_currency(summary.total_investment_required)
    ));
    section.push_str(&format!(
        "| Policy Recommendations | {} |\n\n",
        summary.number_of_policies
    ));

    section
}

fn generate_risk_section(risk: &RiskAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Risk Assessment\n\n");
    section.push_str(&format!(
        "**Risk Level:** {} **{}**\n\n",
        risk.risk_level.emoji(),
        risk.risk_level
    ));
    section.push_str(&format!(
        "- **Total Damages:** {}\n",
        format_currency(risk.total_damages)
    ));
    section.push_str(&format!(
        "- **Average Damage per Event:** {}\n",
        format_currency(risk.average_damages)
    ));
    section.push_str(&format!(
        "- **Largest Single Damage:** {}\n",
        format_currency(risk.max_damage)
    ));
    section.push_str(&format!("- **Data Points:** {}\n", risk.data_points));
    section.push_str(&format!(
        "- **Countries Analyzed:** {}\n\n",
        risk.countries_analyzed
    ));

    section.push_str("### Correlations\n\n");
    section.push_str("| Indicator | Correlation with Damages |\n");
    section.push_str("|:---|:---:|\n");
    section.push_str(&format!(
        "| CO2 Emissions | {} |\n",
        format_correlation(risk.correlations.co2_damage_correlation)
    ));
    section.push_str(&format!(
        "| GDP | {} |\n\n",
        format_correlation(risk.correlations.gdp_damage_correlation)
    ));

    section
}

fn format_correlation(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |r| format!("{:.3}", r))
}

fn generate_countries_section(countries: &[CountryRisk]) -> String {
    let mut section = String::new();

    section.push_str("## High-Risk Countries\n\n");

    if countries.is_empty() {
        section.push_str("No country-level damage data was available.\n\n");
        return section;
    }

    section.push_str("| # | Country | Total Damage | Average Damage | Incidents |\n");
    section.push_str("|:---:|:---|---:|---:|:---:|\n");
    for (i, country) in countries.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            i + 1,
            country.country,
            format_currency(country.total_damage),
            format_currency(country.avg_damage),
            country.incident_count
        ));
    }
    section.push('\n');

    section
}

fn generate_scenarios_section(scenarios: &[RecoveryScenario]) -> String {
    let mut section = String::new();

    section.push_str("## Recovery Scenarios\n\n");

    for scenario in scenarios {
        section.push_str(&format!("### {}\n\n", scenario.scenario_name));
        section.push_str(&format!(
            "*Timeframe: {} | Estimated Cost: {}*\n\n",
            scenario.timeframe,
            format_currency(scenario.estimated_cost)
        ));
        section.push_str(&format!("**Focus:** {}\n\n", scenario.focus));
        section.push_str(&format!(
            "**Expected Impact:** {}\n\n",
            scenario.expected_impact
        ));

        if !scenario.key_actions.is_empty() {
            section.push_str("**Key Actions:**\n\n");
            for action in &scenario.key_actions {
                section.push_str(&format!("- {}\n", action));
            }
            section.push('\n');
        }
    }

    section
}

fn generate_policies_section(policies: &[PolicyRecommendation]) -> String {
    let mut section = String::new();

    section.push_str("## Policy Recommendations\n\n");

    for policy in policies {
        section.push_str(&generate_policy_block(policy));
    }

    section
}

fn generate_policy_block(policy: &PolicyRecommendation) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "#### {} **{}** {} - {}\n\n",
        policy.priority.emoji(),
        policy.priority,
        policy.policy_id,
        policy.title
    ));

    let mut facts = vec![format!(
        "Budget: {}",
        format_currency(policy.estimated_budget)
    )];
    if let Some(ref category) = policy.category {
        facts.push(format!("Category: {}", category));
    }
    if let Some(ref timeframe) = policy.timeframe {
        facts.push(format!("Timeframe: {}", timeframe));
    }
    block.push_str(&format!("*{}*\n\n", facts.join(" | ")));
    block.push_str(&format!("{}\n\n", policy.description));

    if !policy.implementation_steps.is_empty() {
        block.push_str("**Implementation Steps:**\n\n");
        for (i, step) in policy.implementation_steps.iter().enumerate() {
            block.push_str(&format!("{}. {}\n", i + 1, step));
        }
        block.push('\n');
    }

    if !policy.expected_outcomes.is_empty() {
        block.push_str("**Expected Outcomes:**\n\n");
        for outcome in &policy.expected_outcomes {
            block.push_str(&format!("- {}\n", outcome));
        }
        block.push('\n');
    }

    block.push_str("---\n\n");
    block
}

fn generate_specialists_section(findings: &SpecialistFindings) -> String {
    let mut section = String::new();

    section.push_str("## Specialist Findings\n\n");

    // Climate
    section.push_str("### Climate Trends\n\n");
    let trends = &findings.climate_trends;
    if trends.temperature.is_none() && trends.precipitation.is_none() {
        section.push_str("No temperature or precipitation data was available.\n\n");
    }
    if let Some(ref temperature) = trends.temperature {
        section.push_str(&format!(
            "- **Temperature:** mean {:.2}, std {}, trend {}\n",
            temperature.mean,
            temperature
                .std
                .map_or_else(|| "n/a".to_string(), |s| format!("{:.2}", s)),
            temperature.trend
        ));
    }
    if let Some(ref precipitation) = trends.precipitation {
        section.push_str(&format!(
            "- **Precipitation:** mean {:.2}, variability {}\n",
            precipitation.mean,
            precipitation
                .variability
                .map_or_else(|| "n/a".to_string(), |s| format!("{:.2}", s))
        ));
    }
    if trends.temperature.is_some() || trends.precipitation.is_some() {
        section.push('\n');
    }

    let projection = &findings.projection;
    section.push_str(&format!(
        "**{}-year projection:** damages trend {} (confidence: {})",
        projection.projection_period, projection.risk_trend, projection.confidence_level
    ));
    if let Some(pct) = projection.avg_annual_increase_pct {
        section.push_str(&format!(", average annual change {:.2}%", pct));
    }
    section.push_str("\n\n");
    for risk in &projection.key_risks {
        section.push_str(&format!("- {}\n", risk));
    }
    section.push('\n');

    section.push_str("### Extreme Events\n\n");
    if findings.extreme_events.is_empty() {
        section.push_str("No events above the extreme-damage threshold.\n\n");
    } else {
        section.push_str("| Year | Country | Event | Damage |\n");
        section.push_str("|:---:|:---|:---|---:|\n");
        for event in &findings.extreme_events {
            section.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                event.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
                event.country,
                event.event_type,
                format_currency(event.damage_cost)
            ));
        }
        section.push('\n');
    }

    section.push_str("### Regional Vulnerability\n\n");
    if findings.regional_vulnerability.is_empty() {
        section.push_str("No country-level damage data was available.\n\n");
    } else {
        section.push_str("| Country | Score | Total Damage | Events |\n");
        section.push_str("|:---|:---:|---:|:---:|\n");
        for country in &findings.regional_vulnerability {
            section.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                country.country,
                country
                    .vulnerability_score
                    .map_or_else(|| "n/a".to_string(), |s| format!("{:.1}", s)),
                format_currency(country.total_damage),
                country.event_count
            ));
        }
        section.push('\n');
    }

    // Economics
    let impact = &findings.economic_impact;
    section.push_str("### Economic Impact\n\n");
    section.push_str(&format!(
        "- **Total Economic Loss:** {}\n",
        format_currency(impact.total_economic_loss)
    ));
    section.push_str(&format!(
        "- **GDP Impact:** {:.2}%\n",
        impact.gdp_impact_percentage
    ));
    section.push_str(&format!(
        "- **Affected Countries:** {}\n\n",
        impact.affected_countries
    ));

    let needs = &findings.investment_needs;
    section.push_str("### Investment Needs\n\n");
    section.push_str("| Allocation | Amount |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!(
        "| Immediate Relief | {} |\n",
        format_currency(needs.immediate_relief)
    ));
    section.push_str(&format!(
        "| Short-term Recovery | {} |\n",
        format_currency(needs.short_term_recovery)
    ));
    section.push_str(&format!(
        "| Long-term Resilience | {} |\n",
        format_currency(needs.long_term_resilience)
    ));
    section.push_str(&format!(
        "| **Total Required** | **{}** |\n\n",
        format_currency(needs.total_investment_required)
    ));
    section.push_str(&format!(
        "Expected damage reduction {}, payback in {} years, benefit/cost ratio {:.1}.\n\n",
        needs.roi_projection.expected_damage_reduction,
        needs.roi_projection.payback_period_years,
        needs.roi_projection.benefit_cost_ratio
    ));

    let sectors = &findings.sector_vulnerability;
    let buckets = [
        ("High", &sectors.high_risk_sectors),
        ("Medium", &sectors.medium_risk_sectors),
        ("Low", &sectors.low_risk_sectors),
    ];
    if buckets.iter().any(|(_, shares)| !shares.is_empty()) {
        section.push_str("### Sector Vulnerability\n\n");
        section.push_str("| Sector | Risk | Damage | Share |\n");
        section.push_str("|:---|:---:|---:|---:|\n");
        for (label, shares) in buckets {
            for share in shares {
                section.push_str(&format!(
                    "| {} | {} | {} | {:.1}% |\n",
                    share.sector,
                    label,
                    format_currency(share.total_damage),
                    share.percentage_of_total
                ));
            }
        }
        section.push('\n');
    }

    if !findings.intervention_simulations.is_empty() {
        section.push_str("### Intervention Simulations\n\n");
        section.push_str("| Scenario | Investment | Jobs (best / expected / worst) | ROI (expected) |\n");
        section.push_str("|:---|---:|:---:|:---:|\n");
        for simulation in &findings.intervention_simulations {
            let outcomes = &simulation.outcomes;
            section.push_str(&format!(
                "| {} | {} | {} / {} / {} | {:.1}x |\n",
                simulation.scenario,
                format_currency(simulation.investment),
                outcomes.best_case.jobs_created,
                outcomes.expected_case.jobs_created,
                outcomes.worst_case.jobs_created,
                outcomes.expected_case.roi
            ));
        }
        section.push('\n');
    }

    // Policy
    if !findings.prioritized_policies.is_empty() {
        section.push_str("### Prioritized Policy Portfolio\n\n");
        section.push_str("| Rank | Policy | Category | Priority | Urgency | Budget |\n");
        section.push_str("|:---:|:---|:---|:---:|:---:|---:|\n");
        for policy in &findings.prioritized_policies {
            section.push_str(&format!(
                "| {} | {} {} | {} | {} {} | {} | {} |\n",
                policy.rank.map_or_else(|| "-".to_string(), |r| r.to_string()),
                policy.policy_id,
                policy.title,
                policy.category.as_deref().unwrap_or("-"),
                policy.priority.emoji(),
                policy.priority,
                policy
                    .urgency_score
                    .map_or_else(|| "-".to_string(), |u| u.to_string()),
                format_currency(policy.estimated_budget)
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_commentary_section(narratives: &[AgentNarrative]) -> String {
    if narratives.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Agent Commentary\n\n");
    for narrative in narratives {
        section.push_str(&format!("### {}\n\n", narrative.agent));
        section.push_str(&narrative.content);
        section.push_str("\n\n");
    }

    section
}

fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by the Project Phoenix Council of Agents*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &CouncilReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the report in the requested format.
pub fn render_report(report: &CouncilReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(generate_markdown_report(report)),
        ReportFormat::Json => generate_json_report(report),
    }
}

/// Write the report to a file.
pub fn write_report(report: &CouncilReport, format: ReportFormat, path: &Path) -> Result<()> {
    let content = render_report(report, format)?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

const BOX_WIDTH: usize = 62;

/// Boxed plain-text summary for the terminal.
pub fn generate_executive_summary(report: &CouncilReport) -> String {
    let summary = &report.summary;
    let rule = "─".repeat(BOX_WIDTH);
    let title = "PROJECT PHOENIX - EXECUTIVE SUMMARY";

    let mut out = String::new();
    out.push_str(&format!("╔{}╗\n", "═".repeat(BOX_WIDTH)));
    out.push_str(&format!("║{:^width$}║\n", title, width = BOX_WIDTH));
    out.push_str(&format!("╚{}╝\n\n", "═".repeat(BOX_WIDTH)));

    out.push_str("📊 CLIMATE RISK ASSESSMENT\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&summary_line(
        "Total Climate Damages:",
        &format_currency(summary.total_damages),
    ));
    out.push_str(&summary_line(
        "Overall Risk Level:",
        &format!("{} {}", summary.risk_level.emoji(), summary.risk_level),
    ));
    out.push('\n');

    out.push_str("🎯 RECOVERY PLANNING\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&summary_line(
        "Recovery Scenarios Generated:",
        &summary.number_of_scenarios.to_string(),
    ));
    out.push_str(&summary_line(
        "Total Investment Required:",
        &format_currency(summary.total_investment_required),
    ));
    out.push('\n');

    out.push_str("📋 POLICY RECOMMENDATIONS\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&summary_line(
        "Policy Recommendations:",
        &summary.number_of_policies.to_string(),
    ));

    out
}

fn summary_line(label: &str, value: &str) -> String {
    format!("{:<30}{}\n", label, value)
}

/// Format a dollar amount with thousands separators and two decimals.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
