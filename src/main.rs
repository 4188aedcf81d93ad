//! Phoenix - Council-of-agents climate risk analysis
//!
//! A CLI tool that runs a Risk Analyst, a Recovery Architect and a
//! Strategy Agent over a climate damage dataset, optionally asks Ollama
//! for commentary, and writes a Markdown or JSON report. With `--serve`
//! the same council is exposed over HTTP.
//!
//! Exit codes:
//!   0 - Success (risk below --fail-on, or no --fail-on set)
//!   1 - Runtime error (dataset, config, server failure, etc.)
//!   2 - Overall risk level at or above the --fail-on threshold

mod agents;
mod analysis;
mod api;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use agents::{AgentConfig, AgentCouncil, LlmClient};
use anyhow::{Context, Result};
use cli::{Args, RiskThreshold};
use config::{Config, CONFIG_FILE_NAME};
use dataset::{Dataset, ScanConfig};
use models::RiskLevel;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args, config_verbose(&args));

    info!("Phoenix v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let outcome = if args.serve {
        run_server(args).await.map(|_| 0)
    } else {
        run_analysis(args).await
    };

    match outcome {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Phoenix failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .phoenix.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize thresholds, model, dataset discovery, and more.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over the verbosity flags.
fn init_logging(args: &Args, config_verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level(config_verbose)).into())
        .from_env_lossy();

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// `general.verbose` from the config file, read before logging is up.
///
/// Load errors are ignored here; `load_config` reports them once logging works.
fn config_verbose(args: &Args) -> bool {
    let config = match args.config {
        Some(ref path) => Config::load(path).ok(),
        None => Config::load_default().ok().flatten(),
    };
    config.map_or(false, |c| c.general.verbose)
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                config
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Build the council, attaching the LLM client when commentary is enabled.
fn build_council(config: &Config, show_progress: bool) -> Result<AgentCouncil> {
    let council = AgentCouncil::new(config.analysis.clone()).with_progress(show_progress);

    if !config.model.enabled {
        debug!("LLM commentary disabled");
        return Ok(council);
    }

    let llm = LlmClient::new(AgentConfig::from(&config.model))?;
    Ok(council.with_llm(llm))
}

fn load_dataset(path: &Path, config: &Config) -> Result<Dataset> {
    let scan_config = ScanConfig::from(&config.dataset);
    let dataset = dataset::load_path(path, &scan_config)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    info!("Loaded {} records from {}", dataset.len(), dataset.source);
    if !dataset.has_column("damage_cost") {
        warn!("Dataset has no damage_cost column; all damages count as zero");
    }
    Ok(dataset)
}

/// Run the council over the dataset and write the report. Returns exit code (0 or 2).
async fn run_analysis(args: Args) -> Result<i32> {
    let start_time = Instant::now();
    let config = load_config(&args)?;

    let data_path = args
        .data
        .clone()
        .context("A dataset is required (--data PATH)")?;

    // Step 1: Load the dataset
    println!("📥 Loading dataset: {}", data_path.display());
    let dataset = load_dataset(&data_path, &config)?;

    if args.dry_run {
        return Ok(handle_dry_run(&dataset));
    }

    // Step 2: Convene the council
    let council = build_council(&config, !args.quiet)?;
    println!("🤖 Convening the council...");
    println!("   Records: {}", dataset.len());
    match council.llm() {
        Some(llm) => {
            println!("   Model: {}", llm.model_name());
            println!("   Ollama: {}", config.model.ollama_url);
        }
        None => println!("   Commentary: disabled"),
    }

    // Step 3: Run the analysis
    println!("\n🔬 Running council analysis...");
    let mut report = council.run(&dataset).await;
    if !config.report.include_narratives {
        report.narratives.clear();
    }

    // Step 4: Write the report
    println!("\n📝 Generating report...");
    let output = PathBuf::from(&config.general.output);
    report::write_report(&report, config.report.format, &output)?;

    if !args.quiet {
        println!("\n{}", report::generate_executive_summary(&report));
    }
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output.display()
    );

    // Check --fail-on threshold
    if let Some(threshold) = args.fail_on {
        let level = report.summary.risk_level;
        if level >= threshold_level(threshold) {
            eprintln!(
                "\n⛔ Risk level {} is at or above {:?}. Failing (exit code 2).",
                level, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Handle --dry-run: print what would be analyzed, exit.
fn handle_dry_run(dataset: &Dataset) -> i32 {
    println!("\n🔍 Dry run: dataset loaded (no analysis or LLM calls)...\n");

    let records = &dataset.records;
    let years = analysis::damages_by_year(records);
    let total = analysis::stats::sum(&analysis::damage_values(records));

    println!("   Source: {}", dataset.source);
    println!("   Records: {}", dataset.len());
    println!("   Columns: {}", dataset.columns.join(", "));
    println!("   Countries: {}", analysis::unique_countries(records));
    if let (Some(first), Some(last)) = (years.keys().next(), years.keys().next_back()) {
        println!("   Years: {}-{}", first, last);
    }
    println!("   Total damages: {}", report::format_currency(total));

    println!("\n✅ Dry run complete. No analysis was run.");
    0
}

/// Serve the HTTP API until Ctrl-C.
async fn run_server(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    let dataset = match args.data {
        Some(ref path) => Some(load_dataset(path, &config)?),
        None => None,
    };

    let council = build_council(&config, false)?;
    println!("🌐 Starting Phoenix API on http://{}", config.server.bind);

    api::serve(config, council, dataset).await
}

/// Convert the --fail-on threshold to a risk level for comparison.
fn threshold_level(threshold: RiskThreshold) -> RiskLevel {
    match threshold {
        RiskThreshold::Low => RiskLevel::Low,
        RiskThreshold::Medium => RiskLevel::Medium,
        RiskThreshold::High => RiskLevel::High,
        RiskThreshold::Critical => RiskLevel::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_threshold_level_ordering() {
        assert_eq!(threshold_level(RiskThreshold::High), RiskLevel::High);
        assert!(RiskLevel::Medium < threshold_level(RiskThreshold::High));
        assert!(RiskLevel::Critical >= threshold_level(RiskThreshold::Low));
    }

    #[test]
    fn test_build_council_without_llm() {
        let mut args = make_args();
        args.no_llm = true;

        let mut config = Config::default();
        config.merge_with_args(&args);

        let council = build_council(&config, false).unwrap();
        assert!(council.llm().is_none());
    }

    #[test]
    fn test_config_verbose_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phoenix.toml");
        std::fs::write(&path, "[general]\nverbose = true\n").unwrap();

        let mut args = make_args();
        args.config = Some(path.clone());
        assert!(config_verbose(&args));
        assert_eq!(args.log_level(config_verbose(&args)), tracing::Level::DEBUG);

        std::fs::write(&path, "[general]\nverbose = false\n").unwrap();
        assert!(!config_verbose(&args));

        args.config = Some(dir.path().join("missing.toml"));
        assert!(!config_verbose(&args));
    }

    #[test]
    fn test_load_dataset_fixture() {
        let dataset =
            load_dataset(Path::new("fixtures/climate_damages.csv"), &Config::default()).unwrap();
        assert_eq!(dataset.len(), 8);
        assert_eq!(handle_dry_run(&dataset), 0);
    }

    #[tokio::test]
    async fn test_run_analysis_writes_report_and_fails_on_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");

        let mut args = make_args();
        args.no_llm = true;
        args.quiet = true;
        args.format = Some(config::ReportFormat::Json);
        args.output = Some(output.clone());
        args.config = Some(dir.path().join("missing.toml"));
        assert!(run_analysis(args.clone()).await.is_err());

        args.config = None;
        assert_eq!(run_analysis(args.clone()).await.unwrap(), 0);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["summary"]["risk_level"], "MEDIUM");

        args.fail_on = Some(RiskThreshold::Medium);
        assert_eq!(run_analysis(args.clone()).await.unwrap(), 2);

        args.fail_on = Some(RiskThreshold::High);
        assert_eq!(run_analysis(args).await.unwrap(), 0);
    }
}
