//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.phoenix.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".phoenix.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Council analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Dataset discovery settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "phoenix_report.md".to_string()
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Generate agent commentary with the LLM.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Default model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of retries on failure.
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_model(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    300
}

fn default_retries() -> usize {
    2
}

/// Thresholds and knobs for the council agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Total damages at or above this are HIGH risk.
    #[serde(default = "default_high_threshold")]
    pub high_risk_threshold: f64,

    /// Total damages at or above this are CRITICAL risk.
    #[serde(default = "default_critical_threshold")]
    pub critical_risk_threshold: f64,

    /// Number of countries listed as high risk.
    #[serde(default = "default_top_countries")]
    pub top_countries: usize,

    /// Damage percentile above which an event counts as extreme.
    #[serde(default = "default_extreme_percentile")]
    pub extreme_event_percentile: f64,

    /// Horizon of the climate risk projection, in years.
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,

    /// Multiplier from damages to total resilience investment.
    #[serde(default = "default_recovery_multiplier")]
    pub recovery_multiplier: f64,

    /// Run the climate, economic and policy specialists.
    #[serde(default = "default_true")]
    pub include_specialists: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: default_high_threshold(),
            critical_risk_threshold: default_critical_threshold(),
            top_countries: default_top_countries(),
            extreme_event_percentile: default_extreme_percentile(),
            projection_years: default_projection_years(),
            recovery_multiplier: default_recovery_multiplier(),
            include_specialists: true,
        }
    }
}

fn default_high_threshold() -> f64 {
    1_000_000_000.0
}

fn default_critical_threshold() -> f64 {
    5_000_000_000.0
}

fn default_top_countries() -> usize {
    10
}

fn default_extreme_percentile() -> f64 {
    95.0
}

fn default_projection_years() -> u32 {
    10
}

fn default_recovery_multiplier() -> f64 {
    1.5
}

/// Dataset discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// File extensions to load.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory or file names to skip.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,

    /// Maximum file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum number of files merged into one dataset.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excludes: default_excludes(),
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["csv", "json"].into_iter().map(String::from).collect()
}

fn default_excludes() -> Vec<String> {
    vec!["target", "node_modules", "__pycache__", ".venv", "venv"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_file_size() -> u64 {
    64 * 1024 * 1024 // 64MB
}

fn default_max_files() -> usize {
    100
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

/// Output format of the written report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Include LLM commentary sections.
    #[serde(default = "default_true")]
    pub include_narratives: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Markdown,
            include_narratives: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref url) = args.ollama_url {
            self.model.ollama_url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }
        if args.no_llm {
            self.model.enabled = false;
        }

        if let Some(top) = args.top_countries {
            self.analysis.top_countries = top;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;

        if analysis.high_risk_threshold <= 0.0 {
            bail!("analysis.high_risk_threshold must be positive");
        }
        if analysis.critical_risk_threshold <= analysis.high_risk_threshold {
            bail!("analysis.critical_risk_threshold must exceed analysis.high_risk_threshold");
        }
        if !(analysis.extreme_event_percentile > 0.0 && analysis.extreme_event_percentile <= 100.0) {
            bail!("analysis.extreme_event_percentile must be in (0, 100]");
        }
        if analysis.recovery_multiplier <= 0.0 {
            bail!("analysis.recovery_multiplier must be positive");
        }
        if analysis.top_countries == 0 {
            bail!("analysis.top_countries must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.model.temperature) {
            bail!("model.temperature must be between 0.0 and 1.0");
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            bail!("server.bind is not a valid socket address: {}", self.server.bind);
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, "llama3.2:latest");
        assert_eq!(config.analysis.high_risk_threshold, 1_000_000_000.0);
        assert_eq!(config.analysis.top_countries, 10);
        assert!(config.dataset.extensions.contains(&"csv".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[model]
name = "qwen2.5:14b"
enabled = false

[analysis]
high_risk_threshold = 1000.0
critical_risk_threshold = 5000.0
top_countries = 3

[report]
format = "json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.model.name, "qwen2.5:14b");
        assert!(!config.model.enabled);
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.analysis.critical_risk_threshold, 5000.0);
        assert_eq!(config.analysis.top_countries, 3);
        assert_eq!(config.analysis.extreme_event_percentile, 95.0);
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.analysis.critical_risk_threshold = 10.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.extreme_event_percentile = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[model]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[server]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.analysis.top_countries, 10);
    }

    #[test]
    fn test_merge_with_args_only_overrides_given_values() {
        let mut args = crate::cli::tests::make_args();
        args.model = Some("mistral:7b".to_string());
        args.no_llm = true;
        args.top_countries = Some(3);

        let mut config = Config::default();
        config.model.ollama_url = "http://gpu-box:11434".to_string();
        config.merge_with_args(&args);

        assert_eq!(config.model.name, "mistral:7b");
        assert_eq!(config.model.ollama_url, "http://gpu-box:11434");
        assert!(!config.model.enabled);
        assert_eq!(config.analysis.top_countries, 3);
    }
}
