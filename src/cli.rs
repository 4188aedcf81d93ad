//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Phoenix - Council-of-agents climate risk analysis
///
/// Runs a Risk Analyst, a Recovery Architect and a Strategy Agent over a
/// climate damage dataset and writes a Markdown or JSON report. Can also
/// serve the same analysis over HTTP.
///
/// Examples:
///   phoenix --data climate_damages.csv
///   phoenix --data datasets/ --format json --output report.json
///   phoenix --data climate_damages.csv --no-llm --fail-on high
///   phoenix --data climate_damages.csv --dry-run
///   phoenix --serve --bind 0.0.0.0:8000
///   phoenix --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file or directory (CSV or JSON)
    ///
    /// Directories are scanned recursively and all matching files merged.
    /// Optional with --serve, where it is analyzed at startup.
    #[arg(
        short,
        long,
        value_name = "PATH",
        required_unless_present_any = ["init_config", "serve"]
    )]
    pub data: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting or phoenix_report.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Ollama model used for agent commentary
    ///
    /// Can also be set via PHOENIX_MODEL env var or .phoenix.toml config.
    #[arg(short, long, env = "PHOENIX_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint URL
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Temperature for LLM responses (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip LLM commentary and run the deterministic council only
    #[arg(long)]
    pub no_llm: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .phoenix.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Number of countries listed as high risk
    #[arg(long, value_name = "COUNT")]
    pub top_countries: Option<usize>,

    /// Fail if the overall risk level is at or above this level
    ///
    /// Useful for CI pipelines. Exit code 2 when threshold is reached.
    /// Values: critical, high, medium, low
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<RiskThreshold>,

    /// Dry run: load and validate the dataset without running the council
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .phoenix.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Start the HTTP API instead of writing a report
    #[arg(long)]
    pub serve: bool,

    /// Socket address for --serve
    #[arg(long, value_name = "ADDR", env = "PHOENIX_BIND")]
    pub bind: Option<String>,
}

/// Risk level accepted by --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum RiskThreshold {
    Low,
    Medium,
    High,
    Critical,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.data.is_none() && !self.serve {
            return Err("A dataset is required (--data PATH)".to_string());
        }

        // Validate Ollama URL format (not needed without LLM calls)
        if !self.dry_run && !self.no_llm {
            if let Some(ref url) = self.ollama_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
                }
            }
        }

        // Validate temperature range
        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 1.0".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(top) = self.top_countries {
            if top == 0 {
                return Err("Top countries must be at least 1".to_string());
            }
        }

        if let Some(ref bind) = self.bind {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(format!("Invalid bind address: {}", bind));
            }
        }

        // Validate dataset path if provided
        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset path does not exist: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins over both `--verbose` and `general.verbose` from the config file.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            data: Some(PathBuf::from("fixtures/climate_damages.csv")),
            output: None,
            format: None,
            model: None,
            ollama_url: None,
            temperature: None,
            timeout: None,
            no_llm: false,
            config: None,
            verbose: false,
            quiet: false,
            top_countries: None,
            fail_on: None,
            dry_run: false,
            init_config: false,
            serve: false,
            bind: None,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_ollama_url() {
        let mut args = make_args();
        args.ollama_url = Some("localhost:11434".to_string());
        assert!(args.validate().is_err());

        args.no_llm = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_dataset() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("does/not/exist.csv"));
        assert!(args.validate().is_err());

        args.data = None;
        assert!(args.validate().is_err());

        args.serve = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_ranges() {
        let mut args = make_args();
        args.temperature = Some(1.5);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.top_countries = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.bind = Some("0.0.0.0".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "phoenix",
            "--data",
            "fixtures/climate_damages.csv",
            "--format",
            "json",
            "--fail-on",
            "high",
        ])
        .unwrap();
        assert_eq!(args.format, Some(ReportFormat::Json));
        assert_eq!(args.fail_on, Some(RiskThreshold::High));

        assert!(Args::try_parse_from(["phoenix"]).is_err());
        assert!(Args::try_parse_from(["phoenix", "--serve"]).is_ok());
    }
}
