//! CLI argument parsing for Causeway

use crate::config::AnalyzerConfig;
use crate::detector::DEFAULT_MIN_SCORE;
use crate::event::Severity;
use crate::filter::EventFilter;
use crate::normalizer::{parse_source_arg, LogSource};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for incident reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "causeway")]
#[command(version)]
#[command(about = "Root-cause and failure propagation analysis for service logs", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a normalized JSON log batch for root causes
    Analyze(AnalyzeArgs),
    /// Convert raw log files into a normalized JSON log batch
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Normalized log file (JSON array of events)
    #[arg(value_name = "LOGS")]
    pub logs: PathBuf,

    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start from the strict preset (5s windows)
    #[arg(long = "strict", conflicts_with = "permissive")]
    pub strict: bool,

    /// Start from the permissive preset (30s windows)
    #[arg(long = "permissive")]
    pub permissive: bool,

    /// Service dependency mapping (JSON)
    #[arg(long = "deps", value_name = "FILE")]
    pub deps: Option<PathBuf>,

    /// Per-hop propagation window in seconds
    #[arg(long = "window", value_name = "SECS")]
    pub window: Option<i64>,

    /// Maximum gap between recurrences of one incident, in seconds
    #[arg(long = "max-gap", value_name = "SECS")]
    pub max_gap: Option<i64>,

    /// Drop events below this severity (INFO, WARN or ERROR)
    #[arg(long = "min-severity", value_name = "LEVEL")]
    pub min_severity: Option<Severity>,

    /// Event names to ignore (comma-separated, replaces the configured list)
    #[arg(long = "ignore", value_name = "EVENTS", value_delimiter = ',')]
    pub ignore: Option<Vec<String>>,

    /// Extra filter clauses, e.g. "ignore=keepalive; min=WARN"
    #[arg(long = "filter", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Drop root candidates whose severity + fan-out score is below SCORE (default 2)
    #[arg(long = "min-rank-score", value_name = "SCORE", num_args = 0..=1)]
    pub min_rank_score: Option<Option<u32>>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl AnalyzeArgs {
    /// Build the effective configuration: file or preset, then flag overrides
    pub fn resolve_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None if self.strict => AnalyzerConfig::strict(),
            None if self.permissive => AnalyzerConfig::permissive(),
            None => AnalyzerConfig::default(),
        };

        if let Some(deps) = &self.deps {
            config.dependencies = deps.clone();
        }
        if let Some(window) = self.window {
            config.window_secs = window;
        }
        if let Some(max_gap) = self.max_gap {
            config.max_gap_secs = max_gap;
        }
        if let Some(min_severity) = self.min_severity {
            config.min_severity = min_severity;
        }
        if let Some(ignore) = &self.ignore {
            config.ignore_events = ignore.clone();
        }
        if let Some(score) = self.min_rank_score {
            config.min_rank_score = Some(score.unwrap_or(DEFAULT_MIN_SCORE));
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// The configured filter refined by `--filter`
    pub fn event_filter(&self, config: &AnalyzerConfig) -> Result<EventFilter> {
        let filter = config.event_filter();
        match &self.filter {
            Some(expr) => filter.with_expr(expr),
            None => Ok(filter),
        }
    }
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Raw log source as <kind>=<path>; kind is syslog, app, db or proxy (repeatable)
    #[arg(
        long = "source",
        value_name = "KIND=PATH",
        value_parser = parse_source_arg,
        required = true
    )]
    pub sources: Vec<(LogSource, PathBuf)>,

    /// Output file for the normalized JSON array
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Year assumed for syslog timestamps (default: current year)
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<i32>,
}
