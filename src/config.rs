//! Analyzer configuration
//!
//! Loaded from an optional TOML file; every key may be omitted and falls back
//! to its default. Command-line flags override file values.
//!
//! ```toml
//! window_secs = 10
//! max_gap_secs = 10
//! min_severity = "ERROR"
//! ignore_events = ["heartbeat"]
//! dependencies = "config/dependencies.json"
//! # min_rank_score = 3
//! ```

use crate::analysis::AnalysisConfig;
use crate::causal_chain::DEFAULT_WINDOW_SECS;
use crate::event::Severity;
use crate::filter::{EventFilter, DEFAULT_IGNORED_EVENTS};
use crate::incident::DEFAULT_MAX_GAP_SECS;
use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the service dependency mapping
pub const DEFAULT_DEPENDENCIES_PATH: &str = "config/dependencies.json";

/// Upper bound for `window_secs` and `max_gap_secs` (one year)
pub const MAX_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration for one analyzer run
///
/// # Example
/// ```
/// use causeway::config::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.window_secs, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Per-hop propagation window in seconds
    pub window_secs: i64,

    /// Maximum gap between recurrences of one incident, in seconds
    pub max_gap_secs: i64,

    /// Events below this severity never reach the analyzer
    ///
    /// Default: ERROR. Lowering it lets WARN/INFO events join causal chains.
    pub min_severity: Severity,

    /// Event names dropped before analysis (keep-alives and similar noise)
    pub ignore_events: Vec<String>,

    /// Path to the JSON service dependency mapping
    pub dependencies: PathBuf,

    /// Optional severity + fan-out threshold applied to root candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rank_score: Option<u32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
            max_gap_secs: DEFAULT_MAX_GAP_SECS,
            min_severity: Severity::Error,
            ignore_events: DEFAULT_IGNORED_EVENTS.iter().map(|s| s.to_string()).collect(),
            dependencies: PathBuf::from(DEFAULT_DEPENDENCIES_PATH),
            min_rank_score: None,
        }
    }
}

impl AnalyzerConfig {
    /// Tight windows: only fast, direct propagation is attributed
    pub fn strict() -> Self {
        Self {
            window_secs: 5,
            max_gap_secs: 5,
            ..Self::default()
        }
    }

    /// Wide windows for slow-burning incidents with delayed retries
    pub fn permissive() -> Self {
        Self {
            window_secs: 30,
            max_gap_secs: 30,
            ..Self::default()
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).context("Failed to parse analyzer config")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window_secs <= 0 {
            return Err(format!(
                "window_secs must be positive, got {}",
                self.window_secs
            ));
        }

        if self.window_secs > MAX_WINDOW_SECS {
            return Err(format!(
                "window_secs must be at most {}, got {}",
                MAX_WINDOW_SECS, self.window_secs
            ));
        }

        if self.max_gap_secs < 0 {
            return Err(format!(
                "max_gap_secs must be non-negative, got {}",
                self.max_gap_secs
            ));
        }

        if self.max_gap_secs > MAX_WINDOW_SECS {
            return Err(format!(
                "max_gap_secs must be at most {}, got {}",
                MAX_WINDOW_SECS, self.max_gap_secs
            ));
        }

        Ok(())
    }

    /// Durations for the analysis pipeline; out-of-range values saturate
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            window: seconds_saturating(self.window_secs),
            max_gap: seconds_saturating(self.max_gap_secs),
            min_rank_score: self.min_rank_score,
        }
    }

    pub fn event_filter(&self) -> EventFilter {
        EventFilter::new(self.min_severity, self.ignore_events.iter().cloned())
    }
}

fn seconds_saturating(secs: i64) -> Duration {
    Duration::try_seconds(secs).unwrap_or(if secs < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}
