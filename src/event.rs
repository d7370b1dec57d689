//! Normalized service log events
//!
//! Every component of the analysis pipeline consumes the same immutable
//! [`Event`] record: one timestamped observation from one service.
//!
//! # Wire Format
//!
//! ```json
//! {"timestamp": "2025-12-26T22:40:01Z", "service": "auth", "severity": "ERROR", "event": "timeout"}
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a normalized event
///
/// Ordered `Info < Warn < Error` so filters can compare against a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Ranking weight used by the optional candidate scoring signal
    pub fn weight(self) -> u32 {
        match self {
            Severity::Info => 0,
            Severity::Warn => 1,
            Severity::Error => 2,
        }
    }

    /// Canonical wire label
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            other => Err(format!(
                "invalid severity '{}' (expected INFO, WARN or ERROR)",
                other
            )),
        }
    }
}

/// A validated, normalized log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub severity: Severity,
    pub event: String,
}

impl Event {
    pub fn new(
        timestamp: DateTime<Utc>,
        service: impl Into<String>,
        severity: Severity,
        event: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            service: service.into(),
            severity,
            event: event.into(),
        }
    }

    /// Identity triple used to deduplicate chain visits
    pub fn key(&self) -> (&str, DateTime<Utc>, &str) {
        (&self.service, self.timestamp, &self.event)
    }

    /// Recurrence signature: same service, same event name
    pub fn signature(&self) -> (&str, &str) {
        (&self.service, &self.event)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Parse an event timestamp
///
/// Accepts RFC 3339 with an offset or `Z`, and naive ISO-8601 date-times
/// (`T` or space separated, optional fractional seconds) which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
