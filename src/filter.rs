//! Event filtering ahead of root-cause analysis
//!
//! Drops events below a minimum severity and events whose name is on an
//! ignore-list (keep-alive noise such as `heartbeat`). Relative order of the
//! surviving events is preserved.
//!
//! The gate runs on raw records, before validation, so below-threshold noise
//! with a severity outside INFO/WARN/ERROR (`DEBUG`, `TRACE`) never fails a
//! batch.
//!
//! `analyze --filter` refines the configured filter with `key=list` clauses:
//! - `ignore=heartbeat,keepalive`
//! - `min=WARN`

use crate::event::{Event, Severity};
use anyhow::{bail, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Event names ignored by the default pipeline filter
pub const DEFAULT_IGNORED_EVENTS: [&str; 1] = ["heartbeat"];

/// Filter deciding which events reach the analyzer
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Minimum severity to keep (inclusive)
    min_severity: Severity,
    /// Event names to drop regardless of severity
    ignore: HashSet<String>,
}

impl Default for EventFilter {
    /// ERROR and above, ignoring heartbeats
    fn default() -> Self {
        Self::new(Severity::Error, DEFAULT_IGNORED_EVENTS)
    }
}

impl EventFilter {
    /// Create a filter that keeps every event
    pub fn all() -> Self {
        Self {
            min_severity: Severity::Info,
            ignore: HashSet::new(),
        }
    }

    pub fn new<I, S>(min_severity: Severity, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_severity,
            ignore: ignore.into_iter().map(Into::into).collect(),
        }
    }

    /// Refine the filter with an expression like "ignore=keepalive" or "min=WARN"
    ///
    /// Several clauses may be joined with `;`. `ignore=` extends the
    /// ignore-list, `min=` replaces the minimum severity.
    pub fn with_expr(mut self, expr: &str) -> Result<Self> {
        for clause in expr.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(spec) = clause.strip_prefix("ignore=") {
                self.ignore.extend(
                    spec.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                );
            } else if let Some(spec) = clause.strip_prefix("min=") {
                self.min_severity = match spec.trim().parse() {
                    Ok(severity) => severity,
                    Err(e) => bail!("Invalid filter expression: {}: {}", clause, e),
                };
            } else {
                bail!(
                    "Invalid filter expression: {}. Expected format: ignore=NAMES or min=SEVERITY",
                    clause
                );
            }
        }

        Ok(self)
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Check if an event should reach the analyzer
    pub fn should_keep(&self, event: &Event) -> bool {
        event.severity >= self.min_severity && !self.ignore.contains(&event.event)
    }

    /// Check if a raw, not yet validated record should reach validation
    ///
    /// A missing severity counts as INFO; a severity outside the enumerated
    /// set ranks below INFO and is never kept.
    pub fn should_keep_record(&self, record: &Value) -> bool {
        let severity = match record.get("severity") {
            None => Some(Severity::Info),
            Some(value) => value.as_str().and_then(|s| s.parse::<Severity>().ok()),
        };
        let ignored = record
            .get("event")
            .and_then(Value::as_str)
            .is_some_and(|name| self.ignore.contains(name));

        severity.is_some_and(|s| s >= self.min_severity) && !ignored
    }

    /// Apply the filter to raw records ahead of validation, preserving order
    pub fn apply_records(&self, records: Vec<Value>) -> Vec<Value> {
        let before = records.len();
        let kept: Vec<Value> = records
            .into_iter()
            .filter(|r| self.should_keep_record(r))
            .collect();
        tracing::debug!(
            before,
            after = kept.len(),
            min_severity = %self.min_severity,
            "filtered raw records"
        );
        kept
    }

    /// Apply the filter, preserving relative order
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        let before = events.len();
        let kept: Vec<Event> = events.into_iter().filter(|e| self.should_keep(e)).collect();
        tracing::debug!(
            before,
            after = kept.len(),
            min_severity = %self.min_severity,
            "filtered events"
        );
        kept
    }
}
