//! Incident report rendering
//!
//! Text output is meant for an on-call human reading a terminal; JSON output
//! (`--format json`) serializes the same [`IncidentReport`]s for tooling.

use crate::analysis::IncidentReport;
use crate::collapse::CollapsedEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

const RULE_WIDTH: usize = 50;

/// Top-level JSON document
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub incident_count: usize,
    pub incidents: &'a [IncidentReport],
}

impl<'a> JsonReport<'a> {
    pub fn new(incidents: &'a [IncidentReport]) -> Self {
        Self {
            incident_count: incidents.len(),
            incidents,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render reports as pretty-printed JSON
pub fn render_json(reports: &[IncidentReport]) -> anyhow::Result<String> {
    JsonReport::new(reports).to_json()
}

/// Render reports as human-readable text
pub fn render_text(reports: &[IncidentReport]) -> String {
    TextReport(reports).to_string()
}

fn format_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

struct TextReport<'a>(&'a [IncidentReport]);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No root causes detected");
        }

        for (i, report) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_incident(f, report)?;
        }
        Ok(())
    }
}

fn write_incident(f: &mut fmt::Formatter<'_>, report: &IncidentReport) -> fmt::Result {
    writeln!(f, "INCIDENT #{}", report.index)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

    writeln!(f)?;
    writeln!(f, "Root Cause:")?;
    writeln!(
        f,
        "- {} failed at {} with event {}",
        report.root.service,
        format_instant(&report.root.timestamp),
        report.root.event
    )?;
    writeln!(f, "- confidence: {:.2}", report.confidence)?;

    writeln!(f)?;
    writeln!(f, "Propagation:")?;
    let mut propagated = report.propagation().peekable();
    if propagated.peek().is_none() {
        writeln!(f, "- none detected")?;
    }
    for entry in propagated {
        write_propagation_entry(f, entry)?;
    }

    writeln!(f)?;
    writeln!(f, "Impact Summary:")?;
    if report.impacted_services.is_empty() {
        writeln!(f, "- impacted services: none")?;
    } else {
        writeln!(
            f,
            "- impacted services: {}",
            report.impacted_services.join(", ")
        )?;
    }
    writeln!(f, "- blast radius: {}", report.blast_radius)
}

fn write_propagation_entry(f: &mut fmt::Formatter<'_>, entry: &CollapsedEntry) -> fmt::Result {
    writeln!(f, "- {} | {}", entry.service, entry.event)?;
    if entry.is_retry() {
        writeln!(f, "  first_seen: {}", format_instant(&entry.first_seen))?;
        writeln!(f, "  last_seen:  {}", format_instant(&entry.last_seen))?;
        writeln!(f, "  occurrences: {}", entry.occurrences)?;
        writeln!(
            f,
            "  duration: {:.1}s",
            entry.duration().num_milliseconds() as f64 / 1000.0
        )?;
    }
    Ok(())
}
