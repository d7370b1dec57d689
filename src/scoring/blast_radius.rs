// Blast radius classification
//
// duration > 30s or impacted >= 3  → HIGH
// duration > 10s or impacted >= 1  → MEDIUM
// otherwise                        → LOW
//
// Duration spans the root timestamp and every collapsed entry's first and
// last occurrence.

use super::impacted_services;
use crate::collapse::CollapsedEntry;
use crate::event::Event;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

const HIGH_DURATION_SECS: i64 = 30;
const HIGH_IMPACTED: usize = 3;
const MEDIUM_DURATION_SECS: i64 = 10;
const MEDIUM_IMPACTED: usize = 1;

/// Ordinal footprint of an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlastRadius {
    Low,
    Medium,
    High,
}

impl fmt::Display for BlastRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlastRadius::Low => write!(f, "LOW"),
            BlastRadius::Medium => write!(f, "MEDIUM"),
            BlastRadius::High => write!(f, "HIGH"),
        }
    }
}

/// Apply the classification rule to a duration and impacted-service count
pub fn classify_blast_radius(duration: Duration, impacted: usize) -> BlastRadius {
    if duration > Duration::seconds(HIGH_DURATION_SECS) || impacted >= HIGH_IMPACTED {
        BlastRadius::High
    } else if duration > Duration::seconds(MEDIUM_DURATION_SECS) || impacted >= MEDIUM_IMPACTED {
        BlastRadius::Medium
    } else {
        BlastRadius::Low
    }
}

/// Span from the earliest to the latest reference instant of an incident
///
/// Zero when the chain contributes no instants beyond the root's own.
pub fn impact_duration(root: &Event, chain: &[CollapsedEntry]) -> Duration {
    let (start, end) = chain
        .iter()
        .flat_map(|e| [e.first_seen, e.last_seen])
        .fold((root.timestamp, root.timestamp), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });
    end - start
}

/// Classify the blast radius of `root` given its collapsed chain
pub fn compute_blast_radius(root: &Event, chain: &[CollapsedEntry]) -> BlastRadius {
    classify_blast_radius(
        impact_duration(root, chain),
        impacted_services(root, chain).len(),
    )
}
