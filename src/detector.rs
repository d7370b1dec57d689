//! Root-cause detection
//!
//! An ERROR event is a root candidate when none of its service's direct
//! upstream dependencies logged an ERROR strictly earlier anywhere in the
//! batch. Services missing from the dependency graph have no upstream and are
//! always eligible (inferred roots, typically externally caused failures).
//!
//! ```text
//! auth ──► api ──► proxy
//!
//! t0   auth  ERROR timeout            ← root (auth has no upstream)
//! t0+2 api   ERROR upstream failure   ✗ auth failed earlier
//! t0+4 proxy ERROR HTTP 502           ✗ api failed earlier
//! ```
//!
//! A secondary severity + fan-out score can rank the candidates afterwards.
//! It never admits an event the boolean test rejected.

use crate::dependency_graph::DependencyGraph;
use crate::event::Event;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Default minimum score for [`rank_candidates`]
pub const DEFAULT_MIN_SCORE: u32 = 2;

/// A root candidate annotated with its ranking score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub score: u32,
    pub event: Event,
}

/// Find every ERROR event not explained by an earlier upstream ERROR
///
/// Output is sorted ascending by timestamp (stable for equal timestamps).
pub fn detect_root_causes(events: &[Event], graph: &DependencyGraph) -> Vec<Event> {
    // Earliest ERROR per service: "any earlier error" reduces to "earliest < t".
    let mut earliest_error: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for event in events.iter().filter(|e| e.is_error()) {
        earliest_error
            .entry(event.service.as_str())
            .and_modify(|t| *t = (*t).min(event.timestamp))
            .or_insert(event.timestamp);
    }

    let mut roots: Vec<Event> = events
        .iter()
        .filter(|e| e.is_error())
        .filter(|e| {
            let explained_by = graph.predecessors(&e.service).iter().find(|upstream| {
                earliest_error
                    .get(upstream.as_str())
                    .is_some_and(|&t| t < e.timestamp)
            });

            if let Some(upstream) = explained_by {
                tracing::trace!(
                    service = %e.service,
                    event = %e.event,
                    upstream = %upstream,
                    "explained by earlier upstream error"
                );
            }
            explained_by.is_none()
        })
        .cloned()
        .collect();

    roots.sort_by_key(|e| e.timestamp);

    tracing::debug!(
        errors = events.iter().filter(|e| e.is_error()).count(),
        roots = roots.len(),
        "detected root candidates"
    );
    roots
}

/// Severity weight plus downstream fan-out
pub fn score_event(event: &Event, graph: &DependencyGraph) -> u32 {
    combine_score(event.severity.weight(), graph.fan_out(&event.service))
}

fn combine_score(weight: u32, fan_out: usize) -> u32 {
    weight.saturating_add(u32::try_from(fan_out).unwrap_or(u32::MAX))
}

/// Rank already-detected candidates by score
///
/// Candidates scoring below `min_score` are dropped. The rest are ordered by
/// descending score, then ascending timestamp.
pub fn rank_candidates(
    candidates: &[Event],
    graph: &DependencyGraph,
    min_score: u32,
) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|event| ScoredCandidate {
            score: score_event(event, graph),
            event: event.clone(),
        })
        .filter(|c| c.score >= min_score)
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.event.timestamp.cmp(&b.event.timestamp))
    });
    ranked
}
