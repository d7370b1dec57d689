//! End-to-end incident analysis
//!
//! Runs the full pipeline over one validated, filtered batch:
//!
//! ```text
//! events ─► detect roots ─► cluster incidents ─► dominant root
//!                                                    │
//!        report ◄─ score ◄─ collapse retries ◄─ reconstruct chain
//! ```
//!
//! The run is a pure function of the batch, the dependency graph and the
//! configuration. An empty result (no root candidates) is a valid outcome.

use crate::causal_chain::{reconstruct_causal_chain, DEFAULT_WINDOW_SECS};
use crate::collapse::{collapse_retries, CollapsedEntry};
use crate::dependency_graph::DependencyGraph;
use crate::detector::{detect_root_causes, rank_candidates};
use crate::event::Event;
use crate::incident::{choose_dominant_root, cluster_incidents, DEFAULT_MAX_GAP_SECS};
use crate::scoring::{
    compute_blast_radius, compute_root_confidence, impact_duration, impacted_services,
    BlastRadius,
};
use chrono::Duration;
use serde::Serialize;

/// Tunables for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Per-hop propagation window for chain reconstruction
    pub window: Duration,
    /// Maximum gap between recurrences of one incident
    pub max_gap: Duration,
    /// When set, drop root candidates whose severity + fan-out score is lower
    pub min_rank_score: Option<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: Duration::seconds(DEFAULT_WINDOW_SECS),
            max_gap: Duration::seconds(DEFAULT_MAX_GAP_SECS),
            min_rank_score: None,
        }
    }
}

/// Everything known about one incident
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentReport {
    /// 1-based position in creation order
    pub index: usize,
    pub root: Event,
    pub confidence: f64,
    pub blast_radius: BlastRadius,
    /// Collapsed causal chain, root entry first
    pub chain: Vec<CollapsedEntry>,
    /// Sorted, excluding the root's own service
    pub impacted_services: Vec<String>,
    pub duration_secs: f64,
    /// Number of root candidates clustered into this incident
    pub candidate_count: usize,
}

impl IncidentReport {
    /// Chain entries other than the root's own
    pub fn propagation(&self) -> impl Iterator<Item = &CollapsedEntry> {
        self.chain.iter().skip(1)
    }
}

/// Analyze a batch of events against a dependency graph
///
/// `events` need not be sorted; a stable chronological order is established first.
pub fn analyze(
    events: &[Event],
    graph: &DependencyGraph,
    config: &AnalysisConfig,
) -> Vec<IncidentReport> {
    let mut events = events.to_vec();
    events.sort_by_key(|e| e.timestamp);

    let mut candidates = detect_root_causes(&events, graph);
    if let Some(min_score) = config.min_rank_score {
        let before = candidates.len();
        candidates = rank_candidates(&candidates, graph, min_score)
            .into_iter()
            .map(|scored| scored.event)
            .collect();
        candidates.sort_by_key(|e| e.timestamp);
        tracing::debug!(
            before,
            after = candidates.len(),
            min_score,
            "applied candidate ranking threshold"
        );
    }

    let incidents = cluster_incidents(&candidates, config.max_gap);

    let reports: Vec<IncidentReport> = incidents
        .iter()
        .filter_map(|incident| {
            let root = choose_dominant_root(incident, graph)?;
            Some((incident, root))
        })
        .enumerate()
        .map(|(idx, (incident, root))| {
            let raw_chain = reconstruct_causal_chain(&events, graph, root, config.window);
            let chain = collapse_retries(&raw_chain);

            let confidence = compute_root_confidence(root, &chain);
            let blast_radius = compute_blast_radius(root, &chain);
            let duration = impact_duration(root, &chain);
            let impacted: Vec<String> = impacted_services(root, &chain)
                .into_iter()
                .map(str::to_string)
                .collect();

            tracing::info!(
                incident = idx + 1,
                service = %root.service,
                event = %root.event,
                confidence,
                blast_radius = %blast_radius,
                impacted = impacted.len(),
                "incident analyzed"
            );

            IncidentReport {
                index: idx + 1,
                root: root.clone(),
                confidence,
                blast_radius,
                chain,
                impacted_services: impacted,
                duration_secs: duration.num_milliseconds() as f64 / 1000.0,
                candidate_count: incident.len(),
            }
        })
        .collect();

    tracing::info!(
        events = events.len(),
        candidates = candidates.len(),
        incidents = reports.len(),
        "analysis complete"
    );
    reports
}
