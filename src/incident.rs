//! Incident clustering and dominant-root selection
//!
//! Root candidates that repeat the same failure (same service, same event
//! name) close together in time belong to one incident. Clustering is greedy
//! and first-fit: a candidate only compares against the most recently added
//! member of each open incident, so recurrences must be chained with gaps of
//! at most `max_gap` to stay together.
//!
//! ```text
//! max_gap = 10s
//!
//! auth/timeout  t0 ──5s── t0+5 ─────────25s───────── t0+30
//!               └── incident #1 ──┘                  └── incident #2
//! ```

use crate::dependency_graph::DependencyGraph;
use crate::event::Event;
use chrono::Duration;
use serde::Serialize;

/// Default maximum gap between consecutive recurrences
pub const DEFAULT_MAX_GAP_SECS: i64 = 10;

/// A temporally chained recurrence of one root signature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    roots: Vec<Event>,
}

impl Incident {
    fn start(root: Event) -> Self {
        Self { roots: vec![root] }
    }

    /// Root candidates in insertion (chronological) order
    pub fn roots(&self) -> &[Event] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn first(&self) -> Option<&Event> {
        self.roots.first()
    }

    /// Most recently added member
    pub fn last(&self) -> Option<&Event> {
        self.roots.last()
    }

    /// Time between the first and last member
    pub fn span(&self) -> Duration {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => Duration::zero(),
        }
    }

    /// Whether `candidate` continues this incident's recurrence chain
    fn accepts(&self, candidate: &Event, max_gap: Duration) -> bool {
        self.last().is_some_and(|last| {
            candidate.signature() == last.signature()
                && candidate.timestamp - last.timestamp <= max_gap
        })
    }
}

/// Group root candidates into incidents
///
/// Candidates are processed in ascending timestamp order; incidents are
/// returned in creation order.
pub fn cluster_incidents(candidates: &[Event], max_gap: Duration) -> Vec<Incident> {
    let mut ordered: Vec<&Event> = candidates.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut incidents: Vec<Incident> = Vec::new();
    for candidate in ordered {
        match incidents
            .iter()
            .position(|incident| incident.accepts(candidate, max_gap))
        {
            Some(idx) => incidents[idx].roots.push(candidate.clone()),
            None => incidents.push(Incident::start(candidate.clone())),
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        incidents = incidents.len(),
        max_gap_secs = max_gap.num_seconds(),
        "clustered incidents"
    );
    incidents
}

/// Pick the incident root with the largest downstream fan-out
///
/// Ties resolve to the first of the tied maxima in incident order. Returns
/// `None` only for an empty incident.
pub fn choose_dominant_root<'a>(
    incident: &'a Incident,
    graph: &DependencyGraph,
) -> Option<&'a Event> {
    let mut best: Option<(&Event, usize)> = None;
    for root in incident.roots() {
        let fan_out = graph.fan_out(&root.service);
        if best.map_or(true, |(_, best_fan_out)| fan_out > best_fan_out) {
            best = Some((root, fan_out));
        }
    }
    best.map(|(root, _)| root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Severity;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 26, 22, 40, 0).unwrap() + Duration::seconds(secs)
    }

    fn root(secs: i64, service: &str, name: &str) -> Event {
        Event::new(t(secs), service, Severity::Error, name)
    }

    fn gap() -> Duration {
        Duration::seconds(DEFAULT_MAX_GAP_SECS)
    }

    #[test]
    fn test_gap_splits_incidents() {
        let roots = vec![
            root(0, "auth", "timeout"),
            root(5, "auth", "timeout"),
            root(30, "auth", "timeout"),
        ];

        let incidents = cluster_incidents(&roots, gap());
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].len(), 2);
        assert_eq!(incidents[0].span(), Duration::seconds(5));
        assert_eq!(incidents[1].roots(), &[root(30, "auth", "timeout")]);
    }

    #[test]
    fn test_gap_boundary_is_inclusive() {
        let roots = vec![root(0, "auth", "timeout"), root(10, "auth", "timeout")];
        assert_eq!(cluster_incidents(&roots, gap()).len(), 1);

        let roots = vec![root(0, "auth", "timeout"), root(11, "auth", "timeout")];
        assert_eq!(cluster_incidents(&roots, gap()).len(), 2);
    }

    #[test]
    fn test_chained_recurrence_spans_beyond_gap() {
        let roots: Vec<Event> = (0..5).map(|i| root(i * 8, "auth", "timeout")).collect();
        let incidents = cluster_incidents(&roots, gap());
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].span(), Duration::seconds(32));
    }

    #[test]
    fn test_different_signatures_never_merge() {
        let roots = vec![
            root(0, "auth", "timeout"),
            root(1, "auth", "refused"),
            root(2, "db", "timeout"),
        ];
        assert_eq!(cluster_incidents(&roots, gap()).len(), 3);
    }

    #[test]
    fn test_interleaved_signatures() {
        let roots = vec![
            root(0, "auth", "timeout"),
            root(1, "db", "down"),
            root(2, "auth", "timeout"),
            root(3, "db", "down"),
        ];
        let incidents = cluster_incidents(&roots, gap());
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].first().unwrap().service, "auth");
        assert_eq!(incidents[1].first().unwrap().service, "db");
        assert_eq!(incidents[0].len(), 2);
        assert_eq!(incidents[1].len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_processed_chronologically() {
        let roots = vec![
            root(30, "auth", "timeout"),
            root(0, "auth", "timeout"),
            root(5, "auth", "timeout"),
        ];
        let incidents = cluster_incidents(&roots, gap());
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].first().map(|e| e.timestamp), Some(t(0)));
        assert_eq!(incidents[1].first().map(|e| e.timestamp), Some(t(30)));
    }

    #[test]
    fn test_partition_covers_every_candidate() {
        let roots = vec![
            root(0, "a", "x"),
            root(3, "b", "y"),
            root(4, "a", "x"),
            root(40, "a", "x"),
        ];
        let incidents = cluster_incidents(&roots, gap());
        let total: usize = incidents.iter().map(Incident::len).sum();
        assert_eq!(total, roots.len());
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_incidents(&[], gap()).is_empty());
    }

    #[test]
    fn test_dominant_root_prefers_fan_out() {
        let graph = DependencyGraph::from_dependencies([
            ("api", vec!["db"]),
            ("worker", vec!["db"]),
            ("proxy", vec!["api"]),
        ]);
        let incident = Incident {
            roots: vec![root(0, "api", "x"), root(1, "db", "x"), root(2, "proxy", "x")],
        };
        assert_eq!(
            choose_dominant_root(&incident, &graph).unwrap().service,
            "db"
        );
    }

    #[test]
    fn test_dominant_root_ties_resolve_to_first() {
        let graph = DependencyGraph::new();
        let incident = Incident {
            roots: vec![root(0, "auth", "timeout"), root(5, "auth", "timeout")],
        };
        assert_eq!(
            choose_dominant_root(&incident, &graph).unwrap().timestamp,
            t(0)
        );
    }

    #[test]
    fn test_dominant_root_of_empty_incident() {
        let incident = Incident { roots: Vec::new() };
        assert!(incident.is_empty());
        assert!(choose_dominant_root(&incident, &DependencyGraph::new()).is_none());
    }
}
