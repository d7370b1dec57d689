//! Causal chain reconstruction
//!
//! Starting at a root event, walk the dependency graph forward and pull in
//! every downstream event that happens within the propagation window of the
//! hop that reached it.
//!
//! # Propagation Rule
//!
//! From an event `E` on service `s`, an event `D` on a direct successor of `s`
//! joins the chain iff
//!
//! ```text
//! E.timestamp < D.timestamp <= E.timestamp + window
//! ```
//!
//! The window is measured from each hop, not from the root, so a long chain
//! of quick hops can span far more than one window:
//!
//! ```text
//! window = 10s
//!
//! db (t0) ──8s──► api (t0+8) ──8s──► proxy (t0+16)     all three in chain
//! db (t0) ─────────────────────────► proxy             (not a direct edge)
//! ```
//!
//! # Termination
//!
//! Dependency graphs may be cyclic. Every visit is keyed on
//! `(service, timestamp, event)` and each key is expanded at most once, so
//! the traversal terminates and never emits a duplicate entry. The walk uses
//! an explicit stack; depth is bounded by the heap, not the call stack.

use crate::dependency_graph::DependencyGraph;
use crate::event::Event;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default propagation window between hops
pub const DEFAULT_WINDOW_SECS: i64 = 10;

/// Role of an entry within a causal chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Root,
    Propagated,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Root => write!(f, "ROOT"),
            Role::Propagated => write!(f, "PROPAGATED"),
        }
    }
}

/// One visited event in a reconstructed chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub event: String,
    pub role: Role,
}

impl ChainEntry {
    fn from_event(event: &Event, role: Role) -> Self {
        Self {
            timestamp: event.timestamp,
            service: event.service.clone(),
            event: event.event.clone(),
            role,
        }
    }
}

/// Events grouped by service, batch order preserved within each service
fn index_by_service(events: &[Event]) -> HashMap<&str, Vec<&Event>> {
    let mut index: HashMap<&str, Vec<&Event>> = HashMap::new();
    for event in events {
        index.entry(event.service.as_str()).or_default().push(event);
    }
    index
}

/// Reconstruct the chain of events caused by `root`
///
/// # Arguments
///
/// * `events` - The full validated batch
/// * `graph` - Dependency graph (read-only)
/// * `root` - Chosen root event; need not be an element of `events`
/// * `window` - Per-hop propagation window
///
/// # Returns
///
/// Chain entries sorted ascending by timestamp. The root is always the
/// first entry emitted and carries [`Role::Root`].
pub fn reconstruct_causal_chain(
    events: &[Event],
    graph: &DependencyGraph,
    root: &Event,
    window: Duration,
) -> Vec<ChainEntry> {
    let by_service = index_by_service(events);

    let mut chain = Vec::new();
    let mut visited: HashSet<(&str, DateTime<Utc>, &str)> = HashSet::new();
    let mut stack: Vec<&Event> = vec![root];

    while let Some(current) = stack.pop() {
        if !visited.insert(current.key()) {
            continue;
        }

        let role = if chain.is_empty() {
            Role::Root
        } else {
            Role::Propagated
        };
        chain.push(ChainEntry::from_event(current, role));

        // None: the window reaches past the last representable instant
        let window_end = current.timestamp.checked_add_signed(window);
        let mut next: Vec<&Event> = Vec::new();
        for downstream in graph.successors(&current.service) {
            let Some(candidates) = by_service.get(downstream.as_str()) else {
                continue;
            };
            next.extend(
                candidates
                    .iter()
                    .copied()
                    .filter(|e| {
                        current.timestamp < e.timestamp
                            && window_end.map_or(true, |end| e.timestamp <= end)
                    }),
            );
        }

        // Reverse so the first successor is expanded first, as a recursive walk would.
        stack.extend(next.into_iter().rev().filter(|e| !visited.contains(&e.key())));
    }

    chain.sort_by_key(|entry| entry.timestamp);

    tracing::debug!(
        root_service = %root.service,
        entries = chain.len(),
        window_secs = window.num_seconds(),
        "reconstructed causal chain"
    );
    chain
}
