// Incident scoring: root-cause confidence and blast radius
//
// Both scores are derived from the collapsed causal chain and are meant to be
// explainable by hand: confidence grows with the breadth (distinct impacted
// services) and volume (propagated entries) of the chain, and blast radius
// buckets the incident by how long and how wide it hurt.
//
// Both consumers read the same `first_seen` / `last_seen` / `occurrences`
// fields the retry collapser writes, so occurrence windows are always present.

mod blast_radius;
mod confidence;

pub use blast_radius::{classify_blast_radius, compute_blast_radius, impact_duration, BlastRadius};
pub use confidence::{compute_root_confidence, MIN_CONFIDENCE};

use crate::collapse::CollapsedEntry;
use crate::event::Event;
use std::collections::BTreeSet;

/// Distinct services in the chain other than the root's own service
pub fn impacted_services<'a>(root: &Event, chain: &'a [CollapsedEntry]) -> BTreeSet<&'a str> {
    chain
        .iter()
        .map(|entry| entry.service.as_str())
        .filter(|service| *service != root.service)
        .collect()
}

#[cfg(test)]
mod tests;
