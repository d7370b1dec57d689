// Root-cause confidence
//
// confidence = 0.4 + 0.3 * min(impacted / 3, 1) + 0.3 * min(propagated / 5, 1)
//
// An empty chain has nothing supporting the attribution and gets the floor.

use super::impacted_services;
use crate::collapse::CollapsedEntry;
use crate::event::Event;

/// Confidence assigned when the chain is empty
pub const MIN_CONFIDENCE: f64 = 0.1;

const BASE: f64 = 0.4;
const BREADTH_WEIGHT: f64 = 0.3;
const VOLUME_WEIGHT: f64 = 0.3;

/// Impacted services needed for full breadth credit
const BREADTH_SATURATION: f64 = 3.0;

/// Propagated entries needed for full volume credit
const VOLUME_SATURATION: f64 = 5.0;

/// Confidence that `root` caused the incident described by `chain`
///
/// Rounded to two decimal places; always within `[0.1, 1.0]` and
/// non-decreasing in both impacted-service count and propagation count.
pub fn compute_root_confidence(root: &Event, chain: &[CollapsedEntry]) -> f64 {
    if chain.is_empty() {
        return MIN_CONFIDENCE;
    }

    let impacted = impacted_services(root, chain).len() as f64;
    let propagated = (chain.len() - 1) as f64;

    let confidence = BASE
        + BREADTH_WEIGHT * (impacted / BREADTH_SATURATION).min(1.0)
        + VOLUME_WEIGHT * (propagated / VOLUME_SATURATION).min(1.0);

    round2(confidence)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
