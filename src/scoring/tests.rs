// Scoring tests
//
// Covers the confidence formula, its floor and ceiling, and the blast-radius
// classification table.

use super::*;
use crate::causal_chain::Role;
use crate::event::Severity;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 26, 22, 40, 0).unwrap() + Duration::seconds(secs)
}

fn root_event() -> Event {
    Event::new(t(0), "auth", Severity::Error, "timeout")
}

fn collapsed(service: &str, first: i64, last: i64, occurrences: usize) -> CollapsedEntry {
    CollapsedEntry {
        service: service.to_string(),
        event: format!("{} failure", service),
        role: if service == "auth" {
            Role::Root
        } else {
            Role::Propagated
        },
        first_seen: t(first),
        last_seen: t(last),
        occurrences,
    }
}

/// Root entry followed by `services` downstream entries, `extra` repeated entries of the last
fn chain_with(services: &[&str], extra: usize) -> Vec<CollapsedEntry> {
    let mut chain = vec![collapsed("auth", 0, 0, 1)];
    for (i, service) in services.iter().enumerate() {
        chain.push(collapsed(service, i as i64 + 1, i as i64 + 1, 1));
    }
    for i in 0..extra {
        let mut entry = collapsed("api", 1, 1, 1);
        entry.event = format!("retry {}", i);
        chain.push(entry);
    }
    chain
}

#[test]
fn test_confidence_empty_chain_is_floor() {
    assert_eq!(compute_root_confidence(&root_event(), &[]), MIN_CONFIDENCE);
}

#[test]
fn test_confidence_root_only() {
    let chain = chain_with(&[], 0);
    assert_eq!(compute_root_confidence(&root_event(), &chain), 0.4);
}

#[test]
fn test_confidence_end_to_end_example() {
    // 2 impacted services, 2 propagated entries
    let chain = chain_with(&["api", "proxy"], 0);
    assert_eq!(compute_root_confidence(&root_event(), &chain), 0.72);
}

#[test]
fn test_confidence_saturates_at_one() {
    let chain = chain_with(&["api", "proxy", "db", "cache", "queue", "worker"], 4);
    assert_eq!(compute_root_confidence(&root_event(), &chain), 1.0);
}

#[test]
fn test_confidence_root_service_not_impacted() {
    // A second event on the root's own service adds volume but not breadth
    let mut chain = chain_with(&[], 0);
    let mut again = collapsed("auth", 3, 3, 1);
    again.event = "refused".to_string();
    chain.push(again);

    // 0.4 + 0 + 0.3 * 1/5 = 0.46
    assert_eq!(compute_root_confidence(&root_event(), &chain), 0.46);
}

#[test]
fn test_confidence_monotonic_in_impacted() {
    let mut previous = 0.0;
    let pool = ["api", "proxy", "db", "cache", "queue"];
    for n in 0..=pool.len() {
        let chain = chain_with(&pool[..n], 0);
        let score = compute_root_confidence(&root_event(), &chain);
        assert!(score >= previous, "n={} score={} previous={}", n, score, previous);
        assert!(score <= 1.0);
        previous = score;
    }
}

#[test]
fn test_impacted_services_excludes_root_service() {
    let chain = chain_with(&["api", "proxy"], 2);
    let impacted = impacted_services(&root_event(), &chain);
    assert_eq!(impacted.into_iter().collect::<Vec<_>>(), vec!["api", "proxy"]);
}

#[test]
fn test_classification_table() {
    let secs = Duration::seconds;
    assert_eq!(classify_blast_radius(secs(31), 0), BlastRadius::High);
    assert_eq!(classify_blast_radius(secs(5), 3), BlastRadius::High);
    assert_eq!(classify_blast_radius(secs(11), 0), BlastRadius::Medium);
    assert_eq!(classify_blast_radius(secs(5), 1), BlastRadius::Medium);
    assert_eq!(classify_blast_radius(secs(5), 0), BlastRadius::Low);
}

#[test]
fn test_classification_thresholds_are_strict_on_duration() {
    let secs = Duration::seconds;
    assert_eq!(classify_blast_radius(secs(30), 0), BlastRadius::Medium);
    assert_eq!(classify_blast_radius(secs(10), 0), BlastRadius::Low);
}

#[test]
fn test_blast_radius_empty_chain_is_low() {
    assert_eq!(compute_blast_radius(&root_event(), &[]), BlastRadius::Low);
    assert_eq!(impact_duration(&root_event(), &[]), Duration::zero());
}

#[test]
fn test_blast_radius_uses_occurrence_windows() {
    // Only the root's own service, but its retries last 40s
    let chain = vec![collapsed("auth", 0, 40, 9)];
    assert_eq!(impact_duration(&root_event(), &chain), Duration::seconds(40));
    assert_eq!(compute_blast_radius(&root_event(), &chain), BlastRadius::High);
}

#[test]
fn test_blast_radius_end_to_end_example() {
    let chain = chain_with(&["api", "proxy"], 0);
    assert_eq!(compute_blast_radius(&root_event(), &chain), BlastRadius::Medium);
}

#[test]
fn test_blast_radius_ordering_and_display() {
    assert!(BlastRadius::High > BlastRadius::Medium);
    assert!(BlastRadius::Medium > BlastRadius::Low);
    assert_eq!(BlastRadius::High.to_string(), "HIGH");
    assert_eq!(serde_json::to_string(&BlastRadius::Low).unwrap(), "\"LOW\"");
}
