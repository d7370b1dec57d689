//! Retry collapsing
//!
//! Services under failure tend to log the same error over and over while
//! they retry. Collapsing folds every `(service, event)` pair of a causal
//! chain into one summary carrying its first and last occurrence and a count.
//! Output keeps first-seen order; nothing is dropped and no service is added.

use crate::causal_chain::{ChainEntry, Role};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `(service, event)` pair summarized across its occurrences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedEntry {
    pub service: String,
    pub event: String,
    /// Role of the first occurrence
    pub role: Role,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub occurrences: usize,
}

impl CollapsedEntry {
    fn start(entry: &ChainEntry) -> Self {
        Self {
            service: entry.service.clone(),
            event: entry.event.clone(),
            role: entry.role,
            first_seen: entry.timestamp,
            last_seen: entry.timestamp,
            occurrences: 1,
        }
    }

    fn absorb(&mut self, entry: &ChainEntry) {
        self.first_seen = self.first_seen.min(entry.timestamp);
        self.last_seen = self.last_seen.max(entry.timestamp);
        self.occurrences += 1;
    }

    /// Time between first and last occurrence
    pub fn duration(&self) -> Duration {
        self.last_seen - self.first_seen
    }

    /// Whether this entry summarizes more than one raw occurrence
    pub fn is_retry(&self) -> bool {
        self.occurrences > 1
    }
}

/// Merge repeated `(service, event)` entries of a chain
pub fn collapse_retries(chain: &[ChainEntry]) -> Vec<CollapsedEntry> {
    let mut collapsed: Vec<CollapsedEntry> = Vec::new();
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();

    for entry in chain {
        let key = (entry.service.as_str(), entry.event.as_str());
        match slots.get(&key).copied() {
            Some(slot) => collapsed[slot].absorb(entry),
            None => {
                slots.insert(key, collapsed.len());
                collapsed.push(CollapsedEntry::start(entry));
            }
        }
    }

    tracing::debug!(
        raw = chain.len(),
        collapsed = collapsed.len(),
        "collapsed retries"
    );
    collapsed
}
