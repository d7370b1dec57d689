// Process/host name → service name mapping, plus keyword severity mapping

use crate::event::Severity;
use std::collections::HashMap;

const DEFAULT_SERVICES: [(&str, &str); 5] = [
    ("sshd", "ssh"),
    ("nginx", "proxy"),
    ("postgres", "db"),
    ("auth_service", "auth"),
    ("api_service", "api"),
];

/// Maps raw process names to the service names used in the dependency graph
///
/// Names without a mapping pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMap {
    names: HashMap<String, String>,
}

impl Default for ServiceMap {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_SERVICES)
    }
}

impl ServiceMap {
    /// Empty map: every name passes through
    pub fn identity() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, process: impl Into<String>, service: impl Into<String>) {
        self.names.insert(process.into(), service.into());
    }

    pub fn map(&self, name: &str) -> String {
        self.names
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

/// Infer severity from a level label or free-text message
///
/// Case-insensitive substring match, checked in order error, warn, info;
/// anything else is INFO.
pub fn severity_from_keywords(text: &str) -> Severity {
    let lower = text.to_lowercase();
    if lower.contains("error") {
        Severity::Error
    } else if lower.contains("warn") {
        Severity::Warn
    } else {
        Severity::Info
    }
}
