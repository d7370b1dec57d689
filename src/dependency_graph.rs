//! Service dependency graph
//!
//! The graph is supplied as a mapping from each service to the services it
//! directly depends on, and stored with reversed edges so that failures flow
//! along the edge direction:
//!
//! ```text
//! dependencies.json                     DependencyGraph
//! ┌───────────────────────────┐         ┌──────────────────────────────┐
//! │ "api":   ["auth"]         │         │ auth ──► api ──► proxy       │
//! │ "proxy": ["api"]          │  ────►  │                              │
//! └───────────────────────────┘         │ successors(auth)  = [api]    │
//!                                       │ predecessors(api) = [auth]   │
//!                                       └──────────────────────────────┘
//! ```
//!
//! Edge `A → B` means "A is a dependency of B". The graph is read-only once
//! built and may contain cycles; a service that never appears in the mapping
//! has no predecessors and no successors.
//!
//! # Example
//!
//! ```
//! use causeway::dependency_graph::DependencyGraph;
//!
//! # fn main() -> anyhow::Result<()> {
//! let graph = DependencyGraph::from_json_str(r#"{"api": ["auth"], "proxy": ["api"]}"#)?;
//!
//! assert_eq!(graph.successors("auth"), ["api".to_string()]);
//! assert_eq!(graph.predecessors("proxy"), ["api".to_string()]);
//! assert!(graph.predecessors("billing").is_empty());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Directed dependency graph over service names
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Maps dependency → services that depend on it (downstream)
    successors: HashMap<String, Vec<String>>,

    /// Maps service → services it depends on (upstream)
    predecessors: HashMap<String, Vec<String>>,

    /// Nodes in first-seen order
    nodes: Vec<String>,

    edge_count: usize,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `service -> [dependencies]` pairs
    ///
    /// Every service and every dependency becomes a node. Repeated edges are
    /// collapsed; self-dependencies are kept as one-node cycles.
    pub fn from_dependencies<I, S, D>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let mut graph = Self::new();
        for (service, dependencies) in mapping {
            let service = service.into();
            graph.add_node(&service);
            for dependency in dependencies {
                graph.add_edge(dependency.into(), service.clone());
            }
        }
        graph
    }

    /// Parse a JSON dependency mapping such as `{"api": ["auth"]}`
    ///
    /// Successor lists follow the order services appear in the document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mapping: Map<String, Value> =
            serde_json::from_str(json).context("Failed to parse dependency mapping")?;

        let mut dependencies = Vec::with_capacity(mapping.len());
        for (service, value) in mapping {
            let names: Vec<String> = serde_json::from_value(value).with_context(|| {
                format!("Dependencies of '{}' must be a list of service names", service)
            })?;
            dependencies.push((service, names));
        }

        let graph = Self::from_dependencies(dependencies);
        if graph.has_cycle() {
            tracing::warn!(
                nodes = graph.node_count(),
                "dependency graph contains a cycle; chain reconstruction will deduplicate visits"
            );
        }
        Ok(graph)
    }

    /// Load a JSON dependency mapping from disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read dependency file: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid dependency file: {}", path.as_ref().display()))
    }

    fn add_node(&mut self, service: &str) {
        if !self.successors.contains_key(service) {
            self.successors.insert(service.to_string(), Vec::new());
            self.predecessors.insert(service.to_string(), Vec::new());
            self.nodes.push(service.to_string());
        }
    }

    fn add_edge(&mut self, upstream: String, downstream: String) {
        self.add_node(&upstream);
        self.add_node(&downstream);

        let downstream_list = self.successors.entry(upstream.clone()).or_default();
        if downstream_list.contains(&downstream) {
            return;
        }
        downstream_list.push(downstream.clone());
        self.predecessors
            .entry(downstream)
            .or_default()
            .push(upstream);
        self.edge_count += 1;
    }

    /// Whether the service appears in the graph at all
    pub fn contains(&self, service: &str) -> bool {
        self.successors.contains_key(service)
    }

    /// Services that directly depend on `service`
    pub fn successors(&self, service: &str) -> &[String] {
        self.successors
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Services that `service` directly depends on
    pub fn predecessors(&self, service: &str) -> &[String] {
        self.predecessors
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Downstream fan-out (number of direct successors)
    pub fn fan_out(&self, service: &str) -> usize {
        self.successors(service).len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All services, sorted by name
    pub fn services(&self) -> Vec<&str> {
        let mut services: Vec<&str> = self.nodes.iter().map(String::as_str).collect();
        services.sort_unstable();
        services
    }

    /// Detect whether any dependency cycle exists
    ///
    /// Cycles are legal input; this is reported for diagnostics only.
    pub fn has_cycle(&self) -> bool {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();

        self.nodes.iter().any(|node| {
            !visited.contains(node.as_str())
                && self.has_cycle_dfs(node, &mut visited, &mut rec_stack)
        })
    }

    fn has_cycle_dfs<'a>(
        &'a self,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        rec_stack: &mut HashSet<&'a str>,
    ) -> bool {
        visited.insert(node);
        rec_stack.insert(node);

        for child in self.successors(node) {
            if !visited.contains(child.as_str()) {
                if self.has_cycle_dfs(child, visited, rec_stack) {
                    return true;
                }
            } else if rec_stack.contains(child.as_str()) {
                // Back edge = cycle
                return true;
            }
        }

        rec_stack.remove(node);
        false
    }
}
