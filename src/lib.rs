//! Causeway - root-cause and failure propagation analysis for service logs
//!
//! This library takes a batch of normalized log events and a service
//! dependency graph, infers which failures are root causes, groups their
//! recurrences into incidents, reconstructs how each failure propagated
//! downstream, and scores the result with a confidence value and a blast
//! radius. A normalizer turns raw syslog, application, database and proxy
//! logs into the event schema.

pub mod analysis;
pub mod causal_chain;
pub mod cli;
pub mod collapse;
pub mod config;
pub mod dependency_graph;
pub mod detector;
pub mod event;
pub mod filter;
pub mod incident;
pub mod normalizer;
pub mod report;
pub mod scoring;
pub mod validate;
