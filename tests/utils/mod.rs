// Shared fixtures for integration tests
//
// Builds normalized log batches and dependency mappings on disk so CLI tests
// can exercise the binary end to end.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// `api` depends on `auth`, `proxy` depends on `api`
pub const CHAIN_DEPENDENCIES: &str = r#"{
  "api": ["auth"],
  "proxy": ["api"]
}"#;

/// Timestamp `secs` seconds after 2025-12-26T22:40:00Z
pub fn ts(secs: u32) -> String {
    format!("2025-12-26T22:40:{:02}Z", secs)
}

pub fn record(secs: u32, service: &str, severity: &str, event: &str) -> Value {
    json!({
        "timestamp": ts(secs),
        "service": service,
        "severity": severity,
        "event": event,
    })
}

/// auth times out, api and proxy fail 2s and 4s later
pub fn propagation_scenario() -> Vec<Value> {
    vec![
        record(0, "auth", "ERROR", "timeout"),
        record(2, "api", "ERROR", "upstream failure"),
        record(4, "proxy", "ERROR", "HTTP 502"),
    ]
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub fn write_logs(dir: &Path, records: &[Value]) -> PathBuf {
    write_file(
        dir,
        "logs.json",
        &serde_json::to_string_pretty(records).unwrap(),
    )
}

pub fn write_dependencies(dir: &Path) -> PathBuf {
    write_file(dir, "dependencies.json", CHAIN_DEPENDENCIES)
}
