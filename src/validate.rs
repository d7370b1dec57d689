//! Validation gate for normalized log batches
//!
//! A batch either validates as a whole or is rejected as a whole: a single
//! record with a missing field or an unknown severity aborts the run before
//! any analysis happens. Records whose timestamp cannot be parsed are the one
//! exception; they are dropped with a warning, as a normalizer would drop them.

use crate::event::{parse_timestamp, Event, Severity};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Fields every normalized record must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["event", "service", "severity", "timestamp"];

/// Batch-fatal schema violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Log {index} is not an object")]
    NotAnObject { index: usize },

    #[error("Log {index} missing fields: {}", .fields.join(", "))]
    MissingFields { index: usize, fields: Vec<String> },

    #[error("Log {index} has invalid severity: {severity}")]
    InvalidSeverity { index: usize, severity: String },

    #[error("Log {index} field '{field}' must be a string")]
    InvalidFieldType { index: usize, field: String },
}

/// Validate raw JSON records into typed events
///
/// # Errors
///
/// Returns the first [`ValidationError`] found; no events are returned in that case.
pub fn validate_records(records: &[Value]) -> std::result::Result<Vec<Event>, ValidationError> {
    let mut events = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for (index, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or(ValidationError::NotAnObject { index })?;

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !object.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields {
                index,
                fields: missing,
            });
        }

        let severity_raw = string_field(object, index, "severity")?;
        let severity: Severity =
            severity_raw
                .parse()
                .map_err(|_| ValidationError::InvalidSeverity {
                    index,
                    severity: severity_raw.to_string(),
                })?;

        let service = string_field(object, index, "service")?;
        let name = string_field(object, index, "event")?;
        let timestamp_raw = string_field(object, index, "timestamp")?;

        match parse_timestamp(timestamp_raw) {
            Some(timestamp) => events.push(Event::new(timestamp, service, severity, name)),
            None => {
                dropped += 1;
                tracing::warn!(
                    index,
                    timestamp = timestamp_raw,
                    "dropping record with unparseable timestamp"
                );
            }
        }
    }

    tracing::debug!(
        accepted = events.len(),
        dropped,
        "validated log batch"
    );
    Ok(events)
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    index: usize,
    field: &str,
) -> std::result::Result<&'a str, ValidationError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::InvalidFieldType {
            index,
            field: field.to_string(),
        })
}

/// Read a JSON array of normalized records and validate it
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<Event>> {
    let records = load_records(path)?;
    let events = validate_records(&records)?;
    Ok(events)
}

/// Read a JSON array of raw, not yet validated records
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read log file: {}", path.as_ref().display()))?;

    serde_json::from_str(&content).with_context(|| {
        format!(
            "Log file is not a JSON array: {}",
            path.as_ref().display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_batch() {
        let records = vec![
            json!({"timestamp": "2025-12-26T22:40:01Z", "service": "auth", "severity": "ERROR", "event": "timeout"}),
            json!({"timestamp": "2025-12-26T22:40:03Z", "service": "api", "severity": "WARN", "event": "slow"}),
        ];

        let events = validate_records(&records).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].service, "auth");
        assert_eq!(events[1].severity, Severity::Warn);
    }

    #[test]
    fn test_missing_fields_is_fatal() {
        let records = vec![
            json!({"timestamp": "2025-12-26T22:40:01Z", "service": "auth", "severity": "ERROR", "event": "timeout"}),
            json!({"timestamp": "2025-12-26T22:40:02Z", "service": "api"}),
        ];

        let err = validate_records(&records).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                index: 1,
                fields: vec!["event".to_string(), "severity".to_string()],
            }
        );
        assert_eq!(err.to_string(), "Log 1 missing fields: event, severity");
    }

    #[test]
    fn test_invalid_severity_is_fatal() {
        let records = vec![json!({
            "timestamp": "2025-12-26T22:40:01Z",
            "service": "auth",
            "severity": "WARNING",
            "event": "timeout"
        })];

        let err = validate_records(&records).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSeverity { index: 0, .. }));
    }

    #[test]
    fn test_non_object_is_fatal() {
        let records = vec![json!("just a string")];
        assert_eq!(
            validate_records(&records).unwrap_err(),
            ValidationError::NotAnObject { index: 0 }
        );
    }

    #[test]
    fn test_non_string_field_is_fatal() {
        let records = vec![json!({
            "timestamp": "2025-12-26T22:40:01Z",
            "service": 42,
            "severity": "ERROR",
            "event": "timeout"
        })];
        assert!(matches!(
            validate_records(&records).unwrap_err(),
            ValidationError::InvalidFieldType { index: 0, .. }
        ));
    }

    #[test]
    fn test_unparseable_timestamp_is_dropped() {
        let records = vec![
            json!({"timestamp": "not-a-time", "service": "auth", "severity": "ERROR", "event": "timeout"}),
            json!({"timestamp": "2025-12-26T22:40:01Z", "service": "api", "severity": "ERROR", "event": "boom"}),
        ];

        let events = validate_records(&records).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].service, "api");
    }

    #[test]
    fn test_empty_batch() {
        assert!(validate_records(&[]).unwrap().is_empty());
    }
}
