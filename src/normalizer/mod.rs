// Raw log normalization
//
// Turns heterogeneous raw log files (syslog, structured application logs,
// PostgreSQL server logs, nginx access logs) into the normalized event
// schema the analyzer consumes:
//
//   raw files ──► per-source line parser ──► Event ──► sort by timestamp ──► JSON array
//
// Blank and unparseable lines are dropped; the output is always
// chronological across all sources.

mod parsers;
mod service_map;

pub use parsers::{LogNormalizer, UNKNOWN_APP_SERVICE};
pub use service_map::{severity_from_keywords, ServiceMap};

use crate::event::Event;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of raw log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum LogSource {
    /// `Mon DD HH:MM:SS host proc[pid]: message`
    Syslog,
    /// One JSON object per line
    App,
    /// PostgreSQL server log
    Db,
    /// nginx combined access log
    Proxy,
}

/// Parse a `<kind>=<path>` source argument, e.g. `syslog=/var/log/syslog`
pub fn parse_source_arg(arg: &str) -> std::result::Result<(LogSource, PathBuf), String> {
    let (kind, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <kind>=<path>, got '{}'", arg))?;
    let source = LogSource::from_str(kind.trim(), true)
        .map_err(|_| format!("unknown log source '{}' (expected syslog, app, db or proxy)", kind))?;
    if path.trim().is_empty() {
        return Err(format!("missing path for log source '{}'", kind));
    }
    Ok((source, PathBuf::from(path.trim())))
}

impl LogNormalizer {
    /// Parse one line according to its source kind
    pub fn parse_line(&self, source: LogSource, line: &str) -> Option<Event> {
        match source {
            LogSource::Syslog => self.parse_syslog_line(line),
            LogSource::App => self.parse_app_line(line),
            LogSource::Db => self.parse_db_line(line),
            LogSource::Proxy => self.parse_proxy_line(line),
        }
    }

    /// Normalize the contents of one file
    pub fn normalize_str(&self, source: LogSource, contents: &str) -> Vec<Event> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let parsed = self.parse_line(source, line);
                if parsed.is_none() {
                    tracing::trace!(?source, line, "dropped unparseable line");
                }
                parsed
            })
            .collect()
    }

    /// Normalize several files into one chronological event list
    pub fn normalize_files(&self, files: &[(LogSource, PathBuf)]) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        for (source, path) in files {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read log file: {}", path.display()))?;
            let parsed = self.normalize_str(*source, &contents);
            tracing::debug!(?source, path = %path.display(), events = parsed.len(), "normalized file");
            events.extend(parsed);
        }
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}

/// Normalize files with the default service map
pub fn normalize_files(files: &[(LogSource, PathBuf)]) -> Result<Vec<Event>> {
    LogNormalizer::new()?.normalize_files(files)
}

/// Write events as a pretty-printed JSON array
pub fn write_normalized_json<P: AsRef<Path>>(events: &[Event], path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(events)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write normalized logs: {}", path.display()))?;
    tracing::info!(events = events.len(), path = %path.display(), "wrote normalized logs");
    Ok(())
}
