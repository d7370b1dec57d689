// Line parsers for the supported raw log sources
//
// Each parser turns one raw line into at most one normalized Event. A line
// that does not match its source's layout, or whose timestamp cannot be
// parsed, yields None and is dropped by the caller.

use super::service_map::{severity_from_keywords, ServiceMap};
use crate::event::{parse_timestamp, Event, Severity};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

/// `Dec 26 22:40:01 host sshd[1234]: message`
const SYSLOG_PATTERN: &str =
    r"^(?P<ts>\w+\s+\d+\s+\d+:\d+:\d+)\s+\S+\s+(?P<proc>[\w\-]+)(?:\[\d+\])?:\s+(?P<msg>.*)$";

/// `2025-12-26 22:40:01.123 UTC [12345] ERROR:  connection failed`
const DB_PATTERN: &str =
    r"^(?P<ts>[\d\-\s:.]+)\s+\S+\s+\[\d+\]\s+(?P<level>\w+):\s+(?P<msg>.*)$";

/// `127.0.0.1 - - [26/Dec/2025:22:40:01 +0530] "GET /api HTTP/1.1" 502 123`
const PROXY_PATTERN: &str =
    r#"\[(?P<ts>\d{1,2}/\w{3}/\d{4}:\d{2}:\d{2}:\d{2}\s[+\-]\d{4})\]\s"[^"]*"\s(?P<status>\d{3})(?:\s|$)"#;

/// Service assigned to app lines that are not structured JSON
pub const UNKNOWN_APP_SERVICE: &str = "unknown_app";

/// Compiled parsers sharing one service map
#[derive(Debug, Clone)]
pub struct LogNormalizer {
    services: ServiceMap,
    /// Syslog lines carry no year
    year: i32,
    syslog: Regex,
    db: Regex,
    proxy: Regex,
}

impl LogNormalizer {
    pub fn new() -> Result<Self> {
        Self::with_service_map(ServiceMap::default())
    }

    pub fn with_service_map(services: ServiceMap) -> Result<Self> {
        Ok(Self {
            services,
            year: Utc::now().year(),
            syslog: Regex::new(SYSLOG_PATTERN).context("Invalid syslog pattern")?,
            db: Regex::new(DB_PATTERN).context("Invalid db log pattern")?,
            proxy: Regex::new(PROXY_PATTERN).context("Invalid proxy log pattern")?,
        })
    }

    /// Override the year assumed for syslog timestamps
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn service_map(&self) -> &ServiceMap {
        &self.services
    }

    pub fn parse_syslog_line(&self, line: &str) -> Option<Event> {
        let caps = self.syslog.captures(line)?;

        let stamp = caps["ts"].split_whitespace().collect::<Vec<_>>().join(" ");
        let naive =
            NaiveDateTime::parse_from_str(&format!("{} {}", self.year, stamp), "%Y %b %d %H:%M:%S")
                .ok()?;

        let msg = caps["msg"].trim();
        Some(Event::new(
            naive.and_utc(),
            self.services.map(&caps["proc"]),
            severity_from_keywords(msg),
            msg,
        ))
    }

    /// Parse a structured application line
    ///
    /// Lines that are not a JSON object with string `timestamp`, `service`,
    /// `severity` and `event` keys become an INFO event from
    /// [`UNKNOWN_APP_SERVICE`] stamped with the current time.
    pub fn parse_app_line(&self, line: &str) -> Option<Event> {
        let fields = serde_json::from_str::<Value>(line)
            .ok()
            .and_then(|value| app_fields(&value));

        match fields {
            Some((ts, service, severity, event)) => Some(Event::new(
                parse_timestamp(&ts)?,
                self.services.map(&service),
                severity_from_keywords(&severity),
                event,
            )),
            None => Some(Event::new(
                Utc::now(),
                UNKNOWN_APP_SERVICE,
                Severity::Info,
                line.trim(),
            )),
        }
    }

    pub fn parse_db_line(&self, line: &str) -> Option<Event> {
        let caps = self.db.captures(line)?;
        let timestamp = parse_timestamp(caps["ts"].trim())?;
        Some(Event::new(
            timestamp,
            "db",
            severity_from_keywords(&caps["level"]),
            caps["msg"].trim(),
        ))
    }

    pub fn parse_proxy_line(&self, line: &str) -> Option<Event> {
        let caps = self.proxy.captures(line)?;
        let timestamp = DateTime::parse_from_str(&caps["ts"], "%d/%b/%Y:%H:%M:%S %z")
            .ok()?
            .with_timezone(&Utc);
        let status: u16 = caps["status"].parse().ok()?;
        let severity = if status >= 500 {
            Severity::Error
        } else {
            Severity::Info
        };
        Some(Event::new(
            timestamp,
            "proxy",
            severity,
            format!("HTTP {}", status),
        ))
    }
}

fn app_fields(value: &Value) -> Option<(String, String, String, String)> {
    let field = |name: &str| value.get(name)?.as_str().map(str::to_string);
    Some((
        field("timestamp")?,
        field("service")?,
        field("severity")?,
        field("event")?,
    ))
}
