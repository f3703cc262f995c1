//! Request log format module
//!
//! Supports two formats:
//! - `simple`: `[<timestamp>] <METHOD> <uri> - IP: <addr>`, followed by a
//!   `Body: ...` line for write requests
//! - `json`: one JSON object per request

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::LogFormat;

/// One incoming request, as seen by the request logger
#[derive(Debug, Clone)]
pub struct RequestLogEntry {
    /// Request timestamp
    pub time: DateTime<Utc>,
    /// Client IP address
    pub remote_addr: String,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Path with query string
    pub uri: String,
    /// Raw request body, only recorded for write methods
    pub body: Option<String>,
}

impl RequestLogEntry {
    /// Create a new entry with current timestamp
    pub fn new(remote_addr: String, method: String, uri: String) -> Self {
        Self {
            remote_addr,
            time: Utc::now(),
            method,
            uri,
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Simple => self.format_simple(),
            LogFormat::Json => self.format_json(),
        }
    }

    fn timestamp(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn format_simple(&self) -> String {
        let line = format!(
            "[{}] {} {} - IP: {}",
            self.timestamp(),
            self.method,
            self.uri,
            self.remote_addr
        );
        match &self.body {
            Some(body) => format!("{line}\nBody: {body}"),
            None => line,
        }
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.timestamp(),
            "method": self.method,
            "uri": self.uri,
            "remote_addr": self.remote_addr,
            "body": self.body,
        })
        .to_string()
    }
}
