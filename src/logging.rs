//! Structured logging for the zero packet probe
//!
//! Console logger with level filtering, per-run correlation IDs, and an
//! optional JSON entry format for log aggregators. The probing core stays
//! silent; logging is driven by the binary's `--verbose`/`--debug` flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug level - detailed information for debugging
    Debug = 0,
    /// Info level - general application information
    Info = 1,
    /// Warning level - potentially harmful situations
    Warn = 2,
    /// Error level - error events
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }
}

/// A single structured log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was created
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Correlation ID tying entries of one run together
    pub correlation_id: Uuid,
    /// Additional structured context
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
}

/// Console logger with level filtering and a per-run correlation ID
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    json_output: bool,
    correlation_id: Uuid,
}

impl Logger {
    /// Create a logger that emits entries at or above `min_level`
    pub fn new(min_level: LogLevel, use_color: bool, json_output: bool) -> Self {
        Self {
            min_level,
            use_color,
            json_output,
            correlation_id: Uuid::new_v4(),
        }
    }

    /// The correlation ID attached to every entry of this logger
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Whether entries of `level` pass the filter
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn debug<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Debug, message.into(), HashMap::new());
    }

    pub fn info<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Info, message.into(), HashMap::new());
    }

    pub fn warn<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Warn, message.into(), HashMap::new());
    }

    pub fn error<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Error, message.into(), HashMap::new());
    }

    /// Log with additional structured context
    pub fn log_with_context<S: Into<String>>(
        &self,
        level: LogLevel,
        message: S,
        context: HashMap<String, String>,
    ) {
        self.log(level, message.into(), context);
    }

    fn log(&self, level: LogLevel, message: String, context: HashMap<String, String>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message,
            correlation_id: self.correlation_id,
            context,
        };

        eprintln!("{}", self.render(&entry));
    }

    fn render(&self, entry: &LogEntry) -> String {
        if self.json_output {
            // Serialization of these fields cannot fail; fall back to the
            // bare message if it somehow does.
            return serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone());
        }

        let timestamp = entry.timestamp.format("%H:%M:%S%.3f");
        let level = if self.use_color {
            format!(
                "{}{}\x1b[0m",
                entry.level.color_code(),
                entry.level.as_str()
            )
        } else {
            entry.level.as_str().to_string()
        };

        let mut line = format!("[{}] {} {}", timestamp, level, entry.message);
        if !entry.context.is_empty() {
            let mut pairs: Vec<String> = entry
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            pairs.sort();
            line.push_str(&format!(" ({})", pairs.join(", ")));
        }
        line
    }
}
