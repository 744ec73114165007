//! Pipeline progress logging.
//!
//! Every stage reports through the global [`LOGGER`]. Entries go to stderr so
//! stdout stays free for JSON output. The output format comes from the
//! `SURVEYTREE_LOG` environment variable (`text`, `json` or `quiet`), read the
//! first time the logger is used.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable selecting the log format.
pub const LOG_ENV: &str = "SURVEYTREE_LOG";

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for per-field detail lines
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Human-readable single line.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// How entries are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogFormat {
    Text = 0,
    Json = 1,
    Quiet = 2,
}

impl LogFormat {
    /// Parse an environment value; unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "quiet" | "off" | "none" => LogFormat::Quiet,
            _ => LogFormat::Text,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => LogFormat::Json,
            2 => LogFormat::Quiet,
            _ => LogFormat::Text,
        }
    }
}

/// Global logger
pub static LOGGER: Lazy<LogSink> = Lazy::new(LogSink::from_env);

/// Writes log entries to stderr in the configured format.
pub struct LogSink {
    format: AtomicU8,
}

impl LogSink {
    pub fn new(format: LogFormat) -> Self {
        Self { format: AtomicU8::new(format as u8) }
    }

    pub fn from_env() -> Self {
        let format = std::env::var(LOG_ENV)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Text);
        Self::new(format)
    }

    pub fn format(&self) -> LogFormat {
        LogFormat::from_u8(self.format.load(Ordering::Relaxed))
    }

    pub fn set_format(&self, format: LogFormat) {
        self.format.store(format as u8, Ordering::Relaxed);
    }

    /// Write one entry
    pub fn log(&self, entry: LogEntry) {
        let line = match self.format() {
            LogFormat::Quiet => return,
            LogFormat::Text => entry.render(),
            LogFormat::Json => match serde_json::to_string(&entry) {
                Ok(json) => json,
                Err(_) => entry.render(),
            },
        };
        // A closed stderr must not abort a run
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(LogFormat::Text)
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}
