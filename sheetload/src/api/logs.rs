//! Pipeline log fan-out.
//!
//! A broadcast channel carries every log entry to interested subscribers
//! (the echo service streams them over SSE) while mirroring to stdout.
//! Debug entries are suppressed unless `SHEETLOAD_DEBUG` is set, keeping
//! per-field ignore reporting out of normal runs.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Log level for display and filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Debug,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| std::env::var("SHEETLOAD_DEBUG").is_ok());

/// Broadcasts log entries to all subscribers.
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a log entry to all subscribers, mirroring to stdout.
    pub fn log(&self, entry: LogEntry) {
        if matches!(entry.level, LogLevel::Debug) && !*DEBUG_ENABLED {
            return;
        }

        let prefix = match entry.level {
            LogLevel::Debug => "   ·",
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        println!("{} {}", prefix, entry.message);

        // Broadcast to SSE clients (ignore if no receivers)
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_debug(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::debug(msg));
}

pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        assert!(matches!(LogEntry::debug("d").level, LogLevel::Debug));
        assert!(matches!(LogEntry::warning("w").level, LogLevel::Warning));
        assert_eq!(LogEntry::error("boom").message, "boom");
    }

    #[test]
    fn test_entry_serializes_lowercase_level() {
        let json = serde_json::to_string(&LogEntry::info("hi")).unwrap();
        assert!(json.contains(r#""level":"info""#));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.log(LogEntry::info("hello"));
        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.message, "hello");
    }
}
