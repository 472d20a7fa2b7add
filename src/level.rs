use serde::{Serialize, Serializer};
use std::fmt;

/// Severity of a single log entry.
///
/// Ordered from least to most severe so callers can filter with plain
/// comparisons. The facade itself only uses the severity to pick a channel
/// (`Error` goes to the error channel, everything else to standard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogSeverity {
    /// Name used in the cloud `severity` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warning => "WARNING",
            LogSeverity::Error => "ERROR",
        }
    }

    /// Equivalent `tracing` level, used when records are re-emitted as
    /// `tracing` events.
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogSeverity::Debug => tracing::Level::DEBUG,
            LogSeverity::Info => tracing::Level::INFO,
            LogSeverity::Warning => tracing::Level::WARN,
            LogSeverity::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LogSeverity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
