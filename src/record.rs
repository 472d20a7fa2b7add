use crate::level::LogSeverity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;

/// Output channel a record is written to. Every logger owns one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Standard,
    Error,
}

impl Channel {
    /// `Error` severity goes to the error channel, everything else to the
    /// standard one.
    pub fn for_severity(severity: LogSeverity) -> Self {
        match severity {
            LogSeverity::Error => Channel::Error,
            _ => Channel::Standard,
        }
    }

    /// Suffix appended to the logger name to name the channel
    /// (`app::jobs-out`, `app::jobs-err`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Channel::Standard => "out",
            Channel::Error => "err",
        }
    }
}

/// A fully rendered log line together with the routing data sinks need.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub severity: LogSeverity,
    pub channel: Channel,
    /// Name the emitting logger was bound to.
    pub logger: Cow<'static, str>,
    /// Output of the configured formatter.
    pub line: String,
}

impl LogRecord {
    /// `<logger>-out` or `<logger>-err`.
    pub fn channel_name(&self) -> String {
        format!("{}-{}", self.logger, self.channel.suffix())
    }
}
