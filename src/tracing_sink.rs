use crate::level::LogSeverity;
use crate::record::LogRecord;
use crate::sink::LogSink;

/// Re-emits records as `tracing` events so they flow through whatever
/// subscriber the process installed (see [`crate::init`]).
///
/// The event level follows the record severity; the logger name and the
/// channel are attached as fields. The rendered line is the event message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let logger: &str = &record.logger;
        let channel = record.channel.suffix();
        match record.severity {
            LogSeverity::Debug => tracing::debug!(logger, channel, "{}", record.line),
            LogSeverity::Info => tracing::info!(logger, channel, "{}", record.line),
            LogSeverity::Warning => tracing::warn!(logger, channel, "{}", record.line),
            LogSeverity::Error => tracing::error!(logger, channel, "{}", record.line),
        }
    }
}
