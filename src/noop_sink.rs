use crate::record::LogRecord;
use crate::sink::LogSink;

/// A sink that simply drops all records.
///
/// Useful for silencing one channel, or for measuring the cost of
/// rendering without any output.
#[derive(Clone, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn emit(&self, _record: &LogRecord) {}
}
