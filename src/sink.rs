use crate::console::ConsoleSink;
use crate::record::{Channel, LogRecord};
use std::sync::Arc;

/// Destination for rendered [`LogRecord`]s.
///
/// The facade hands every record to exactly one sink and returns; it never
/// inspects the outcome. Delivery, buffering and failure reporting are the
/// sink's own business. `emit` is called on the logging thread, so
/// implementations must not block for long.
pub trait LogSink: Send + Sync {
    /// Accept a single rendered record.
    fn emit(&self, record: &LogRecord);

    /// Flush any buffered records. Default implementation is a no-op.
    fn flush(&self) {}
}

/// The two named output channels shared by every logger of one
/// configuration.
#[derive(Clone)]
pub struct Channels {
    pub standard: Arc<dyn LogSink>,
    pub error: Arc<dyn LogSink>,
}

impl Channels {
    pub fn new(standard: Arc<dyn LogSink>, error: Arc<dyn LogSink>) -> Self {
        Self { standard, error }
    }

    /// Standard channel on stdout, error channel on stderr.
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleSink::stdout()), Arc::new(ConsoleSink::stderr()))
    }

    /// Both channels backed by the same sink.
    pub fn shared(sink: Arc<dyn LogSink>) -> Self {
        Self::new(Arc::clone(&sink), sink)
    }

    pub fn get(&self, channel: Channel) -> &dyn LogSink {
        match channel {
            Channel::Standard => &*self.standard,
            Channel::Error => &*self.error,
        }
    }

    pub fn flush(&self) {
        self.standard.flush();
        self.error.flush();
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::console()
    }
}

impl std::fmt::Debug for Channels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channels").finish_non_exhaustive()
    }
}
