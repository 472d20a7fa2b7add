use crate::record::LogRecord;
use crate::sink::LogSink;
use std::sync::{Arc, Mutex, MutexGuard};

/// Keeps every record in memory.
///
/// Clones share the same buffer, so a test can hand one clone to
/// [`Channels`](crate::sink::Channels) and inspect another.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.guard().clone()
    }

    /// Rendered lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.guard().iter().map(|r| r.line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        self.guard().push(record.clone());
    }
}
