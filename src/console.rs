use crate::record::LogRecord;
use crate::sink::LogSink;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Writes each record's line to stdout or stderr.
///
/// In cloud mode every line is one JSON record, which is the shape the
/// platform log collector picks up from container output.
///
/// A failed write is this sink's problem, not the caller's: the record is
/// lost and the first failure is reported on stderr. Later failures are
/// not reported again.
#[derive(Debug)]
pub struct ConsoleSink {
    stream: ConsoleStream,
    failure_reported: AtomicBool,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            failure_reported: AtomicBool::new(false),
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    /// Whether a write failure has been seen.
    pub fn has_failed(&self) -> bool {
        self.failure_reported.load(Ordering::Relaxed)
    }

    fn report(&self, what: &str, error: io::Error) {
        if !self.failure_reported.swap(true, Ordering::Relaxed) {
            // stderr may be the broken stream; nothing else to fall back on.
            let _ = writeln!(
                io::stderr(),
                "console log sink ({:?}) {} failed, dropping records: {}",
                self.stream,
                what,
                error
            );
        }
    }
}

impl LogSink for ConsoleSink {
    fn emit(&self, record: &LogRecord) {
        let result = match self.stream {
            ConsoleStream::Stdout => writeln!(io::stdout().lock(), "{}", record.line),
            ConsoleStream::Stderr => writeln!(io::stderr().lock(), "{}", record.line),
        };
        if let Err(e) = result {
            self.report("write", e);
        }
    }

    fn flush(&self) {
        let result = match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        };
        if let Err(e) = result {
            self.report("flush", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_reported_once() {
        let sink = ConsoleSink::stdout();
        assert!(!sink.has_failed());

        sink.report("write", io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        sink.report("write", io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(sink.has_failed());
        assert_eq!(sink.stream(), ConsoleStream::Stdout);
    }
}
