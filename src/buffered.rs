use crate::record::LogRecord;
use crate::sink::LogSink;
use async_trait::async_trait;
use std::error::Error;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Asynchronous destination behind a [`BufferedSink`].
///
/// Implementations talk to whatever actually stores or forwards records.
/// They are driven from a background task, never from the logging thread.
#[async_trait]
pub trait LogWriter: Send + Sync {
    /// Write a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted.
    /// - `Err(..)` if it was not. The record is counted as failed and
    ///   dropped; [`BufferedSink`] does not retry.
    async fn write(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush buffered output after each batch. Default implementation is a
    /// no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Buffering parameters for [`BufferedSink`].
///
/// **Fields**
/// - `buffer`: records that may wait in the queue before new ones are
///   dropped.
/// - `batch_size`: records written per batch.
/// - `flush_interval`: longest time a partial batch waits before it is
///   written anyway.
#[derive(Clone, Debug)]
pub struct BufferConfig {
    pub buffer: usize,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            buffer: 1024,
            batch_size: 128,
            flush_interval: Duration::from_secs(1),
        }
    }
}

/// Counters shared between a [`BufferedSink`] and its background task.
#[derive(Debug, Default)]
pub struct BufferStats {
    /// Accepted into the queue.
    pub enqueued: AtomicU64,
    /// Rejected because the queue was full or the writer task had stopped.
    pub dropped: AtomicU64,
    /// Accepted by the writer.
    pub written: AtomicU64,
    /// Rejected by the writer.
    pub failed: AtomicU64,
}

/// [`LogSink`] that hands records to an async [`LogWriter`] through a
/// bounded channel, so the logging thread never waits on I/O.
///
/// When the queue is full the record is dropped and counted. Dropping every
/// clone of the sink closes the queue; the background task then writes what
/// is left and exits.
#[derive(Clone)]
pub struct BufferedSink {
    sender: mpsc::Sender<LogRecord>,
    stats: Arc<BufferStats>,
}

impl BufferedSink {
    /// Create the sink and spawn the task that drains it into `writer`.
    ///
    /// Must be called from within a Tokio runtime. Minimal thresholds are
    /// enforced for all three [`BufferConfig`] values.
    pub fn new(writer: Arc<dyn LogWriter>, config: BufferConfig) -> (Self, JoinHandle<()>) {
        let buffer = config.buffer.max(16);
        let batch_size = config.batch_size.max(1);
        let flush_interval = config.flush_interval.max(Duration::from_millis(10));

        let (tx, mut rx) = mpsc::channel::<LogRecord>(buffer);
        let stats = Arc::new(BufferStats::default());
        let stats_bg = Arc::clone(&stats);

        let handle = tokio::spawn(async move {
            let mut batch = Vec::with_capacity(batch_size);
            let mut ticker = interval(flush_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(record) => {
                            batch.push(record);
                            if batch.len() >= batch_size {
                                write_batch(&*writer, &mut batch, &stats_bg).await;
                            }
                        }
                        None => {
                            write_batch(&*writer, &mut batch, &stats_bg).await;
                            break;
                        }
                    },
                    _ = ticker.tick() => {
                        if !batch.is_empty() {
                            write_batch(&*writer, &mut batch, &stats_bg).await;
                        }
                    }
                }
            }
        });

        (Self { sender: tx, stats }, handle)
    }

    pub fn stats(&self) -> &BufferStats {
        &self.stats
    }
}

async fn write_batch(writer: &dyn LogWriter, batch: &mut Vec<LogRecord>, stats: &BufferStats) {
    if batch.is_empty() {
        return;
    }

    for record in batch.drain(..) {
        match writer.write(&record).await {
            Ok(()) => {
                stats.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                eprintln!("log writer rejected record from {}: {}", record.channel_name(), e);
            }
        }
    }

    if let Err(e) = writer.flush().await {
        eprintln!("error flushing log writer: {}", e);
    }
}

impl LogSink for BufferedSink {
    fn emit(&self, record: &LogRecord) {
        match self.sender.try_send(record.clone()) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                eprintln!("log buffer full, dropping log record");
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                eprintln!("log writer task stopped, dropping log record");
            }
        }
    }
}
