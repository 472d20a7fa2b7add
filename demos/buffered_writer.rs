use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use cloud_log_facade::buffered::{BufferConfig, BufferedSink, LogWriter};
use cloud_log_facade::record::LogRecord;
use cloud_log_facade::sink::Channels;
use cloud_log_facade::{log_info, logger};
use cloud_log_facade::{EnvironmentMode, LogConfig};
use tokio::time::Duration;

/// Example of a custom async destination. Imagine this talks to some
/// proprietary store; for the sake of example we just print the record.
struct PrintingWriter;

#[async_trait]
impl LogWriter for PrintingWriter {
    async fn write(&self, record: &LogRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("[{}] {}", record.channel_name(), record.line);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let buffer_config = BufferConfig {
        buffer: 50_000,
        batch_size: 1_000,
        flush_interval: Duration::from_millis(200),
    };
    let (sink, handle) = BufferedSink::new(Arc::new(PrintingWriter), buffer_config);

    let config = Arc::new(
        LogConfig::builder()
            .mode(EnvironmentMode::Cloud)
            .app_id("teammates-demo")
            .channels(Channels::shared(Arc::new(sink.clone())))
            .build()
            .expect("cloud config"),
    );
    let log = logger!(config);

    let n: u64 = 10_000;
    let start = Instant::now();
    for i in 0..n {
        log_info!(log, "iteration {}", i);
    }
    let elapsed = start.elapsed();

    let dropped = sink.stats().dropped.load(Ordering::Relaxed);
    eprintln!(
        "emitted {} records in {:?} (~{:.0} rec/s), dropped {}",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        dropped
    );

    // Close the queue so the writer task drains and exits.
    drop(log);
    drop(config);
    drop(sink);
    handle.await.expect("writer task");
}
