use std::sync::Arc;

use cloud_log_facade::init::init_tracing;
use cloud_log_facade::sink::Channels;
use cloud_log_facade::trace::TraceContext;
use cloud_log_facade::tracing_sink::TracingSink;
use cloud_log_facade::{log_info, logger};
use cloud_log_facade::{EnvironmentMode, LogConfig};

fn main() {
    init_tracing(EnvironmentMode::Cloud).expect("install subscriber");

    let config = Arc::new(
        LogConfig::builder()
            .mode(EnvironmentMode::Cloud)
            .app_id("teammates-demo")
            .channels(Channels::shared(Arc::new(TracingSink)))
            .build()
            .expect("cloud config"),
    );
    let log = logger!(config);

    log.info("uncorrelated entry");

    let trace = TraceContext::from_cloud_trace_header(Some("4bf92f3577b34da6a3ce929d0e0e4736/17;o=1"));
    let request_log = log.with_trace(Arc::new(trace));
    log_info!(request_log, "entry correlated with trace {}", "4bf92f35...");
    request_log.severe("error record, written to stderr");
}
