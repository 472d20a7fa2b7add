use std::sync::Arc;

use cloud_log_facade::trace::TraceContext;
use cloud_log_facade::{logger, LogConfig, Logger};

/// Request-scoped logger built the way middleware hands one to handlers.
pub fn request_logger(config: Arc<LogConfig>, trace_header: Option<&str>) -> Logger {
    let base = logger!(config);
    base.with_trace(Arc::new(TraceContext::from_cloud_trace_header(trace_header)))
}
