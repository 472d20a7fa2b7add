use std::time::Instant;

/// Header set by the cloud load balancer, formatted as
/// `TRACE_ID/SPAN_ID;o=OPTIONS`.
pub const CLOUD_TRACE_CONTEXT_HEADER: &str = "X-Cloud-Trace-Context";

/// Read-only view of the trace correlation data of the current unit of
/// work (usually one HTTP request).
///
/// Every accessor returns `None` when no request is active. Implementations
/// must be safe to share across threads; request-scoped values are passed
/// down explicitly through [`Logger::with_trace`](crate::logger::Logger::with_trace)
/// rather than stored in process-global state.
pub trait TraceContextReader: Send + Sync {
    fn trace_id(&self) -> Option<&str>;

    fn span_id(&self) -> Option<&str>;

    /// Milliseconds since the unit of work started.
    fn elapsed_millis(&self) -> Option<u64>;
}

/// Trace data for one request.
///
/// The default value carries nothing and leaves log entries uncorrelated.
#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    trace_id: Option<String>,
    span_id: Option<String>,
    started_at: Option<Instant>,
}

impl TraceContext {
    /// Start timing a request with the given identifiers.
    pub fn start(trace_id: Option<String>, span_id: Option<String>) -> Self {
        Self {
            trace_id: trace_id.filter(|id| !id.is_empty()),
            span_id: span_id.filter(|id| !id.is_empty()),
            started_at: Some(Instant::now()),
        }
    }

    /// Start timing a request whose identifiers come from the
    /// [`CLOUD_TRACE_CONTEXT_HEADER`] value, if the request carried one.
    ///
    /// A malformed or empty header yields an uncorrelated (but still timed)
    /// context.
    pub fn from_cloud_trace_header(header: Option<&str>) -> Self {
        let (trace_id, span_id) = header.map(parse_cloud_trace_header).unwrap_or_default();
        Self::start(trace_id, span_id)
    }
}

fn parse_cloud_trace_header(value: &str) -> (Option<String>, Option<String>) {
    let value = value.trim();
    let (trace, rest) = match value.split_once('/') {
        Some((trace, rest)) => (trace, Some(rest)),
        None => (value.split(';').next().unwrap_or_default(), None),
    };
    let span = rest
        .and_then(|rest| rest.split(';').next())
        .filter(|span| !span.is_empty());

    (
        Some(trace.to_string()).filter(|t| !t.is_empty()),
        span.map(str::to_string),
    )
}

impl TraceContextReader for TraceContext {
    fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    fn span_id(&self) -> Option<&str> {
        self.span_id.as_deref()
    }

    fn elapsed_millis(&self) -> Option<u64> {
        self.started_at
            .map(|start| u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX))
    }
}
