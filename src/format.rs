//! Rendering strategies: one for people reading a console, one for the
//! cloud log collector.

use crate::config::EnvironmentMode;
use crate::payload::{Fields, Payload};

/// Turns a [`Payload`] into the line handed to a sink.
///
/// Chosen once when the [`LogConfig`](crate::config::LogConfig) is built;
/// the two implementations are never mixed within one configuration.
pub trait Formatter: Send + Sync {
    /// Which environment this formatter targets.
    fn mode(&self) -> EnvironmentMode;

    /// Render a plain leveled entry.
    fn render(&self, payload: &Payload) -> String;

    /// Render a structured event. `details` is the caller's event data,
    /// already merged into `payload.extra`.
    fn render_event(&self, payload: &Payload, details: &Fields) -> String;
}

/// Compact single-line JSON. Key order is the map's (sorted) order.
pub fn to_compact_json(fields: &Fields) -> String {
    serde_json::to_string(fields).unwrap_or_else(|_| "{}".to_string())
}

/// Human-readable console lines:
/// `<type>:<method>:<line>: [<traceId>] <message>`.
///
/// Severity is not part of the text; it is conveyed by the channel the
/// line is written to.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    fn line(&self, payload: &Payload) -> String {
        let mut out = String::new();
        if let Some(location) = &payload.location {
            out.push_str(&location.to_string());
            out.push_str(": ");
        }
        if let Some(trace_id) = &payload.trace_id {
            out.push('[');
            out.push_str(trace_id);
            out.push_str("] ");
        }
        out.push_str(&payload.message);
        out
    }
}

impl Formatter for HumanFormatter {
    fn mode(&self) -> EnvironmentMode {
        EnvironmentMode::Local
    }

    fn render(&self, payload: &Payload) -> String {
        self.line(payload)
    }

    fn render_event(&self, payload: &Payload, details: &Fields) -> String {
        format!("{} extra_info: {}", self.line(payload), to_compact_json(details))
    }
}

/// Structured JSON records for the cloud log collector. The message is one
/// field among the others; nothing is concatenated.
#[derive(Debug, Clone, Copy)]
pub struct CloudFormatter {
    include_time: bool,
}

impl CloudFormatter {
    pub fn new(include_time: bool) -> Self {
        Self { include_time }
    }

    fn fields(&self, payload: &Payload) -> Fields {
        if self.include_time {
            payload.to_fields_with_time()
        } else {
            payload.to_fields()
        }
    }
}

impl Default for CloudFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Formatter for CloudFormatter {
    fn mode(&self) -> EnvironmentMode {
        EnvironmentMode::Cloud
    }

    fn render(&self, payload: &Payload) -> String {
        to_compact_json(&self.fields(payload))
    }

    fn render_event(&self, payload: &Payload, _details: &Fields) -> String {
        to_compact_json(&self.fields(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LogEventKind;
    use crate::level::LogSeverity;
    use crate::location::SourceLocation;
    use crate::payload::PayloadBuilder;
    use crate::trace::TraceContext;
    use serde_json::{json, Value};

    fn payload(trace: &TraceContext, location: Option<SourceLocation>) -> Payload {
        PayloadBuilder::new("my-app", trace).build("hello", LogSeverity::Info, location, Fields::new())
    }

    #[test]
    fn human_line_with_location() {
        let trace = TraceContext::default();
        let line = HumanFormatter.render(&payload(&trace, Some(SourceLocation::new("Foo", "bar", 42))));
        assert_eq!(line, "Foo:bar:42: hello");
    }

    #[test]
    fn human_line_with_trace_and_no_location() {
        let trace = TraceContext::start(Some("t-1".into()), None);
        assert_eq!(HumanFormatter.render(&payload(&trace, None)), "[t-1] hello");

        let with_location = payload(&trace, Some(SourceLocation::without_method("app", 9)));
        assert_eq!(HumanFormatter.render(&with_location), "app:9: [t-1] hello");
    }

    #[test]
    fn human_event_appends_details_only() {
        let trace = TraceContext::default();
        let mut details = Fields::new();
        details.insert("courseId".into(), json!("CS101"));
        let p = PayloadBuilder::new("my-app", &trace)
            .build("created", LogSeverity::Info, None, details.clone())
            .with_event(LogEventKind::custom("COURSE_CREATED"));

        assert_eq!(
            HumanFormatter.render_event(&p, &details),
            "created extra_info: {\"courseId\":\"CS101\"}"
        );
    }

    #[test]
    fn cloud_record_is_plain_json() {
        let trace = TraceContext::start(Some("abc".into()), None);
        let line = CloudFormatter::new(false)
            .render(&payload(&trace, Some(SourceLocation::new("Foo", "bar", 42))));

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            parsed,
            json!({
                "message": "hello",
                "severity": "INFO",
                "logging.googleapis.com/sourceLocation": { "file": "Foo", "function": "bar", "line": 42 },
                "logging.googleapis.com/trace": "projects/my-app/traces/abc",
            })
        );
    }

    #[test]
    fn cloud_record_with_time() {
        let trace = TraceContext::default();
        let line = CloudFormatter::default().render(&payload(&trace, None));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert!(parsed["time"].as_str().unwrap().ends_with('Z'));
    }
}
