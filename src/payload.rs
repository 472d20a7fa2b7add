//! Assembly of a single structured log entry.

use crate::event::LogEventKind;
use crate::level::LogSeverity;
use crate::location::SourceLocation;
use crate::trace::TraceContextReader;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Caller-supplied structured data attached to a log entry.
pub type Fields = serde_json::Map<String, Value>;

/// Field names owned by the facade. Downstream log consumers parse these,
/// so they must not change.
pub mod keys {
    pub const MESSAGE: &str = "message";
    pub const SEVERITY: &str = "severity";
    pub const EVENT: &str = "event";
    pub const TIME: &str = "time";
    pub const SOURCE_LOCATION: &str = "logging.googleapis.com/sourceLocation";
    pub const TRACE: &str = "logging.googleapis.com/trace";
    pub const SPAN_ID: &str = "logging.googleapis.com/spanId";

    pub const LOCATION_FILE: &str = "file";
    pub const LOCATION_FUNCTION: &str = "function";
    pub const LOCATION_LINE: &str = "line";

    pub(crate) const RESERVED: [&str; 7] =
        [MESSAGE, SEVERITY, EVENT, TIME, SOURCE_LOCATION, TRACE, SPAN_ID];
}

/// One log entry before rendering.
#[derive(Debug, Clone)]
pub struct Payload {
    pub message: String,
    pub severity: LogSeverity,
    pub location: Option<SourceLocation>,
    /// Raw trace id, shown in human output.
    pub trace_id: Option<String>,
    /// Trace id qualified as a cloud resource path.
    pub trace: Option<String>,
    pub span_id: Option<String>,
    pub event: Option<LogEventKind>,
    pub extra: Fields,
    pub timestamp: DateTime<Utc>,
}

impl Payload {
    pub fn with_event(mut self, kind: LogEventKind) -> Self {
        self.event = Some(kind);
        self
    }

    /// Flatten into the structured record shape.
    ///
    /// Extra fields go in first and every reserved key is then removed and
    /// rewritten by the facade, so a caller can never clobber a reserved key.
    /// `time` is not written here; see [`Payload::to_fields_with_time`].
    pub fn to_fields(&self) -> Fields {
        let mut fields = self.extra.clone();
        for key in keys::RESERVED {
            fields.remove(key);
        }

        fields.insert(keys::MESSAGE.into(), Value::from(self.message.as_str()));
        fields.insert(keys::SEVERITY.into(), Value::from(self.severity.as_str()));

        if let Some(location) = &self.location {
            let mut source = Fields::new();
            source.insert(keys::LOCATION_FILE.into(), Value::from(&*location.type_name));
            if let Some(method) = &location.method_name {
                source.insert(keys::LOCATION_FUNCTION.into(), Value::from(&**method));
            }
            source.insert(keys::LOCATION_LINE.into(), Value::from(location.line));
            fields.insert(keys::SOURCE_LOCATION.into(), Value::Object(source));
        }

        if let Some(trace) = &self.trace {
            fields.insert(keys::TRACE.into(), Value::from(trace.as_str()));
        }
        if let Some(span_id) = &self.span_id {
            fields.insert(keys::SPAN_ID.into(), Value::from(span_id.as_str()));
        }
        if let Some(event) = &self.event {
            fields.insert(keys::EVENT.into(), Value::from(event.as_str()));
        }

        fields
    }

    /// Same as [`Payload::to_fields`] plus the RFC 3339 `time` field.
    pub fn to_fields_with_time(&self) -> Fields {
        let mut fields = self.to_fields();
        fields.insert(
            keys::TIME.into(),
            Value::from(
                self.timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
        );
        fields
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_fields().serialize(serializer)
    }
}

/// Composes [`Payload`]s for one logger, reading trace correlation from the
/// logger's current [`TraceContextReader`].
pub struct PayloadBuilder<'a> {
    app_id: &'a str,
    trace: &'a dyn TraceContextReader,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(app_id: &'a str, trace: &'a dyn TraceContextReader) -> Self {
        Self { app_id, trace }
    }

    pub fn build(
        &self,
        message: &str,
        severity: LogSeverity,
        location: Option<SourceLocation>,
        extra: Fields,
    ) -> Payload {
        let trace_id = self.trace.trace_id().map(str::to_string);
        let trace = trace_id
            .as_deref()
            .map(|id| format!("projects/{}/traces/{}", self.app_id, id));

        Payload {
            message: message.to_string(),
            severity,
            location,
            trace_id,
            trace,
            span_id: self.trace.span_id().map(str::to_string),
            event: None,
            extra,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceContext;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn minimal_payload_has_message_and_severity_only() {
        let trace = TraceContext::default();
        let payload = PayloadBuilder::new("my-app", &trace).build(
            "hello",
            LogSeverity::Debug,
            None,
            Fields::new(),
        );

        assert_eq!(
            Value::Object(payload.to_fields()),
            json!({ "message": "hello", "severity": "DEBUG" })
        );
    }

    #[test]
    fn location_and_trace_fields() {
        let trace = TraceContext::start(Some("abc".into()), Some("7".into()));
        let payload = PayloadBuilder::new("my-app", &trace).build(
            "hello",
            LogSeverity::Info,
            Some(SourceLocation::new("Foo", "bar", 42)),
            Fields::new(),
        );

        let out = payload.to_fields();
        assert_eq!(out[keys::TRACE], json!("projects/my-app/traces/abc"));
        assert_eq!(out[keys::SPAN_ID], json!("7"));
        assert_eq!(
            out[keys::SOURCE_LOCATION],
            json!({ "file": "Foo", "function": "bar", "line": 42 })
        );
        assert_eq!(payload.trace_id.as_deref(), Some("abc"));
    }

    #[test]
    fn unknown_method_omits_function() {
        let trace = TraceContext::default();
        let payload = PayloadBuilder::new("my-app", &trace).build(
            "hello",
            LogSeverity::Info,
            Some(SourceLocation::without_method("app::jobs", 3)),
            Fields::new(),
        );
        assert_eq!(
            payload.to_fields()[keys::SOURCE_LOCATION],
            json!({ "file": "app::jobs", "line": 3 })
        );
    }

    #[test]
    fn reserved_keys_win_over_extra_fields() {
        let trace = TraceContext::default();
        let extra = fields(json!({
            "severity": "bogus",
            "message": "overridden?",
            "logging.googleapis.com/trace": "projects/evil/traces/1",
            "courseId": "CS101",
        }));
        let payload = PayloadBuilder::new("my-app", &trace)
            .build("real", LogSeverity::Info, None, extra)
            .with_event(LogEventKind::EmailSent);

        let out = payload.to_fields();
        assert_eq!(out["severity"], json!("INFO"));
        assert_eq!(out["message"], json!("real"));
        assert_eq!(out["event"], json!("EMAIL_SENT"));
        assert_eq!(out["courseId"], json!("CS101"));
        assert!(!out.contains_key(keys::TRACE));
    }

    #[test]
    fn time_is_only_written_on_request() {
        let trace = TraceContext::default();
        let payload =
            PayloadBuilder::new("my-app", &trace).build("m", LogSeverity::Info, None, Fields::new());
        assert!(!payload.to_fields().contains_key(keys::TIME));
        assert!(payload.to_fields_with_time()[keys::TIME].is_string());
    }
}
