//! The logging facade used by application code.
//!
//! ```ignore
//! use cloud_log_facade::{logger, log_info, LogConfig};
//! use std::sync::Arc;
//!
//! let config = Arc::new(LogConfig::from_env()?);
//! let log = logger!(config);
//! log.info("starting up");
//! log_info!(log, "loaded {} courses", 12);
//! ```

use crate::config::LogConfig;
use crate::event::LogEventKind;
use crate::level::LogSeverity;
use crate::location::SourceLocation;
use crate::payload::{Fields, Payload, PayloadBuilder};
use crate::record::{Channel, LogRecord};
use crate::request::{RequestContext, RequestDetails};
use crate::trace::{TraceContext, TraceContextReader};
use std::borrow::Cow;
use std::sync::Arc;

/// Logger bound to the code that created it.
///
/// Holds the shared [`LogConfig`] (formatter and the standard/error
/// channels) and the trace context of the current request. Cloning is
/// cheap; create one per module, or per request with
/// [`Logger::with_trace`].
///
/// The bound origin only names the logger and its channels. Each entry is
/// attributed to the code that makes the call, wherever the logger was
/// created. Prefer the [`log_fine!`](crate::log_fine),
/// [`log_info!`](crate::log_info), [`log_warning!`](crate::log_warning),
/// [`log_severe!`](crate::log_severe) and [`log_event!`](crate::log_event)
/// macros: they record `Type:method:line`. The plain methods
/// ([`Logger::info`] and friends) only know the calling file and line and
/// render as `src/file.rs:line:`.
///
/// No operation fails or panics because context is missing: without a
/// trace the entry is uncorrelated, without a location the location is
/// left out.
#[derive(Clone)]
pub struct Logger {
    origin: Cow<'static, str>,
    config: Arc<LogConfig>,
    trace: Arc<dyn TraceContextReader>,
}

impl Logger {
    /// Create a logger attributed to `origin`, usually the module path.
    /// The [`logger!`](crate::logger) macro fills it in.
    pub fn new(origin: impl Into<Cow<'static, str>>, config: Arc<LogConfig>) -> Self {
        Self {
            origin: origin.into(),
            config,
            trace: Arc::new(TraceContext::default()),
        }
    }

    /// Copy of this logger that correlates entries with `trace`.
    pub fn with_trace(&self, trace: Arc<dyn TraceContextReader>) -> Self {
        Self {
            origin: self.origin.clone(),
            config: Arc::clone(&self.config),
            trace,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn trace(&self) -> &dyn TraceContextReader {
        &*self.trace
    }

    /// Log at DEBUG on the standard channel.
    #[track_caller]
    pub fn fine(&self, message: &str) {
        self.log_at(LogSeverity::Debug, Some(SourceLocation::caller()), message);
    }

    /// Log at INFO on the standard channel.
    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log_at(LogSeverity::Info, Some(SourceLocation::caller()), message);
    }

    /// Log at WARNING on the standard channel.
    #[track_caller]
    pub fn warning(&self, message: &str) {
        self.log_at(LogSeverity::Warning, Some(SourceLocation::caller()), message);
    }

    /// Log at ERROR on the error channel.
    #[track_caller]
    pub fn severe(&self, message: &str) {
        self.log_at(LogSeverity::Error, Some(SourceLocation::caller()), message);
    }

    pub fn fine_at(&self, location: Option<SourceLocation>, message: &str) {
        self.log_at(LogSeverity::Debug, location, message);
    }

    pub fn info_at(&self, location: Option<SourceLocation>, message: &str) {
        self.log_at(LogSeverity::Info, location, message);
    }

    pub fn warning_at(&self, location: Option<SourceLocation>, message: &str) {
        self.log_at(LogSeverity::Warning, location, message);
    }

    pub fn severe_at(&self, location: Option<SourceLocation>, message: &str) {
        self.log_at(LogSeverity::Error, location, message);
    }

    /// Log a plain message with an explicit location.
    pub fn log_at(&self, severity: LogSeverity, location: Option<SourceLocation>, message: &str) {
        let payload = self.builder().build(message, severity, location, Fields::new());
        let line = self.config.formatter().render(&payload);
        self.emit(&payload, line);
    }

    /// Log a structured event at INFO on the standard channel.
    ///
    /// Locally this renders as the human line followed by
    /// `extra_info: <details as JSON>`; in the cloud the details are merged
    /// into the record and `event` is set to `kind`.
    #[track_caller]
    pub fn event(&self, kind: LogEventKind, message: &str, details: Fields) {
        self.event_at(Some(SourceLocation::caller()), kind, message, details);
    }

    pub fn event_at(
        &self,
        location: Option<SourceLocation>,
        kind: LogEventKind,
        message: &str,
        details: Fields,
    ) {
        let payload = self
            .builder()
            .build(message, LogSeverity::Info, location, details)
            .with_event(kind);
        let line = self.config.formatter().render_event(&payload, &payload.extra);
        self.emit(&payload, line);
    }

    /// Log one handled HTTP request as a [`LogEventKind::RequestLog`] event.
    ///
    /// The message becomes `[<status>] [<elapsed>ms] [<method> <url>] <message>`.
    /// If the request carries a registration key parameter and `user_info`
    /// has no `regkey` yet, it is added to `user_info`; see
    /// [`RequestDetails::extract`].
    #[track_caller]
    pub fn request(
        &self,
        request: &dyn RequestContext,
        status: u16,
        message: &str,
        user_info: &mut Fields,
        extra_info: Fields,
    ) {
        self.request_at(Some(SourceLocation::caller()), request, status, message, user_info, extra_info);
    }

    pub fn request_at(
        &self,
        location: Option<SourceLocation>,
        request: &dyn RequestContext,
        status: u16,
        message: &str,
        user_info: &mut Fields,
        extra_info: Fields,
    ) {
        let elapsed = self.trace.elapsed_millis().unwrap_or(0);
        let include_cookies = self.config.mode().is_local();
        let RequestDetails { summary, details } = RequestDetails::extract(
            request,
            status,
            elapsed,
            message,
            user_info,
            extra_info,
            include_cookies,
        );

        self.event_at(location, LogEventKind::RequestLog, &summary, details);
    }

    fn builder(&self) -> PayloadBuilder<'_> {
        PayloadBuilder::new(self.config.app_id(), &*self.trace)
    }

    fn emit(&self, payload: &Payload, line: String) {
        let channel = Channel::for_severity(payload.severity);
        let record = LogRecord {
            timestamp: payload.timestamp,
            severity: payload.severity,
            channel,
            logger: self.origin.clone(),
            line,
        };
        self.config.channels().get(channel).emit(&record);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("origin", &self.origin)
            .field("mode", &self.config.mode())
            .field("trace_id", &self.trace.trace_id())
            .finish()
    }
}

/// Create a [`Logger`] bound to the current module from an
/// `Arc<LogConfig>`.
#[macro_export]
macro_rules! logger {
    ($config:expr) => {
        $crate::logger::Logger::new(::std::module_path!(), ::std::sync::Arc::clone(&$config))
    };
}

/// Log at DEBUG with the enclosing function as location.
#[macro_export]
macro_rules! log_fine {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at(
            $crate::level::LogSeverity::Debug,
            ::std::option::Option::Some($crate::here!()),
            &::std::format!($($arg)+),
        )
    };
}

/// Log at INFO with the enclosing function as location.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at(
            $crate::level::LogSeverity::Info,
            ::std::option::Option::Some($crate::here!()),
            &::std::format!($($arg)+),
        )
    };
}

/// Log at WARNING with the enclosing function as location.
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at(
            $crate::level::LogSeverity::Warning,
            ::std::option::Option::Some($crate::here!()),
            &::std::format!($($arg)+),
        )
    };
}

/// Log at ERROR on the error channel with the enclosing function as location.
#[macro_export]
macro_rules! log_severe {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_at(
            $crate::level::LogSeverity::Error,
            ::std::option::Option::Some($crate::here!()),
            &::std::format!($($arg)+),
        )
    };
}

/// Log a structured event with the enclosing function as location:
/// `log_event!(log, kind, details, "format", args...)`.
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $kind:expr, $details:expr, $($arg:tt)+) => {
        $logger.event_at(
            ::std::option::Option::Some($crate::here!()),
            $kind,
            &::std::format!($($arg)+),
            $details,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentMode;
    use crate::memory_sink::MemorySink;
    use crate::request::RequestSnapshot;
    use crate::sink::Channels;
    use serde_json::{json, Value};

    struct FixedTrace {
        trace_id: Option<&'static str>,
        elapsed: u64,
    }

    impl TraceContextReader for FixedTrace {
        fn trace_id(&self) -> Option<&str> {
            self.trace_id
        }

        fn span_id(&self) -> Option<&str> {
            None
        }

        fn elapsed_millis(&self) -> Option<u64> {
            Some(self.elapsed)
        }
    }

    struct Harness {
        log: Logger,
        standard: MemorySink,
        error: MemorySink,
    }

    fn harness(mode: EnvironmentMode) -> Harness {
        let standard = MemorySink::new();
        let error = MemorySink::new();
        let config = LogConfig::builder()
            .mode(mode)
            .app_id("teammates")
            .include_time(false)
            .channels(Channels::new(Arc::new(standard.clone()), Arc::new(error.clone())))
            .build()
            .unwrap();
        Harness {
            log: Logger::new("app::courses", Arc::new(config)),
            standard,
            error,
        }
    }

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn local_info_with_resolved_caller() {
        let h = harness(EnvironmentMode::Local);
        h.log.info_at(Some(SourceLocation::new("Foo", "bar", 42)), "hello");
        assert_eq!(h.standard.lines(), vec!["Foo:bar:42: hello"]);
    }

    #[test]
    fn local_leveled_lines_name_the_calling_file() {
        let h = harness(EnvironmentMode::Local);
        h.log.fine("one");
        let line = line!() - 1;
        h.log.info("two");
        h.log.warning("three");

        let lines = h.standard.lines();
        assert_eq!(lines[0], format!("{}:{}: one", file!(), line));
        assert_eq!(lines[1], format!("{}:{}: two", file!(), line + 2));
        assert!(lines.iter().all(|l| !l.starts_with("app::courses")));
        assert!(h.error.is_empty());
    }

    #[test]
    fn cloud_leveled_record_from_plain_method() {
        let h = harness(EnvironmentMode::Cloud);
        h.log.info("plain");
        let line = line!() - 1;

        let out = parse(&h.standard.lines()[0]);
        assert_eq!(
            out["logging.googleapis.com/sourceLocation"],
            json!({ "file": file!(), "line": line })
        );
        assert_eq!(h.standard.records()[0].channel_name(), "app::courses-out");
    }

    #[test]
    fn missing_location_renders_without_prefix() {
        let h = harness(EnvironmentMode::Local);
        h.log.warning_at(None, "no frame");
        assert_eq!(h.standard.lines(), vec!["no frame"]);
    }

    #[test]
    fn local_line_carries_trace_id() {
        let h = harness(EnvironmentMode::Local);
        let log = h.log.with_trace(Arc::new(FixedTrace { trace_id: Some("t-9"), elapsed: 0 }));
        log.info_at(Some(SourceLocation::new("Foo", "bar", 1)), "hello");
        assert_eq!(h.standard.lines(), vec!["Foo:bar:1: [t-9] hello"]);
    }

    #[test]
    fn severe_goes_to_error_channel_in_both_modes() {
        for mode in [EnvironmentMode::Local, EnvironmentMode::Cloud] {
            let h = harness(mode);
            h.log.severe("boom");
            assert!(h.standard.is_empty());
            let records = h.error.records();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].channel, Channel::Error);
            assert_eq!(records[0].channel_name(), "app::courses-err");
            assert!(records[0].line.contains("boom"));
        }
    }

    #[test]
    fn cloud_leveled_record() {
        let h = harness(EnvironmentMode::Cloud);
        h.log.fine_at(Some(SourceLocation::new("Foo", "bar", 42)), "hello");
        assert_eq!(
            parse(&h.standard.lines()[0]),
            json!({
                "message": "hello",
                "severity": "DEBUG",
                "logging.googleapis.com/sourceLocation": { "file": "Foo", "function": "bar", "line": 42 },
            })
        );
    }

    #[test]
    fn cloud_event_trace_correlation() {
        let h = harness(EnvironmentMode::Cloud);
        let traced = h.log.with_trace(Arc::new(FixedTrace { trace_id: Some("abc123"), elapsed: 0 }));
        traced.event(LogEventKind::EmailSent, "sent", Fields::new());
        h.log.event(LogEventKind::EmailSent, "sent", Fields::new());

        let lines = h.standard.lines();
        let with_trace = parse(&lines[0]);
        assert!(with_trace["logging.googleapis.com/trace"]
            .as_str()
            .unwrap()
            .ends_with("abc123"));
        assert_eq!(with_trace["event"], json!("EMAIL_SENT"));

        let without = parse(&lines[1]);
        assert!(without.get("logging.googleapis.com/trace").is_none());
    }

    #[test]
    fn reserved_keys_win_on_collision() {
        let h = harness(EnvironmentMode::Cloud);
        let mut details = Fields::new();
        details.insert("severity".into(), json!("bogus"));
        details.insert("event".into(), json!("NOT_IT"));
        h.log.event(LogEventKind::custom("AUDIT"), "m", details);

        let out = parse(&h.standard.lines()[0]);
        assert_eq!(out["severity"], json!("INFO"));
        assert_eq!(out["event"], json!("AUDIT"));
        assert_eq!(out["message"], json!("m"));
    }

    #[test]
    fn local_event_is_hybrid() {
        let h = harness(EnvironmentMode::Local);
        let mut details = Fields::new();
        details.insert("courseId".into(), json!("CS101"));
        h.log.event_at(None, LogEventKind::custom("COURSE_CREATED"), "created", details);
        assert_eq!(h.standard.lines(), vec![r#"created extra_info: {"courseId":"CS101"}"#]);
    }

    #[test]
    fn request_summary_and_event() {
        let h = harness(EnvironmentMode::Cloud);
        let log = h.log.with_trace(Arc::new(FixedTrace { trace_id: None, elapsed: 5 }));
        let req = RequestSnapshot::new("GET", "/x");

        log.request(&req, 200, "ok", &mut Fields::new(), Fields::new());

        let out = parse(&h.standard.lines()[0]);
        assert_eq!(out["message"], json!("[200] [5ms] [GET /x] ok"));
        assert_eq!(out["event"], json!("REQUEST_LOG"));
        assert_eq!(out["severity"], json!("INFO"));
        assert_eq!(out["responseStatus"], json!(200));
        assert_eq!(out["responseTime"], json!(5));
        assert_eq!(out["userInfo"], json!({}));
    }

    #[test]
    fn request_regkey_insert_if_absent_is_idempotent() {
        let h = harness(EnvironmentMode::Local);
        let req = RequestSnapshot::new("GET", "/join?key=reg-1");
        let mut user_info = Fields::new();

        h.log.request(&req, 200, "ok", &mut user_info, Fields::new());
        assert_eq!(user_info["regkey"], json!("reg-1"));

        h.log.request(&req, 200, "ok", &mut user_info, Fields::new());
        assert_eq!(user_info.len(), 1);
        assert_eq!(user_info["regkey"], json!("reg-1"));

        let mut existing = Fields::new();
        existing.insert("regkey".into(), json!("mine"));
        h.log.request(&req, 200, "ok", &mut existing, Fields::new());
        assert_eq!(existing["regkey"], json!("mine"));
    }

    #[test]
    fn local_request_without_elapsed_time() {
        let h = harness(EnvironmentMode::Local);
        let req = RequestSnapshot::new("POST", "/webapi/session");
        h.log.request_at(None, &req, 201, "created", &mut Fields::new(), Fields::new());

        let line = &h.standard.lines()[0];
        assert!(line.starts_with("[201] [0ms] [POST /webapi/session] created extra_info: {"));
    }

    #[test]
    fn macros_capture_enclosing_function() {
        let h = harness(EnvironmentMode::Local);
        crate::log_info!(h.log, "loaded {} courses", 3);
        let line = line!() - 1;
        crate::log_severe!(h.log, "failed");

        assert_eq!(
            h.standard.lines(),
            vec![format!(
                "cloud_log_facade::logger::tests:macros_capture_enclosing_function:{}: loaded 3 courses",
                line
            )]
        );
        assert_eq!(h.error.len(), 1);
    }

    #[test]
    fn log_event_macro() {
        let h = harness(EnvironmentMode::Cloud);
        let mut details = Fields::new();
        details.insert("to".into(), json!("alice@example.com"));
        crate::log_event!(h.log, LogEventKind::EmailSent, details, "mail #{}", 7);

        let out = parse(&h.standard.lines()[0]);
        assert_eq!(out["message"], json!("mail #7"));
        assert_eq!(out["to"], json!("alice@example.com"));
        assert_eq!(
            out["logging.googleapis.com/sourceLocation"]["function"],
            json!("log_event_macro")
        );
    }

    #[test]
    fn logger_macro_binds_module_path() {
        let config = Arc::new(
            LogConfig::builder()
                .channels(Channels::shared(Arc::new(MemorySink::new())))
                .build()
                .unwrap(),
        );
        let log = crate::logger!(config);
        assert_eq!(log.origin(), "cloud_log_facade::logger::tests");
    }
}
