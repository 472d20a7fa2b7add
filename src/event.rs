use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Category of a structured event logged through [`Logger::event`].
///
/// The facade never interprets the kind; it is written verbatim into the
/// `event` field of cloud records. Applications that need categories beyond
/// the built-in ones use [`LogEventKind::Custom`].
///
/// [`Logger::event`]: crate::logger::Logger::event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogEventKind {
    /// One handled HTTP request, emitted by [`Logger::request`](crate::logger::Logger::request).
    RequestLog,
    ExceptionLog,
    EmailSent,
    FeedbackSessionAudit,
    /// Application-defined kind. Should be SCREAMING_SNAKE_CASE to match the
    /// built-in names.
    Custom(Cow<'static, str>),
}

impl LogEventKind {
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        LogEventKind::Custom(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            LogEventKind::RequestLog => "REQUEST_LOG",
            LogEventKind::ExceptionLog => "EXCEPTION_LOG",
            LogEventKind::EmailSent => "EMAIL_SENT",
            LogEventKind::FeedbackSessionAudit => "FEEDBACK_SESSION_AUDIT",
            LogEventKind::Custom(name) => &**name,
        }
    }
}

impl fmt::Display for LogEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LogEventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
