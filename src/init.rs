use crate::config::EnvironmentMode;
use crate::env::{env_or, LOG_FACADE_FILTER_ENV};
use crate::error::InitError;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Registry};

/// Filter used when [`LOG_FACADE_FILTER_ENV`] is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the global `tracing` subscriber for records routed through
/// [`TracingSink`](crate::tracing_sink::TracingSink).
///
/// The filter directive is read from [`LOG_FACADE_FILTER_ENV`], defaulting
/// to [`DEFAULT_FILTER`].
pub fn init_tracing(mode: EnvironmentMode) -> Result<(), InitError> {
    init_tracing_with_filter(mode, &env_or(LOG_FACADE_FILTER_ENV, DEFAULT_FILTER))
}

/// Initialize the global `tracing` subscriber with an explicit
/// `EnvFilter` directive such as `"info,my_app=debug"`.
///
/// **Effects**
///
/// Installs a [`Registry`] with the filter and a `fmt` layer as the global
/// default. `ERROR` events go to stderr, everything else to stdout. In
/// [`EnvironmentMode::Cloud`] each event is printed as its bare message
/// (already a JSON record), with no time, level or field decoration.
pub fn init_tracing_with_filter(mode: EnvironmentMode, directive: &str) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(directive)?;
    let writer = std::io::stderr
        .with_max_level(Level::ERROR)
        .or_else(std::io::stdout);

    // The two layer stacks have different types, so the subscriber is
    // assembled in each branch.
    match mode {
        EnvironmentMode::Local => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(writer);
            let subscriber = Registry::default().with(filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        EnvironmentMode::Cloud => {
            let subscriber = Registry::default().with(filter).with(bare_layer(writer));
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// `fmt` layer that prints only each event's message.
pub fn bare_layer<S, W>(writer: W) -> tracing_subscriber::fmt::Layer<S, DefaultFields, BareLine, W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(BareLine)
        .with_writer(writer)
}

/// Event format that writes the message and a newline, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareLine;

impl<S, N> FormatEvent<S, N> for BareLine
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    N: for<'w> FormatFields<'w> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = None;
        event.record(&mut MessageVisitor { message: &mut message });
        writeln!(writer, "{}", message.unwrap_or_default())
    }
}

struct MessageVisitor<'a> {
    message: &'a mut Option<String>,
}

impl<'a> Visit for MessageVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogSeverity;
    use crate::record::{Channel, LogRecord};
    use crate::sink::LogSink;
    use crate::tracing_sink::TracingSink;
    use chrono::Utc;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuf {
        type Writer = SharedBuf;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn bare_layer_prints_records_verbatim() {
        let buf = SharedBuf::default();
        let subscriber = Registry::default().with(bare_layer(buf.clone()));

        let record = LogRecord {
            timestamp: Utc::now(),
            severity: LogSeverity::Warning,
            channel: Channel::Standard,
            logger: "app::jobs".into(),
            line: r#"{"message":"disk almost full","severity":"WARNING"}"#.to_string(),
        };
        tracing::subscriber::with_default(subscriber, || TracingSink.emit(&record));

        assert_eq!(buf.contents(), format!("{}\n", record.line));
    }

    #[test]
    fn invalid_filter_is_reported() {
        let err = init_tracing_with_filter(EnvironmentMode::Local, "app=notalevel").unwrap_err();
        assert!(matches!(err, InitError::Filter(_)));
    }
}
