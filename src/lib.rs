pub mod level;
pub mod event;
pub mod location;
pub mod trace;
pub mod payload;
pub mod format;
pub mod request;
pub mod config;
pub mod error;
pub mod env;
pub mod logger;

pub mod record;
pub mod sink;
pub mod console;
pub mod memory_sink;
pub mod noop_sink;
pub mod tracing_sink;
pub mod buffered;
pub mod init;

pub use config::{EnvironmentMode, LogConfig};
pub use event::LogEventKind;
pub use level::LogSeverity;
pub use logger::Logger;
pub use payload::Fields;
