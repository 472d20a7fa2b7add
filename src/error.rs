/// Error returned when building a [`LogConfig`](crate::config::LogConfig).
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment mode {0:?}, expected `local` or `cloud`")]
    InvalidEnvironment(String),

    #[error("an application id is required in cloud mode")]
    MissingAppId,

    #[error("invalid boolean {value:?} for {key}")]
    InvalidFlag { key: &'static str, value: String },
}

/// Error returned when installing the global `tracing` subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid log filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}
