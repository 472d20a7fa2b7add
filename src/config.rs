use crate::env::{LOG_FACADE_APP_ID_ENV, LOG_FACADE_ENVIRONMENT_ENV, LOG_FACADE_TIMESTAMPS_ENV};
use crate::error::ConfigError;
use crate::format::{CloudFormatter, Formatter, HumanFormatter};
use crate::sink::Channels;
use std::str::FromStr;
use std::sync::Arc;

/// Application id used when running locally without one configured.
pub const LOCAL_APP_ID: &str = "local";

/// Where the process runs, which decides how log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentMode {
    /// Developer machine: human-readable console lines.
    #[default]
    Local,
    /// Deployed: structured JSON for the cloud log collector.
    Cloud,
}

impl EnvironmentMode {
    pub fn is_local(&self) -> bool {
        matches!(self, EnvironmentMode::Local)
    }

    /// The rendering strategy for this mode.
    pub fn formatter(&self, include_time: bool) -> Arc<dyn Formatter> {
        match self {
            EnvironmentMode::Local => Arc::new(HumanFormatter),
            EnvironmentMode::Cloud => Arc::new(CloudFormatter::new(include_time)),
        }
    }
}

impl FromStr for EnvironmentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(EnvironmentMode::Local),
            "cloud" | "production" | "prod" => Ok(EnvironmentMode::Cloud),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

/// Shared logging configuration: the application id, the rendering strategy
/// and the two output channels.
///
/// Built once at process start and shared by every
/// [`Logger`](crate::logger::Logger) through an `Arc`.
#[derive(Clone)]
pub struct LogConfig {
    app_id: String,
    formatter: Arc<dyn Formatter>,
    channels: Channels,
}

impl LogConfig {
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }

    /// Build from the process environment, with console channels.
    ///
    /// See [`crate::env`] for the variables read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(LOG_FACADE_ENVIRONMENT_ENV) {
            Some(value) => value.parse()?,
            None => EnvironmentMode::default(),
        };
        let include_time = match lookup(LOG_FACADE_TIMESTAMPS_ENV) {
            Some(value) => parse_flag(LOG_FACADE_TIMESTAMPS_ENV, &value)?,
            None => true,
        };

        let mut builder = Self::builder().mode(mode).include_time(include_time);
        if let Some(app_id) = lookup(LOG_FACADE_APP_ID_ENV).filter(|id| !id.is_empty()) {
            builder = builder.app_id(app_id);
        }
        builder.build()
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn mode(&self) -> EnvironmentMode {
        self.formatter.mode()
    }

    pub fn formatter(&self) -> &dyn Formatter {
        &*self.formatter
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }
}

impl std::fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogConfig")
            .field("app_id", &self.app_id)
            .field("mode", &self.mode())
            .field("channels", &self.channels)
            .finish()
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}

/// Builder for [`LogConfig`].
///
/// **Defaults**
/// - mode: [`EnvironmentMode::Local`]
/// - `include_time`: `true` (cloud records carry a `time` field)
/// - channels: [`Channels::console`]
/// - app id: [`LOCAL_APP_ID`] in local mode, required in cloud mode
pub struct LogConfigBuilder {
    app_id: Option<String>,
    mode: EnvironmentMode,
    include_time: bool,
    formatter: Option<Arc<dyn Formatter>>,
    channels: Option<Channels>,
}

impl Default for LogConfigBuilder {
    fn default() -> Self {
        Self {
            app_id: None,
            mode: EnvironmentMode::default(),
            include_time: true,
            formatter: None,
            channels: None,
        }
    }
}

impl LogConfigBuilder {
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn mode(mut self, mode: EnvironmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn include_time(mut self, include_time: bool) -> Self {
        self.include_time = include_time;
        self
    }

    /// Use a custom rendering strategy instead of the one picked from the
    /// mode. The formatter's own [`Formatter::mode`] then decides whether an
    /// app id is required.
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn channels(mut self, channels: Channels) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn build(self) -> Result<LogConfig, ConfigError> {
        let formatter = self
            .formatter
            .unwrap_or_else(|| self.mode.formatter(self.include_time));

        let app_id = match (self.app_id, formatter.mode()) {
            (Some(app_id), _) => app_id,
            (None, EnvironmentMode::Local) => LOCAL_APP_ID.to_string(),
            (None, EnvironmentMode::Cloud) => return Err(ConfigError::MissingAppId),
        };

        let config = LogConfig {
            app_id,
            formatter,
            channels: self.channels.unwrap_or_default(),
        };
        tracing::debug!(app_id = %config.app_id, mode = ?config.mode(), "log facade configured");
        Ok(config)
    }
}
