//! Environment variable names read by
//! [`LogConfig::from_env`](crate::config::LogConfig::from_env) and
//! [`init_tracing`](crate::init::init_tracing).
//!
//! These are purely helpers; the core types remain decoupled from
//! environment access.

/// `local` / `dev` / `development` or `cloud` / `production` / `prod`.
/// Defaults to local when unset.
pub const LOG_FACADE_ENVIRONMENT_ENV: &str = "LOG_FACADE_ENVIRONMENT";

/// Application id used in trace resource paths. Required in cloud mode.
pub const LOG_FACADE_APP_ID_ENV: &str = "LOG_FACADE_APP_ID";

/// `true` / `false`: whether cloud records carry a `time` field.
pub const LOG_FACADE_TIMESTAMPS_ENV: &str = "LOG_FACADE_TIMESTAMPS";

/// `tracing_subscriber::EnvFilter` directive for [`crate::init`].
pub const LOG_FACADE_FILTER_ENV: &str = "LOG_FACADE_FILTER";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
