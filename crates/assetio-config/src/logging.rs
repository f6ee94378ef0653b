//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable overriding the configured log format
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Initialize the tracing subscriber for a host process
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Output always goes to stderr. Returns `false` if a global subscriber
/// was already installed, in which case nothing changes.
///
/// # Examples
///
/// ```bash
/// # Debug logging for the facade only
/// RUST_LOG=assetio_host=debug ./my-host
///
/// # JSON logs
/// LOG_FORMAT=json ./my-host
/// ```
pub fn initialize(config: &AppConfig) -> bool {
    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);

    // RUST_LOG takes precedence over config
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let format = format_override(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
        .unwrap_or(config.logging.format);

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "Tracing subscriber already installed");
            false
        }
    }
}

fn format_override(value: Option<&str>) -> Option<LogFormat> {
    match value?.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}
