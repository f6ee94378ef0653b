//! Host-provided logging
//!
//! Messages meant for the user of the host application go through a
//! [`LoggerInterface`] held by the [`HostSession`](crate::HostSession).
//! Internal diagnostics of this workspace use `tracing` directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Environment variable read by [`SeverityFilter::from_env`]
pub const SEVERITY_ENV_VAR: &str = "ASSETIO_LOGGING_SEVERITY";

/// Message severity, from most to least verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Traces of API calls between host and manager
    DebugApi,
    Debug,
    Info,
    Progress,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const fn name(self) -> &'static str {
        match self {
            Severity::DebugApi => "debugApi",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Progress => "progress",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Map a numeric level (0 = debugApi ... 6 = critical)
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Severity::DebugApi),
            1 => Some(Severity::Debug),
            2 => Some(Severity::Info),
            3 => Some(Severity::Progress),
            4 => Some(Severity::Warning),
            5 => Some(Severity::Error),
            6 => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sink for user-facing log messages, implemented by the host.
pub trait LoggerInterface: Send + Sync {
    /// Log a message. Implementations may be called from any thread.
    fn log(&self, severity: Severity, message: &str);

    /// Whether a message of this severity would be emitted. Callers may
    /// use this to skip formatting expensive messages.
    fn is_severity_logged(&self, _severity: Severity) -> bool {
        true
    }

    fn debug_api(&self, message: &str) {
        self.log(Severity::DebugApi, message);
    }

    fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    fn progress(&self, message: &str) {
        self.log(Severity::Progress, message);
    }

    fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    fn critical(&self, message: &str) {
        self.log(Severity::Critical, message);
    }
}

// ============================================================================
// Implementations
// ============================================================================

/// Forwards messages to the `tracing` subscriber installed by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl LoggerInterface for TracingLogger {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::DebugApi => tracing::trace!(severity = %severity, "{}", message),
            Severity::Debug => tracing::debug!(severity = %severity, "{}", message),
            Severity::Info | Severity::Progress => {
                tracing::info!(severity = %severity, "{}", message)
            }
            Severity::Warning => tracing::warn!(severity = %severity, "{}", message),
            Severity::Error | Severity::Critical => {
                tracing::error!(severity = %severity, "{}", message)
            }
        }
    }
}

/// Drops messages below a minimum severity before forwarding them.
pub struct SeverityFilter {
    upstream: Arc<dyn LoggerInterface>,
    min_severity: Severity,
}

impl SeverityFilter {
    /// Default minimum severity when nothing else is configured
    pub const DEFAULT_SEVERITY: Severity = Severity::Warning;

    pub fn new(upstream: Arc<dyn LoggerInterface>, min_severity: Severity) -> Self {
        Self {
            upstream,
            min_severity,
        }
    }

    /// Build a filter whose threshold comes from `ASSETIO_LOGGING_SEVERITY`
    /// (0-6), falling back to [`Self::DEFAULT_SEVERITY`]. An unparsable value
    /// is reported to the upstream logger as a warning.
    pub fn from_env(upstream: Arc<dyn LoggerInterface>) -> Self {
        let min_severity = match std::env::var(SEVERITY_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u8>().ok().and_then(Severity::from_level) {
                Some(severity) => severity,
                None => {
                    upstream.warning(&format!(
                        "{} has an invalid value '{}': must be an integer from 0 to 6",
                        SEVERITY_ENV_VAR, raw
                    ));
                    Self::DEFAULT_SEVERITY
                }
            },
            Err(_) => Self::DEFAULT_SEVERITY,
        };
        Self::new(upstream, min_severity)
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn set_min_severity(&mut self, severity: Severity) {
        self.min_severity = severity;
    }

    pub fn upstream(&self) -> &Arc<dyn LoggerInterface> {
        &self.upstream
    }
}

impl LoggerInterface for SeverityFilter {
    fn log(&self, severity: Severity, message: &str) {
        if self.is_severity_logged(severity) {
            self.upstream.log(severity, message);
        }
    }

    fn is_severity_logged(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }
}
