//! Logging setup, powered by tracing-subscriber
//!
//! One subscriber is installed per process. `RUST_LOG`, when set, replaces
//! the configured level entirely.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text: timestamp LEVEL target fields
    Compact,
    /// JSON Lines
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" | "jsonl" => Ok(LogFormat::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Unknown log format '{0}' (expected compact or json)")]
    UnknownFormat(String),

    #[error("Invalid tracing filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Base level plus quieter defaults for chatty dependencies
pub fn build_env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let mut directives = vec![level.to_string()];

    let noisy: &[(&str, &str)] = &[
        ("sqlx", "warn"),
        ("hyper", "warn"),
        ("h2", "warn"),
        ("rustls", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter = directives.join(",");
    EnvFilter::try_new(&filter).map_err(|e| LoggingError::InvalidFilter {
        filter,
        reason: e.to_string(),
    })
}

/// Install the global subscriber. Logs go to stderr so `exec` and the
/// other one-shot commands keep stdout for their JSON output.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_env_filter(level)?,
    };

    let layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
