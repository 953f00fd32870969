//! CLI-specific error types
//!
//! Any CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;
use std::path::Path;

use crate::gateway::GatewayError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Config file already exists
    AlreadyInitialized,
    /// Startup failed (logging, pool, listener)
    BootFailed,
    /// A one-shot gateway operation failed
    OperationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TABLEGATE_CLI_CONFIG_ERROR",
            Self::IoError => "TABLEGATE_CLI_IO_ERROR",
            Self::AlreadyInitialized => "TABLEGATE_CLI_ALREADY_INITIALIZED",
            Self::BootFailed => "TABLEGATE_CLI_BOOT_FAILED",
            Self::OperationFailed => "TABLEGATE_CLI_OPERATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Config file already present
    pub fn already_initialized(path: &Path) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Config file already exists: {}", path.display()),
        )
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<GatewayError> for CliError {
    fn from(e: GatewayError) -> Self {
        Self::new(CliErrorCode::OperationFailed, format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad port");
        assert_eq!(err.to_string(), "TABLEGATE_CLI_CONFIG_ERROR: bad port");
    }

    #[test]
    fn test_gateway_error_conversion() {
        let err = CliError::from(GatewayError::Engine("connection refused".into()));
        assert_eq!(err.code(), &CliErrorCode::OperationFailed);
        assert_eq!(err.message(), "ENGINE_FAULT: connection refused");
    }
}
