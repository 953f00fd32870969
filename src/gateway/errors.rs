//! # Gateway Errors
//!
//! Error taxonomy for statement building and execution.

use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    // ==================
    // Request rejections (nothing reached the engine)
    // ==================
    /// Table or column name outside the identifier allow-list
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Column type expression outside the type allow-list
    #[error("Invalid type expression: {0}")]
    InvalidTypeExpression(String),

    /// A map or list that must carry at least one entry was empty
    #[error("{0} must not be empty")]
    EmptyPayload(&'static str),

    // ==================
    // Outcome conditions
    // ==================
    /// Update matched zero rows
    #[error("No matching record found to update")]
    NoMatchingRecord,

    // ==================
    // Engine faults
    // ==================
    /// Anything the database (or the connection to it) rejected.
    /// Carries the engine message verbatim.
    #[error("{0}")]
    Engine(String),
}

impl GatewayError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            GatewayError::InvalidTypeExpression(_) => "INVALID_TYPE_EXPRESSION",
            GatewayError::EmptyPayload(_) => "EMPTY_PAYLOAD",
            GatewayError::NoMatchingRecord => "NOT_FOUND",
            GatewayError::Engine(_) => "ENGINE_FAULT",
        }
    }

    /// Whether the request was rejected before touching the engine
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GatewayError::InvalidIdentifier(_)
                | GatewayError::InvalidTypeExpression(_)
                | GatewayError::EmptyPayload(_)
        )
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => GatewayError::Engine(db_err.message().to_string()),
            other => GatewayError::Engine(other.to_string()),
        }
    }
}
