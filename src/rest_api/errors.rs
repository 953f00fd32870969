//! # REST API Errors
//!
//! Error types for the HTTP layer.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Body missing, not JSON, or not the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    // ==================
    // Gateway outcomes (4xx/5xx)
    // ==================
    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,

            RestError::Gateway(err) => match err {
                GatewayError::InvalidIdentifier(_)
                | GatewayError::InvalidTypeExpression(_)
                | GatewayError::EmptyPayload(_) => StatusCode::BAD_REQUEST,
                // 404 Not Found
                GatewayError::NoMatchingRecord => StatusCode::NOT_FOUND,
                // 500 Internal Server Error
                GatewayError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RestError::InvalidBody(_) => "INVALID_BODY",
            RestError::InvalidQueryParam(_) => "INVALID_QUERY_PARAM",
            RestError::Gateway(err) => err.code(),
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for RestError {
    fn from(rejection: QueryRejection) -> Self {
        RestError::InvalidQueryParam(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
