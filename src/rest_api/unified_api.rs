//! # Unified REST API
//!
//! Single operation endpoint accepting any [`Operation`] as a tagged JSON
//! object, answering in one envelope shape.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::gateway::{Operation, OperationOutput, TableGateway};

use super::errors::RestError;

/// Unified operation response
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// The operation result data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OperationOutput>,

    /// Error information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Unified error information
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    /// Error code
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// HTTP status code
    pub status: u16,
}

impl OperationResponse {
    pub fn success(data: OperationOutput) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(err: &RestError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorInfo {
                code: err.code().to_string(),
                message: err.to_string(),
                status: err.status_code().as_u16(),
            }),
        }
    }
}

/// Unified API server state
pub struct UnifiedApiServer {
    gateway: TableGateway,
}

impl UnifiedApiServer {
    pub fn new(gateway: TableGateway) -> Self {
        Self { gateway }
    }

    /// Build the Axum router
    ///
    /// Provides a single endpoint: `POST /api/v1/operation`
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/api/v1/operation", post(execute_operation))
            .with_state(state)
    }
}

/// Shared state type
type ServerState = Arc<UnifiedApiServer>;

/// Execute any operation through the unified endpoint
async fn execute_operation(
    State(server): State<ServerState>,
    request: Result<Json<Operation>, JsonRejection>,
) -> (StatusCode, Json<OperationResponse>) {
    let operation = match request {
        Ok(Json(operation)) => operation,
        Err(rejection) => return failure(RestError::from(rejection)),
    };

    tracing::debug!(op = operation.name(), table = operation.table(), "unified operation");

    match operation.dispatch(&server.gateway).await {
        Ok(data) => (StatusCode::OK, Json(OperationResponse::success(data))),
        Err(err) => failure(RestError::from(err)),
    }
}

fn failure(err: RestError) -> (StatusCode, Json<OperationResponse>) {
    (err.status_code(), Json(OperationResponse::error(&err)))
}
