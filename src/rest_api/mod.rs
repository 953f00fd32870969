//! # tablegate REST API Module
//!
//! HTTP endpoints for catalog and row operations, plus the unified
//! operation endpoint.

pub mod errors;
pub mod response;
pub mod server;
pub mod unified_api;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use response::SummaryParams;
pub use server::RestServer;
pub use unified_api::{OperationResponse, UnifiedApiServer};
