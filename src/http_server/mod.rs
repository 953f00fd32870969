//! # tablegate HTTP Server Module
//!
//! Assembles the gateway's routers into one Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Liveness
//! - `/tables/*` - Catalog and row operations
//! - `/api/v1/operation` - Unified operation endpoint

pub mod config;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use health_routes::HealthResponse;
pub use server::{shutdown_signal, HttpServer};
