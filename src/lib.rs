//! tablegate - a schema-agnostic HTTP gateway for Postgres catalog and
//! row operations

pub mod cli;
pub mod gateway;
pub mod http_server;
pub mod observability;
pub mod rest_api;
