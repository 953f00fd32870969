//! # HTTP Server
//!
//! Combines the health, REST and unified routers behind CORS and request
//! tracing, and serves them until a shutdown signal arrives.

use std::future::Future;
use std::io;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::gateway::TableGateway;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::rest_api::{RestServer, UnifiedApiServer};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;

/// HTTP server for the table gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, gateway: TableGateway) -> Self {
        let router = Self::build_router(&config, gateway);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, gateway: TableGateway) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(RestServer::new(gateway.clone()).router())
            .merge(UnifiedApiServer::new(gateway).router())
            .layer(TraceLayer::new_for_http())
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C or SIGTERM, then finish in-flight requests
    pub async fn start(self) -> io::Result<()> {
        self.start_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves
    pub async fn start_with_shutdown<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr()?).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::Serving, &[("addr", &bound)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log_event(Event::ShutdownStart);
}
