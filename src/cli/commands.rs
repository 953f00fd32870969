//! CLI command implementations
//!
//! Startup order: load config, init logging, connect the pool (fail fast),
//! build the gateway, then serve or run one operation. The pool is closed
//! on the way out of every command that opened it.

use std::path::Path;

use serde_json::json;

use crate::gateway::{GatewayError, Operation, TableGateway};
use crate::http_server::HttpServer;
use crate::observability::{init_logging, log_event, log_event_with_fields, Event};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_json, write_response};

/// Parse arguments and run
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve {
            config,
            port,
            database_url,
        } => serve(&config, port, database_url),
        Command::Tables {
            config,
            database_url,
        } => tables(&config, database_url),
        Command::Summary {
            config,
            counts,
            database_url,
        } => summary(&config, counts, database_url),
        Command::Exec {
            config,
            database_url,
        } => exec(&config, database_url),
    }
}

/// Write a default config file. Refuses to overwrite.
pub fn init(config_path: &Path) -> CliResult<()> {
    Config::template().write_new(config_path)?;
    log_event_with_fields(
        Event::ConfigWritten,
        &[("path", &config_path.display().to_string())],
    );
    write_response(&json!({ "config": config_path.display().to_string() }))
}

/// Serve HTTP until Ctrl-C or SIGTERM, then close the pool
pub fn serve(config_path: &Path, port: Option<u16>, database_url: Option<String>) -> CliResult<()> {
    let mut config = boot(config_path, database_url)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let rt = runtime()?;
    rt.block_on(async {
        let gateway = connect(&config).await?;
        log_event(Event::BootComplete);

        let server = HttpServer::new(config.http.clone(), gateway.clone());
        let served = server.start().await;

        gateway.close().await;
        log_event(Event::PoolClosed);
        log_event(Event::ShutdownComplete);

        served.map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the table list
pub fn tables(config_path: &Path, database_url: Option<String>) -> CliResult<()> {
    let config = boot(config_path, database_url)?;
    one_shot(&config, Operation::ListTables)
}

/// Print the catalog summary
pub fn summary(config_path: &Path, counts: bool, database_url: Option<String>) -> CliResult<()> {
    let config = boot(config_path, database_url)?;
    one_shot(&config, Operation::Summary { counts })
}

/// Execute one operation read from stdin. Operation outcomes, including
/// failures, are reported in the stdout envelope.
pub fn exec(config_path: &Path, database_url: Option<String>) -> CliResult<()> {
    let config = boot(config_path, database_url)?;

    let operation: Operation = match read_request() {
        Ok(operation) => operation,
        Err(e) => {
            log_event_with_fields(Event::OperationRejected, &[("reason", e.message())]);
            return write_error("INVALID_BODY", e.message());
        }
    };

    let rt = runtime()?;
    rt.block_on(async {
        let gateway = connect(&config).await?;
        let result = operation.dispatch(&gateway).await;
        gateway.close().await;

        match result {
            Ok(output) => write_response(&output),
            Err(e) => write_error(e.code(), &e.to_string()),
        }
    })
}

/// Load config, apply the URL override and install logging
fn boot(config_path: &Path, database_url: Option<String>) -> CliResult<Config> {
    let config = Config::load(config_path)?.with_database_url(database_url)?;

    init_logging(&config.log_level, config.log_format()?)
        .map_err(|e| CliError::boot_failed(format!("Failed to initialize logging: {}", e)))?;

    log_event(Event::BootStart);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("schema", &config.schema),
        ],
    );
    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

async fn connect(config: &Config) -> CliResult<TableGateway> {
    let url = config.database_url()?;
    let gateway = TableGateway::connect(url, &config.schema, &config.pool_settings())
        .await
        .map_err(|e| {
            log_event_with_fields(Event::BootFailed, &[("reason", &e.to_string())]);
            CliError::boot_failed(format!("Failed to connect to database: {}", e))
        })?;

    let max_connections = config.max_connections.to_string();
    log_event_with_fields(
        Event::PoolConnected,
        &[("max_connections", &max_connections), ("schema", &config.schema)],
    );
    Ok(gateway)
}

/// Run one operation and print its bare output; failures end the process
fn one_shot(config: &Config, operation: Operation) -> CliResult<()> {
    let rt = runtime()?;
    rt.block_on(async {
        let gateway = connect(config).await?;
        let result: Result<_, GatewayError> = operation.dispatch(&gateway).await;
        gateway.close().await;
        write_json(&result?)
    })
}
