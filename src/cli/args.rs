//! CLI argument definitions using clap
//!
//! Commands:
//! - tablegate init --config <path>
//! - tablegate serve --config <path> [--port N] [--database-url URL]
//! - tablegate tables --config <path>
//! - tablegate summary --config <path> [--counts]
//! - tablegate exec --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tablegate - a schema-agnostic HTTP gateway for Postgres tables
#[derive(Parser, Debug)]
#[command(name = "tablegate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,
    },

    /// Serve the HTTP API until interrupted
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,

        /// Override the configured connection string
        #[arg(long, env = "TABLEGATE_DATABASE_URL")]
        database_url: Option<String>,
    },

    /// List tables and exit
    Tables {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,

        #[arg(long, env = "TABLEGATE_DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Print the catalog summary and exit
    Summary {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,

        /// Include row counts
        #[arg(long)]
        counts: bool,

        #[arg(long, env = "TABLEGATE_DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Execute one operation read from stdin and exit
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./tablegate.json")]
        config: PathBuf,

        #[arg(long, env = "TABLEGATE_DATABASE_URL")]
        database_url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
