//! # silt-cli
//!
//! Command-line front-end for the Silt materialization pipeline.
//!
//! ## Commands
//!
//! - `silt exec "<statement>"` - Run one SQL statement: a
//!   `CREATE EXTERNAL TABLE ... AS SELECT` directive is materialized, a bare
//!   `SELECT` runs on the embedded engine and prints its rows
//!
//! ## Configuration
//!
//! The CLI uses environment variables or command-line flags for settings:
//!
//! - `SILT_UC_ENDPOINT` - Unity Catalog endpoint (default: `http://localhost:8080`)
//! - `SILT_UC_TOKEN` - Catalog bearer token
//! - `SILT_AWS_REGION` - Default storage region (default: `eu-west-1`)
//! - `SILT_STORE_TIMEOUT_SECS` - Store budget in seconds (default: 10)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod commands;

use std::time::Duration;

use clap::{Parser, Subcommand};

use silt_core::StoreConfig;

/// Silt CLI - materialize query results as catalog-registered Delta tables.
#[derive(Debug, Parser)]
#[command(name = "silt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Unity Catalog endpoint URL.
    #[arg(long, env = "SILT_UC_ENDPOINT", default_value = "http://localhost:8080")]
    pub uc_endpoint: String,

    /// Bearer token for the catalog service.
    #[arg(long, env = "SILT_UC_TOKEN")]
    pub uc_token: Option<String>,

    /// Default object-storage region.
    #[arg(long, env = "SILT_AWS_REGION", default_value = "eu-west-1")]
    pub aws_region: String,

    /// Store budget in seconds.
    #[arg(long, env = "SILT_STORE_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective pipeline configuration.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::default()
            .with_endpoint(&self.uc_endpoint)
            .with_region(&self.aws_region)
            .with_store_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(token) = &self.uc_token {
            config = config.with_token(token);
        }
        config
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a single SQL statement.
    Exec(commands::exec::ExecArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_from_flags() {
        let cli = Cli::parse_from([
            "silt",
            "--uc-endpoint",
            "https://uc.example.com",
            "--uc-token",
            "token-abc",
            "--aws-region",
            "us-west-2",
            "--timeout-secs",
            "30",
            "exec",
            "SELECT 1",
        ]);

        let config = cli.store_config();
        assert_eq!(config.uc_endpoint, "https://uc.example.com");
        assert_eq!(config.uc_token.as_deref(), Some("token-abc"));
        assert_eq!(config.aws_region, "us-west-2");
        assert_eq!(config.store_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["silt", "exec", "SELECT 1"]);
        let config = cli.store_config();
        assert_eq!(config.uc_endpoint, "http://localhost:8080");
        assert!(config.uc_token.is_none());
        assert_eq!(config.aws_region, "eu-west-1");
    }
}
