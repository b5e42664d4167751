//! OpenAPI Console - command-line loading, normalization and reporting of
//! OpenAPI/Swagger definitions.
//!
//! # Usage
//!
//! ```bash
//! openapi-console <COMMAND> [DEFINITION] [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Print a definition as JSON with resolved $refs:
//! ```bash
//! openapi-console read ./openapi.yaml -D --json
//! ```
//!
//! Summarize a remote definition:
//! ```bash
//! openapi-console info https://petstore3.swagger.io/api/v3/openapi.json
//! ```
//!
//! Rewrite the server list while reading:
//! ```bash
//! openapi-console read ./openapi.yaml -S http://localhost:9000 -R /v2
//! ```

use anyhow::Result;
use clap::Parser;
use log::debug;
use openapi_console::cli::{self, CliArgs};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    debug!("Parsed arguments: {:?}", args);

    cli::run(args)
}
