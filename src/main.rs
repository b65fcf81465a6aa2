//! Swagger-from-routes - Command-line tool for generating API documentation.
//!
//! This binary reads a declarative manifest describing an API's routes and
//! serializer types, runs the documentation pipeline over it, and prints
//! the resulting document as YAML or JSON.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-routes [OPTIONS] <MANIFEST>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! swagger-from-routes ./api.yaml -o docs.yaml
//! ```
//!
//! Generate JSON documentation for one resource:
//! ```bash
//! swagger-from-routes ./api.yaml -f json -r comments
//! ```
//!
//! Print the resource index:
//! ```bash
//! swagger-from-routes ./api.yaml --resources
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_routes::cli;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can drive logger setup
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger-from-routes starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
