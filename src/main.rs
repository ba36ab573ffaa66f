//! Function OpenAPI generator - command-line tool.
//!
//! Loads the HTTP-triggered functions of a Rust project from their annotations and writes the
//! OpenAPI document describing them.
//!
//! # Usage
//!
//! ```bash
//! function-openapi [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate the default YAML document:
//! ```bash
//! function-openapi ./my-functions -o openapi.yaml
//! ```
//!
//! Generate the `v2` document as JSON with a server entry and a UI page:
//! ```bash
//! function-openapi ./my-functions -c openapi-config.yaml -d v2 -f json \
//!     --host example.com --base-path api -o site/v2.json --ui site/index.html
//! ```

use anyhow::Result;
use clap::Parser;
use function_openapi::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Function OpenAPI generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");
    Ok(())
}
