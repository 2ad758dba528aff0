//! Shelve CLI Binary
//!
//! Command-line interface for token-based filename classification and
//! archiving.

use anyhow::Context;
use clap::Parser;
use shelve::logging::{init_logging, LoggingConfig};
use shelve::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut logging = LoggingConfig::default();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        logging.file = Some(file.clone());
    }
    init_logging(&logging).context("failed to initialize logging")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let output = runtime.block_on(async {
        let context = CliContext::new(
            cli.delimiter.clone(),
            cli.recursive,
            cli.telemetry_endpoint.as_deref(),
        );
        context.execute(&cli.command).await
    })?;

    println!("{}", output);
    Ok(())
}
