//! apigen command-line entry point.
//!
//! # Examples
//!
//! ```bash
//! # Print a client module for a document
//! apigen generate petstore.yaml
//!
//! # Write it to a file and list the tool manifest
//! apigen generate petstore.yaml -o petstore_app.py
//! apigen inspect petstore.yaml --manifest
//! ```

use anyhow::Result;
use apigen_cli::Cli;
use apigen_cli::runner::{execute_command, init_logging, load_settings, resolve_output_format};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first: it supplies the default log level
    let config = load_settings(&cli)?;
    init_logging(cli.verbose, &config.general.log_level)?;

    let output_format = resolve_output_format(cli.format.as_deref(), &config)?;

    let exit_code = execute_command(cli.command, cli.config.as_deref(), &config, output_format)?;

    std::process::exit(exit_code.as_i32());
}
