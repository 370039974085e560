//! Command execution and runtime logic.
//!
//! Contains configuration resolution, logging initialization and command
//! dispatch.

use anyhow::{Context, Result};
use apigen_core::cli::{ExitCode, OutputFormat};
use clap::CommandFactory;
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands;
use crate::commands::config::Config;

/// Initializes logging infrastructure.
///
/// `--verbose` forces debug level. Otherwise `RUST_LOG` wins, then the
/// configured `default_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool, default_level: &str) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

/// Loads the configuration the command runs with.
///
/// The `config` command manages the file itself, so a broken file falls
/// back to defaults there instead of blocking `config init --force`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded for any other
/// command.
pub fn load_settings(cli: &Cli) -> Result<Config> {
    let loaded = commands::config::load_config(cli.config.as_deref());
    match (&cli.command, loaded) {
        (_, Ok(config)) => Ok(config),
        (Commands::Config { .. }, Err(_)) => Ok(Config::default()),
        (_, Err(e)) => Err(e),
    }
}

/// Resolves the output format: the `--format` flag, else the configured one.
///
/// # Errors
///
/// Returns an error if the chosen format is unknown.
pub fn resolve_output_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    flag.map_or_else(
        || config.output_format(),
        |format| format.parse().context("invalid --format"),
    )
}

/// Executes the specified CLI command.
///
/// Routes commands to their respective handlers and returns an exit code.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn execute_command(
    command: Commands,
    config_path: Option<&Path>,
    config: &Config,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Generate { schema, output } => {
            commands::generate::run(&schema, output.as_deref(), &config.generator, output_format)
        }
        Commands::Inspect { schema, manifest } => {
            commands::inspect::run(&schema, manifest, &config.generator, output_format)
        }
        Commands::Config { action } => commands::config::run(action, config_path, output_format),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

/// Runs a parsed command line end to end, without installing logging.
///
/// # Errors
///
/// Returns an error if configuration, format resolution or the command
/// itself fails.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_settings(&cli)?;
    let output_format = resolve_output_format(cli.format.as_deref(), &config)?;
    execute_command(cli.command, cli.config.as_deref(), &config, output_format)
}
