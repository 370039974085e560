//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::actions::ConfigAction;

/// apigen - Python API clients from OpenAPI documents.
///
/// Compiles every operation of an OpenAPI 3.x document into a method of one
/// client class, together with a static tool manifest describing them.
#[derive(Parser, Debug)]
#[command(name = "apigen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty); defaults to the configured format
    #[arg(long = "format", global = true)]
    pub format: Option<String>,

    /// Configuration file (default: <config dir>/apigen/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a Python client module from an OpenAPI document.
    ///
    /// Writes the module to `--output` (or stdout) and prints a summary of
    /// the run, including every diagnostic.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Print the module
    /// apigen generate petstore.yaml
    ///
    /// # Write it to a file, summary as JSON
    /// apigen --format json generate petstore.yaml -o petstore_app.py
    /// ```
    Generate {
        /// Path to a .yaml, .yml or .json OpenAPI document
        schema: PathBuf,

        /// Write the generated module here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the compiled operations of a document without writing code.
    ///
    /// # Examples
    ///
    /// ```bash
    /// apigen inspect petstore.yaml
    /// apigen inspect petstore.yaml --manifest
    /// ```
    Inspect {
        /// Path to a .yaml, .yml or .json OpenAPI document
        schema: PathBuf,

        /// Print the tool manifest instead of the operation list
        #[arg(short, long)]
        manifest: bool,
    },

    /// Manage the configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
