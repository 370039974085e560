//! Core types, diagnostics, and errors for the apigen client generator.
//!
//! This crate provides the foundational types shared by the schema loader,
//! the code generator, and the command-line interface.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`HttpMethod`, `ParameterLocation`, `TypeTag`, `MediaKind`)
//! - A fatal error hierarchy with contextual information (`Error`)
//! - Non-fatal, per-operation diagnostics (`Diagnostic`)
//! - Generator configuration (`GeneratorConfig`)
//! - CLI primitives (`cli::OutputFormat`, `cli::ExitCode`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod diagnostic;
mod error;
mod types;

pub mod cli;

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{Error, Result};
pub use types::{HttpMethod, MediaKind, ParameterLocation, TypeTag};
