//! apigen CLI library.
//!
//! Exposes the argument definitions, commands and formatters behind the
//! `apigen` binary so they can be tested without spawning a process.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)] // API design requires Result for consistency across commands

pub mod actions;
pub mod cli;
pub mod commands;
pub mod formatters;
pub mod runner;

pub use actions::ConfigAction;
pub use cli::{Cli, Commands};
