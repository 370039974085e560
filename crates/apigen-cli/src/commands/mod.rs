//! Command implementations for the apigen CLI.
//!
//! Each command module is responsible for executing its operation and
//! formatting output according to the requested format.

pub mod common;
pub mod completions;
pub mod config;
pub mod generate;
pub mod inspect;
