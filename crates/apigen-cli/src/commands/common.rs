//! Helpers shared by the document-reading commands.

use anyhow::Result;
use apigen_core::cli::ExitCode;
use apigen_core::{Diagnostic, Error};
use colored::Colorize;
use tracing::error;

/// Reports a failure to load or render a document.
///
/// Missing, unsupported and unparsable input maps to
/// [`ExitCode::INVALID_INPUT`]; anything else is propagated.
///
/// # Errors
///
/// Returns the error itself when it is not an input problem.
pub fn load_failure(e: &Error) -> Result<ExitCode> {
    if e.is_not_found() || e.is_unsupported_format() || e.is_parse_error() {
        error!("{e}");
        eprintln!("{} {e}", "error:".red().bold());
        return Ok(ExitCode::INVALID_INPUT);
    }
    Err(anyhow::anyhow!("{e}"))
}

/// Prints diagnostics as a human-readable list on stderr.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!(
        "{} {} diagnostic(s):",
        "warning:".yellow().bold(),
        diagnostics.len()
    );
    for diagnostic in diagnostics {
        eprintln!(
            "  {} {}: {}",
            format!("[{}]", diagnostic.kind).yellow(),
            diagnostic.location.bold(),
            diagnostic.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_input_errors_map_to_invalid_input() {
        let not_found = Error::FileNotFound {
            path: PathBuf::from("x.yaml"),
        };
        assert_eq!(load_failure(&not_found).unwrap(), ExitCode::INVALID_INPUT);

        let unsupported = Error::UnsupportedFormat {
            path: PathBuf::from("x.txt"),
            extension: "txt".to_string(),
        };
        assert_eq!(load_failure(&unsupported).unwrap(), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_other_errors_propagate() {
        let template = Error::TemplateError {
            message: "boom".to_string(),
        };
        let err = load_failure(&template).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
