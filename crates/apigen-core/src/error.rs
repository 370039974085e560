//! Error types for apigen.
//!
//! Every variant here is fatal: it aborts the whole generation run, so a
//! document either produces a complete client or nothing at all. Problems
//! confined to a single operation or parameter are reported as
//! [`Diagnostic`](crate::Diagnostic) values instead.
//!
//! # Examples
//!
//! ```
//! use apigen_core::{Error, Result};
//! use std::path::Path;
//!
//! fn require_yaml(path: &Path) -> Result<()> {
//!     match path.extension().and_then(|e| e.to_str()) {
//!         Some("yaml" | "yml") => Ok(()),
//!         other => Err(Error::UnsupportedFormat {
//!             path: path.to_path_buf(),
//!             extension: other.unwrap_or_default().to_string(),
//!         }),
//!     }
//! }
//!
//! let err = require_yaml(Path::new("schema.txt")).unwrap_err();
//! assert!(err.is_unsupported_format());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for apigen.
///
/// All fatal errors in the workspace use this type, providing consistent
/// error handling across the loader, the generator, and the CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// The schema file does not exist.
    #[error("schema file not found: {}", path.display())]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The schema file extension is neither `.yaml`, `.yml` nor `.json`.
    #[error("unsupported schema file type '{extension}' for {} (use .yaml, .yml or .json)", path.display())]
    UnsupportedFormat {
        /// Path that was requested
        path: PathBuf,
        /// The rejected extension (empty if the path had none)
        extension: String,
    },

    /// The schema content is not valid YAML/JSON, or its root is not a mapping.
    #[error("error parsing schema file {}: {message}", path.display())]
    SchemaParseError {
        /// Source path of the document
        path: PathBuf,
        /// Description of the parse failure
        message: String,
        /// Underlying parser error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reading the schema file or writing generated output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Template registration or rendering failed.
    #[error("template error: {message}")]
    TemplateError {
        /// Description of the template failure
        message: String,
    },

    /// Configuration error.
    ///
    /// Raised when generator configuration is invalid or cannot be parsed.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if the schema file was not found.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::Error;
    ///
    /// let err = Error::FileNotFound { path: "missing.yaml".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Returns `true` if the schema file extension was rejected.
    #[must_use]
    pub const fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Returns `true` if the schema content could not be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::Error;
    ///
    /// let err = Error::SchemaParseError {
    ///     path: "api.json".into(),
    ///     message: "expected value".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_parse_error());
    /// assert!(err.to_string().contains("api.json"));
    /// ```
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::SchemaParseError { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }
}

/// Result type alias for apigen operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = Error::FileNotFound {
            path: PathBuf::from("nope.yaml"),
        };
        assert!(err.is_not_found());
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = Error::UnsupportedFormat {
            path: PathBuf::from("schema.toml"),
            extension: "toml".to_string(),
        };
        assert!(err.is_unsupported_format());
        let display = err.to_string();
        assert!(display.contains("'toml'"));
        assert!(display.contains("schema.toml"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::SchemaParseError {
            path: PathBuf::from("api.json"),
            message: inner.to_string(),
            source: Some(Box::new(inner)),
        };
        assert!(err.is_parse_error());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_and_template_detection() {
        let config = Error::ConfigError {
            message: "empty base_class".to_string(),
        };
        let template = Error::TemplateError {
            message: "missing partial".to_string(),
        };
        assert!(config.is_config_error());
        assert!(!config.is_template_error());
        assert!(template.is_template_error());
    }
}
