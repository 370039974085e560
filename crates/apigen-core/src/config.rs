//! Generator configuration.
//!
//! Controls the collaborator surface the generated client is written
//! against: which module the API-wrapper base class lives in, where the
//! credential collaborator and the call-time error types come from, and the
//! fixed names the generator falls back to.
//!
//! # Examples
//!
//! ```
//! use apigen_core::GeneratorConfig;
//!
//! // Use default configuration
//! let config = GeneratorConfig::default();
//! assert_eq!(config.base_class, "APIApplication");
//!
//! // Create custom configuration
//! let custom = GeneratorConfig::builder()
//!     .base_module("myapp.clients")
//!     .base_class("HttpClient")
//!     .build();
//! assert!(custom.validate().is_ok());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for one generation run.
///
/// Every field is a Python identifier or a dotted module path; see
/// [`GeneratorConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Module exporting the API-wrapper base class.
    ///
    /// Default: `agentr.application`
    pub base_module: String,

    /// Name of the API-wrapper base class the client extends.
    ///
    /// Default: `APIApplication`
    pub base_class: String,

    /// Module exporting the credential/integration collaborator.
    ///
    /// Default: `agentr.integration`
    pub integration_module: String,

    /// Name of the integration collaborator type.
    ///
    /// Default: `Integration`
    pub integration_class: String,

    /// Module exporting `MissingRequiredParameter` and `MissingRequiredBody`.
    ///
    /// Default: `agentr.exceptions`
    pub exceptions_module: String,

    /// Default argument name for the request body.
    ///
    /// Default: `request_body`
    pub body_argument: String,

    /// Class name used when the document title sanitizes to nothing.
    ///
    /// Default: `GeneratedApiApplication`
    pub fallback_class_name: String,

    /// Prefix added when a sanitized title starts with a digit or underscore.
    ///
    /// Default: `Api`
    pub class_name_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_module: "agentr.application".to_string(),
            base_class: "APIApplication".to_string(),
            integration_module: "agentr.integration".to_string(),
            integration_class: "Integration".to_string(),
            exceptions_module: "agentr.exceptions".to_string(),
            body_argument: "request_body".to_string(),
            fallback_class_name: "GeneratedApiApplication".to_string(),
            class_name_prefix: "Api".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - a module field is not a dotted path of identifiers
    /// - a class or argument field is not a single identifier
    /// - `fallback_class_name` or `class_name_prefix` does not start with a letter
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::GeneratorConfig;
    ///
    /// let mut config = GeneratorConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.base_module = "agentr..application".to_string();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("base_module", &self.base_module),
            ("integration_module", &self.integration_module),
            ("exceptions_module", &self.exceptions_module),
        ] {
            if !value.split('.').all(is_identifier) {
                return Err(config_error(field, value, "a dotted module path"));
            }
        }

        for (field, value) in [
            ("base_class", &self.base_class),
            ("integration_class", &self.integration_class),
            ("body_argument", &self.body_argument),
        ] {
            if !is_identifier(value) {
                return Err(config_error(field, value, "an identifier"));
            }
        }

        for (field, value) in [
            ("fallback_class_name", &self.fallback_class_name),
            ("class_name_prefix", &self.class_name_prefix),
        ] {
            if !is_identifier(value) || !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(config_error(field, value, "an identifier starting with a letter"));
            }
        }

        Ok(())
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn config_error(field: &str, value: &str, expected: &str) -> Error {
    Error::ConfigError {
        message: format!("generator.{field} must be {expected}, got '{value}'"),
    }
}

/// Builder for `GeneratorConfig`.
///
/// # Examples
///
/// ```
/// use apigen_core::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .exceptions_module("myapp.errors")
///     .body_argument("payload")
///     .build();
///
/// assert_eq!(config.body_argument, "payload");
/// assert_eq!(config.base_class, "APIApplication");
/// ```
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    /// Sets the base-class module.
    #[must_use]
    pub fn base_module(mut self, module: impl Into<String>) -> Self {
        self.config.base_module = module.into();
        self
    }

    /// Sets the base-class name.
    #[must_use]
    pub fn base_class(mut self, class: impl Into<String>) -> Self {
        self.config.base_class = class.into();
        self
    }

    /// Sets the integration module.
    #[must_use]
    pub fn integration_module(mut self, module: impl Into<String>) -> Self {
        self.config.integration_module = module.into();
        self
    }

    /// Sets the integration type name.
    #[must_use]
    pub fn integration_class(mut self, class: impl Into<String>) -> Self {
        self.config.integration_class = class.into();
        self
    }

    /// Sets the call-time exceptions module.
    #[must_use]
    pub fn exceptions_module(mut self, module: impl Into<String>) -> Self {
        self.config.exceptions_module = module.into();
        self
    }

    /// Sets the default request-body argument name.
    #[must_use]
    pub fn body_argument(mut self, name: impl Into<String>) -> Self {
        self.config.body_argument = name.into();
        self
    }

    /// Sets the fallback class name.
    #[must_use]
    pub fn fallback_class_name(mut self, name: impl Into<String>) -> Self {
        self.config.fallback_class_name = name.into();
        self
    }

    /// Sets the class-name prefix.
    #[must_use]
    pub fn class_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.class_name_prefix = prefix.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_module() {
        let config = GeneratorConfig::builder().base_module("").build();
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("base_module"));
    }

    #[test]
    fn test_rejects_class_with_dot() {
        let config = GeneratorConfig::builder().base_class("a.B").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_prefix_starting_with_underscore() {
        let config = GeneratorConfig::builder().class_name_prefix("_X").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"base_class": "Client"}"#).unwrap();
        assert_eq!(config.base_class, "Client");
        assert_eq!(config.body_argument, "request_body");
    }
}
