//! Config command implementation.
//!
//! Manages the CLI configuration file.
//!
//! Configuration is stored in TOML format at `--config <file>` or, by
//! default:
//! - Linux: `~/.config/apigen/config.toml`
//! - macOS: `~/Library/Application Support/apigen/config.toml`
//! - Windows: `%APPDATA%\apigen\config.toml`

use crate::actions::ConfigAction;
use anyhow::{Context, Result};
use apigen_core::GeneratorConfig;
use apigen_core::cli::{ExitCode, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// CLI configuration.
///
/// # Examples
///
/// ```toml
/// [general]
/// default_format = "pretty"
/// log_level = "info"
///
/// [generator]
/// base_module = "agentr.application"
/// base_class = "APIApplication"
/// integration_module = "agentr.integration"
/// integration_class = "Integration"
/// exceptions_module = "agentr.exceptions"
/// body_argument = "request_body"
/// fallback_class_name = "GeneratedApiApplication"
/// class_name_prefix = "Api"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Collaborator surface of the generated client
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format (json, text, pretty)
    pub default_format: String,

    /// Logging level used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::default().to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a general setting is unknown or the generator
    /// section names an invalid identifier.
    pub fn validate(&self) -> Result<()> {
        self.output_format()?;

        if !VALID_LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            anyhow::bail!(
                "invalid log_level '{}', must be one of: {}",
                self.general.log_level,
                VALID_LOG_LEVELS.join(", ")
            );
        }

        self.generator.validate()?;
        Ok(())
    }

    /// Parses `general.default_format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is not json, text or pretty.
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.general
            .default_format
            .parse()
            .context("invalid general.default_format")
    }
}

/// Gets the default configuration file path.
///
/// # Errors
///
/// Returns an error if the platform has no configuration directory.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("failed to determine config directory")?;
    Ok(config_dir.join("apigen").join("config.toml"))
}

/// Resolves the configuration path: the explicit one, or the default.
///
/// # Errors
///
/// Returns an error if no explicit path is given and the default cannot be
/// determined.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit.map_or_else(default_config_path, |path| Ok(path.to_path_buf()))
}

/// Loads configuration from file or returns defaults.
///
/// A missing default file means defaults; a missing explicit file is an
/// error.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config_path = resolve_config_path(explicit)?;

    if !config_path.exists() {
        if explicit.is_some() {
            anyhow::bail!("config file not found: {}", config_path.display());
        }
        debug!("Config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config file {}", config_path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", config_path.display()))?;

    config.validate()?;

    debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Saves configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or cannot be written.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    let toml_str = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(path, toml_str).context("failed to write config file")?;

    debug!("Saved config to {}", path.display());
    Ok(())
}

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub success: bool,
    /// Status message
    pub message: String,
    /// Configuration file path
    pub path: String,
}

/// Configuration path result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PathResult {
    /// Configuration file path
    pub path: String,
    /// Whether the file exists
    pub exists: bool,
}

/// Runs the config command.
///
/// # Arguments
///
/// * `action` - Configuration action to perform
/// * `explicit` - `--config` path, if given
/// * `output_format` - Output format (json, text, pretty)
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or written.
pub fn run(action: ConfigAction, explicit: Option<&Path>, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Config action: {:?}", action);

    match action {
        ConfigAction::Init { force } => init_config(explicit, force, output_format),
        ConfigAction::Show => show_config(explicit, output_format),
        ConfigAction::Path => show_path(explicit, output_format),
    }
}

fn init_config(explicit: Option<&Path>, force: bool, output_format: OutputFormat) -> Result<ExitCode> {
    let config_path = resolve_config_path(explicit)?;

    let result = if config_path.exists() && !force {
        InitResult {
            success: false,
            message: "configuration file already exists (use --force to overwrite)".to_string(),
            path: config_path.display().to_string(),
        }
    } else {
        save_config(&Config::default(), &config_path)?;
        InitResult {
            success: true,
            message: "configuration file created with default values".to_string(),
            path: config_path.display().to_string(),
        }
    };

    let formatted = crate::formatters::format_output(&result, output_format)
        .context("failed to format init result")?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}

fn show_config(explicit: Option<&Path>, output_format: OutputFormat) -> Result<ExitCode> {
    let config = load_config(explicit)?;

    let formatted = crate::formatters::format_output(&config, output_format)
        .context("failed to format configuration")?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}

fn show_path(explicit: Option<&Path>, output_format: OutputFormat) -> Result<ExitCode> {
    let path = resolve_config_path(explicit)?;
    let result = PathResult {
        exists: path.exists(),
        path: path.display().to_string(),
    };

    let formatted = crate::formatters::format_output(&result, output_format)
        .context("failed to format config path")?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}
