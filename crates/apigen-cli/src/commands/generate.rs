//! Generate command implementation.
//!
//! Runs the full pipeline for one document and writes the Python module.

use super::common::{load_failure, print_diagnostics};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use apigen_codegen::{ClientGenerator, GeneratedClient};
use apigen_core::cli::{ExitCode, OutputFormat};
use apigen_core::{Diagnostic, GeneratorConfig};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    /// Source document
    pub schema: String,
    /// Output file, or `None` when the module went to stdout
    pub output: Option<String>,
    /// Generated class name
    pub class_name: String,
    /// Schema-derived base URL
    pub base_url: String,
    /// Number of generated operation methods
    pub methods: usize,
    /// Number of manifest entries
    pub tools: usize,
    /// Non-fatal issues
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerateSummary {
    fn new(schema: &Path, output: Option<&Path>, client: &GeneratedClient) -> Self {
        Self {
            schema: schema.display().to_string(),
            output: output.map(|p| p.display().to_string()),
            class_name: client.class_name.clone(),
            base_url: client.base_url.clone(),
            methods: client.method_count(),
            tools: client.manifest.len(),
            diagnostics: client.diagnostics.clone(),
        }
    }
}

/// Runs the generate command.
///
/// With `output`, the module is written there and the summary goes to
/// stdout; without it, the module goes to stdout and the summary to stderr.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the output cannot be
/// written, or formatting fails. Unreadable input is reported and mapped to
/// [`ExitCode::INVALID_INPUT`].
pub fn run(
    schema: &Path,
    output: Option<&Path>,
    config: &GeneratorConfig,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!("Generating client from {}", schema.display());

    let generator =
        ClientGenerator::new(config.clone()).context("invalid generator configuration")?;

    let client = match generator.generate_file(schema) {
        Ok(client) => client,
        Err(e) => return load_failure(&e),
    };

    let summary = GenerateSummary::new(schema, output, &client);
    let formatted = format_output(&summary, output_format).context("failed to format summary")?;

    if let Some(path) = output {
        client
            .write_to(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{formatted}");
    } else {
        print!("{}", client.source);
        eprintln!("{formatted}");
    }

    if output_format == OutputFormat::Pretty {
        print_diagnostics(&client.diagnostics);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"{
        "openapi": "3.0.0",
        "info": {"title": "Tiny"},
        "servers": [{"url": "https://tiny.test"}],
        "paths": {"/ping": {"get": {"operationId": "ping"}}}
    }"#;

    #[test]
    fn test_generate_to_file() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("tiny.json");
        let output = dir.path().join("tiny_app.py");
        fs::write(&schema, SCHEMA).unwrap();

        let code = run(&schema, Some(&output), &GeneratorConfig::default(), OutputFormat::Json).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let source = fs::read_to_string(&output).unwrap();
        assert!(source.contains("class Tiny(APIApplication):"));
        assert!(source.contains("def ping(self) -> Any:"));
    }

    #[test]
    fn test_missing_schema_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let code = run(
            &dir.path().join("missing.yaml"),
            None,
            &GeneratorConfig::default(),
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!(code, ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("tiny.json");
        fs::write(&schema, SCHEMA).unwrap();

        let config = GeneratorConfig::builder().exceptions_module("bad module").build();
        assert!(run(&schema, None, &config, OutputFormat::Json).is_err());
    }

    #[test]
    fn test_summary_fields() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("tiny.json");
        fs::write(&schema, SCHEMA).unwrap();

        let client = ClientGenerator::new(GeneratorConfig::default())
            .unwrap()
            .generate_file(&schema)
            .unwrap();
        let summary = GenerateSummary::new(&schema, None, &client);
        assert_eq!(summary.class_name, "Tiny");
        assert_eq!(summary.base_url, "https://tiny.test");
        assert_eq!(summary.methods, 1);
        assert_eq!(summary.tools, 1);
        assert!(summary.output.is_none());
    }
}
