//! Inspect command implementation.
//!
//! Compiles a document and prints its operations or its tool manifest,
//! without rendering or writing any source.

use super::common::{load_failure, print_diagnostics};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use apigen_codegen::ir::PyType;
use apigen_codegen::{ClientAssembler, ClientDefinition, CompiledOperation};
use apigen_core::cli::{ExitCode, OutputFormat};
use apigen_core::{Diagnostic, GeneratorConfig};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Compiled view of a document.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    /// Generated class name
    pub class_name: String,
    /// Schema-derived base URL
    pub base_url: String,
    /// Compiled operations in method order
    pub operations: Vec<OperationSummary>,
    /// Non-fatal issues
    pub diagnostics: Vec<Diagnostic>,
}

/// One compiled operation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationSummary {
    /// Generated method name
    pub function: String,
    /// HTTP verb
    pub method: String,
    /// URL template
    pub path: String,
    /// Arguments in declaration order
    pub arguments: Vec<ArgumentSummary>,
    /// Request body argument, if any
    pub body: Option<BodySummary>,
}

/// One resolved argument.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentSummary {
    /// Argument name in the generated method
    pub name: String,
    /// Name sent over the wire
    pub wire_name: String,
    /// Parameter location
    pub location: String,
    /// Whether the method requires it
    pub required: bool,
    /// Python annotation
    pub python_type: String,
}

/// The request body argument.
#[derive(Debug, Clone, Serialize)]
pub struct BodySummary {
    /// Argument name in the generated method
    pub name: String,
    /// Selected media type
    pub media_type: String,
    /// Whether the method requires it
    pub required: bool,
    /// Python annotation
    pub python_type: String,
}

impl From<&CompiledOperation> for OperationSummary {
    fn from(op: &CompiledOperation) -> Self {
        Self {
            function: op.function_name.clone(),
            method: op.method.to_string(),
            path: op.path.clone(),
            arguments: op
                .arguments
                .iter()
                .map(|a| ArgumentSummary {
                    name: a.arg_name.clone(),
                    wire_name: a.wire_name.clone(),
                    location: a.location.to_string(),
                    required: a.required,
                    python_type: annotation(a.python_type(), a.required),
                })
                .collect(),
            body: op.body.as_ref().map(|b| BodySummary {
                name: b.arg_name.clone(),
                media_type: b.media_type.clone(),
                required: b.required,
                python_type: annotation(b.python_type(), b.required),
            }),
        }
    }
}

fn annotation(python_type: PyType, required: bool) -> String {
    if required {
        python_type.to_string()
    } else {
        python_type.optional().to_string()
    }
}

impl From<&ClientDefinition> for InspectReport {
    fn from(client: &ClientDefinition) -> Self {
        Self {
            class_name: client.class_name.clone(),
            base_url: client.base_url.clone(),
            operations: client.operations.iter().map(OperationSummary::from).collect(),
            diagnostics: client.diagnostics.clone(),
        }
    }
}

/// Runs the inspect command.
///
/// # Errors
///
/// Returns an error if formatting fails. Unreadable input is reported and
/// mapped to [`ExitCode::INVALID_INPUT`].
pub fn run(
    schema: &Path,
    manifest: bool,
    config: &GeneratorConfig,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!("Inspecting {}", schema.display());

    let doc = match apigen_schema::load(schema) {
        Ok(doc) => doc,
        Err(e) => return load_failure(&e),
    };
    let client = ClientAssembler::new(&doc, config).assemble();

    let formatted = if manifest {
        format_output(&client.manifest(), output_format)
    } else {
        format_output(&InspectReport::from(&client), output_format)
    }
    .context("failed to format inspection result")?;
    println!("{formatted}");

    if output_format == OutputFormat::Pretty {
        print_diagnostics(&client.diagnostics);
    }

    Ok(ExitCode::SUCCESS)
}
