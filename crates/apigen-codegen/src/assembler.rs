//! Client assembler.
//!
//! Aggregates every compiled operation of a document into one
//! [`ClientDefinition`] and renders it as a Python module through the
//! template engine.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::assembler::ClientAssembler;
//! use apigen_core::GeneratorConfig;
//! use apigen_schema::SchemaDocument;
//! use serde_json::json;
//!
//! let doc = SchemaDocument::from_value(json!({
//!     "info": {"title": "Pet Store", "version": "1.0"},
//!     "servers": [{"url": "https://api.example.com/v1/"}],
//!     "paths": {"/pets": {"get": {"operationId": "listPets"}}}
//! }));
//! let config = GeneratorConfig::default();
//! let client = ClientAssembler::new(&doc, &config).assemble();
//!
//! assert_eq!(client.class_name, "PetStore");
//! assert_eq!(client.base_url, "https://api.example.com/v1");
//! assert_eq!(client.operations[0].function_name, "list_pets");
//! ```

use crate::compiler::{CompiledOperation, OperationCompiler};
use crate::lowering::{self, LIST_TOOLS};
use crate::manifest::ToolManifestEntry;
use crate::naming::class_name;
use crate::python::{PythonEmitter, docstring};
use crate::template_engine::{PYTHON_CLIENT, TemplateEngine};
use apigen_core::{Diagnostic, DiagnosticKind, GeneratorConfig, Result};
use apigen_schema::SchemaDocument;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Names already bound on every generated client instance.
pub const RESERVED_MEMBERS: &[&str] = &[LIST_TOOLS, "__init__", "name", "integration", "api_base_url"];

static SERVER_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid regex"));

/// One assembled client, ready to render.
#[derive(Debug, Clone)]
pub struct ClientDefinition {
    /// Generated class name
    pub class_name: String,
    /// Schema-derived base URL; empty when the document declares no server
    pub base_url: String,
    /// `info.title`
    pub title: Option<String>,
    /// `info.version`
    pub version: Option<String>,
    /// `info.description`
    pub description: Option<String>,
    /// Compiled operations in path-then-method order
    pub operations: Vec<CompiledOperation>,
    /// Every non-fatal issue found while loading and compiling
    pub diagnostics: Vec<Diagnostic>,
}

impl ClientDefinition {
    /// Manifest entries, one per operation, in method order.
    #[must_use]
    pub fn manifest(&self) -> Vec<ToolManifestEntry> {
        self.operations.iter().map(|op| op.manifest.clone()).collect()
    }
}

/// Template context for the module template.
#[derive(Debug, Serialize)]
struct ModuleContext<'a> {
    module_docstring: String,
    base_module: &'a str,
    base_class: &'a str,
    exceptions_module: &'a str,
    integration_module: &'a str,
    integration_class: &'a str,
    class_name: &'a str,
    class_docstring: String,
    init: String,
    methods: Vec<String>,
    list_tools: String,
}

/// Assembles the client for one document.
#[derive(Debug, Clone, Copy)]
pub struct ClientAssembler<'a> {
    doc: &'a SchemaDocument,
    config: &'a GeneratorConfig,
}

impl<'a> ClientAssembler<'a> {
    /// Creates an assembler over `doc`.
    #[must_use]
    pub const fn new(doc: &'a SchemaDocument, config: &'a GeneratorConfig) -> Self {
        Self { doc, config }
    }

    /// Compiles every operation and collects the client metadata.
    ///
    /// Later operations whose function name is already taken (by an earlier
    /// operation or a reserved member) are suffixed with `_2`, `_3`, ...
    #[must_use]
    pub fn assemble(&self) -> ClientDefinition {
        let mut diagnostics = self.doc.diagnostics.clone();
        let info = &self.doc.info;

        let class_name = class_name(info.title.as_deref(), self.config);
        let base_url = match base_url(self.doc) {
            Some(url) if !url.is_empty() => url,
            _ => {
                diagnostics.push(Diagnostic::warn(
                    DiagnosticKind::MissingBaseUrl,
                    "servers",
                    "no usable server URL; callers must pass api_base_url",
                ));
                String::new()
            }
        };

        let compiler = OperationCompiler::new(self.doc, self.config);
        let mut taken: HashSet<String> = RESERVED_MEMBERS.iter().map(ToString::to_string).collect();
        let mut operations = Vec::new();

        for item in &self.doc.paths {
            for operation in &item.operations {
                let Some(mut compiled) = compiler.compile(item, operation, &mut diagnostics) else {
                    continue;
                };
                if !taken.insert(compiled.function_name.clone()) {
                    let unique = unique_name(&compiled.function_name, &mut taken);
                    diagnostics.push(Diagnostic::warn(
                        DiagnosticKind::DuplicateFunctionName,
                        format!("{} {}", compiled.method, compiled.path),
                        format!(
                            "function name '{}' is already taken; renamed to '{unique}'",
                            compiled.function_name
                        ),
                    ));
                    compiled.rename(unique);
                }
                tracing::debug!(
                    function = %compiled.function_name,
                    arguments = compiled.arguments.len(),
                    "compiled {} {}",
                    compiled.method,
                    compiled.path
                );
                operations.push(compiled);
            }
        }

        ClientDefinition {
            class_name,
            base_url,
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
            operations,
            diagnostics,
        }
    }

    /// Renders `client` as a complete Python module.
    ///
    /// # Errors
    ///
    /// Returns [`apigen_core::Error::TemplateError`] if rendering fails.
    pub fn render(&self, client: &ClientDefinition, engine: &TemplateEngine<'_>) -> Result<String> {
        let emitter = PythonEmitter::new();
        let manifest = client.manifest();

        let context = ModuleContext {
            module_docstring: docstring(&module_docstring(client), 0),
            base_module: &self.config.base_module,
            base_class: &self.config.base_class,
            exceptions_module: &self.config.exceptions_module,
            integration_module: &self.config.integration_module,
            integration_class: &self.config.integration_class,
            class_name: &client.class_name,
            class_docstring: docstring(&class_docstring(client), 1),
            init: emitter.method(
                &lowering::lower_init(
                    &client.class_name,
                    &client.base_url,
                    &self.config.integration_class,
                ),
                1,
            ),
            methods: client
                .operations
                .iter()
                .map(CompiledOperation::method_source)
                .collect(),
            list_tools: emitter.method(&lowering::lower_list_tools(&manifest), 1),
        };

        engine.render(PYTHON_CLIENT, &context)
    }
}

/// Derives the base URL from the first server entry.
///
/// `{variable}` placeholders are removed and trailing slashes trimmed.
/// Returns `None` when the document declares no server.
///
/// # Examples
///
/// ```
/// use apigen_codegen::assembler::base_url;
/// use apigen_schema::SchemaDocument;
/// use serde_json::json;
///
/// let doc = SchemaDocument::from_value(json!({
///     "servers": [{"url": "https://{region}.example.com/{version}/"}]
/// }));
/// assert_eq!(base_url(&doc).as_deref(), Some("https://.example.com"));
/// ```
#[must_use]
pub fn base_url(doc: &SchemaDocument) -> Option<String> {
    let server = doc.servers.first()?;
    let stripped = SERVER_VARIABLE.replace_all(server.url.trim(), "");
    Some(stripped.trim_end_matches('/').to_string())
}

fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    let mut n = 2_usize;
    loop {
        let candidate = format!("{base}_{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn module_docstring(client: &ClientDefinition) -> String {
    let source = client.title.as_deref().unwrap_or("an untitled OpenAPI document");
    format!(
        "API client for {source}.\n\nGenerated by apigen {}. Do not edit by hand.",
        env!("CARGO_PKG_VERSION")
    )
}

fn class_docstring(client: &ClientDefinition) -> String {
    let mut doc = client
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| format!("{} API client.", client.class_name), str::to_string);
    if let Some(version) = client.version.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(doc, " (version {version})");
    }
    if let Some(description) = client
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        let _ = write!(doc, "\n\n{description}");
    }
    doc
}
