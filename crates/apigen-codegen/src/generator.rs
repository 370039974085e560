//! Pipeline entry point.
//!
//! [`ClientGenerator`] runs the whole transform for one document: compile
//! every operation, assemble the client, and render the module.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::ClientGenerator;
//! use apigen_core::GeneratorConfig;
//! use apigen_schema::SchemaDocument;
//! use serde_json::json;
//!
//! let doc = SchemaDocument::from_value(json!({
//!     "info": {"title": "Example"},
//!     "servers": [{"url": "https://api.example.com"}],
//!     "paths": {"/ping": {"get": {"operationId": "ping"}}}
//! }));
//!
//! let generator = ClientGenerator::new(GeneratorConfig::default()).unwrap();
//! let client = generator.generate(&doc).unwrap();
//! assert_eq!(client.class_name, "Example");
//! assert_eq!(client.manifest.len(), 1);
//! assert!(client.source.contains("def ping(self) -> Any:"));
//! ```

use crate::assembler::ClientAssembler;
use crate::compiler::CompiledOperation;
use crate::manifest::ToolManifestEntry;
use crate::template_engine::TemplateEngine;
use apigen_core::{Diagnostic, Error, GeneratorConfig, Result};
use apigen_schema::SchemaDocument;
use std::path::Path;

/// Output of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedClient {
    /// Complete Python module source
    pub source: String,
    /// Generated class name
    pub class_name: String,
    /// Schema-derived base URL (empty if none)
    pub base_url: String,
    /// Compiled operations in method order
    pub operations: Vec<CompiledOperation>,
    /// Tool manifest, as returned by the generated `list_tools`
    pub manifest: Vec<ToolManifestEntry>,
    /// Non-fatal issues found during the run
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedClient {
    /// Number of generated operation methods.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.operations.len()
    }

    /// Writes the module source to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a directory or the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, &self.source).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = self.source.len(), "wrote client module");
        Ok(())
    }
}

/// Generates Python API clients from OpenAPI documents.
#[derive(Debug)]
pub struct ClientGenerator<'a> {
    config: GeneratorConfig,
    engine: TemplateEngine<'a>,
}

impl ClientGenerator<'_> {
    /// Creates a generator with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid, or
    /// [`Error::TemplateError`] if the built-in template fails to register.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let engine = TemplateEngine::new()?;
        Ok(Self { config, engine })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the client for an already loaded document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the module cannot be rendered.
    /// Malformed operations never fail the run; they show up in
    /// [`GeneratedClient::diagnostics`].
    pub fn generate(&self, doc: &SchemaDocument) -> Result<GeneratedClient> {
        let assembler = ClientAssembler::new(doc, &self.config);
        let client = assembler.assemble();
        let source = assembler.render(&client, &self.engine)?;

        tracing::info!(
            class = %client.class_name,
            methods = client.operations.len(),
            skipped = doc.operation_count().saturating_sub(client.operations.len()),
            diagnostics = client.diagnostics.len(),
            "generated client"
        );

        let manifest = client.manifest();
        Ok(GeneratedClient {
            source,
            class_name: client.class_name,
            base_url: client.base_url,
            operations: client.operations,
            manifest,
            diagnostics: client.diagnostics,
        })
    }

    /// Loads the document at `path` and generates its client.
    ///
    /// # Errors
    ///
    /// Returns the loader errors ([`Error::FileNotFound`],
    /// [`Error::UnsupportedFormat`], [`Error::SchemaParseError`],
    /// [`Error::Io`]) or a rendering error.
    pub fn generate_file(&self, path: &Path) -> Result<GeneratedClient> {
        let doc = apigen_schema::load(path)?;
        self.generate(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GeneratorConfig::builder().base_class("not a class").build();
        let err = ClientGenerator::new(config).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_custom_collaborator_surface() {
        let config = GeneratorConfig::builder()
            .base_module("myapp.base")
            .base_class("HttpApp")
            .integration_class("Credentials")
            .build();
        let generator = ClientGenerator::new(config).unwrap();
        let client = generator
            .generate(&SchemaDocument::from_value(json!({"info": {"title": "X"}})))
            .unwrap();
        assert!(client.source.contains("from myapp.base import HttpApp\n"));
        assert!(client.source.contains("class X(HttpApp):"));
        assert!(client.source.contains("integration: Optional[Credentials] = None"));
    }

    #[test]
    fn test_write_to_creates_parents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out/nested/client.py");

        let generator = ClientGenerator::new(GeneratorConfig::default()).unwrap();
        let client = generator
            .generate(&SchemaDocument::from_value(json!({})))
            .unwrap();
        client.write_to(&target).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, client.source);
    }

    #[test]
    fn test_generate_file_missing() {
        let generator = ClientGenerator::new(GeneratorConfig::default()).unwrap();
        let err = generator
            .generate_file(Path::new("/definitely/not/here.yaml"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
