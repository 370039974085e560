//! Python API-client generation from OpenAPI documents.
//!
//! The pipeline compiles each (path, method) pair of a
//! [`SchemaDocument`](apigen_schema::SchemaDocument) into a
//! [`CompiledOperation`], lowers it to a small code IR, and renders the IR
//! with a Python emitter. The assembler stitches the methods, the
//! initializer and the static tool manifest into one module through a
//! Handlebars template.
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
//!     "info": {"title": "Users"},
//!     "servers": [{"url": "https://api.example.com/v1"}],
//!     "paths": {"/users/{id}": {"get": {
//!         "operationId": "getUser",
//!         "parameters": [{"name": "id", "in": "path", "schema": {"type": "integer"}}]
//!     }}}
//! }));
//!
//! let client = ClientGenerator::new(GeneratorConfig::default())
//!     .unwrap()
//!     .generate(&doc)
//!     .unwrap();
//! assert_eq!(client.manifest[0].name, "get_user");
//! assert_eq!(client.manifest[0].required(), ["id"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod assembler;
pub mod compiler;
pub mod generator;
pub mod ir;
pub mod lowering;
pub mod manifest;
pub mod naming;
pub mod python;
pub mod template_engine;
pub mod typemap;

pub use assembler::{ClientAssembler, ClientDefinition};
pub use compiler::{BodyArgument, CompiledOperation, OperationCompiler, ResolvedArgument};
pub use generator::{ClientGenerator, GeneratedClient};
pub use manifest::ToolManifestEntry;
pub use naming::to_identifier;
