//! Operation compiler.
//!
//! Turns one (path, method) pair into a [`CompiledOperation`]: the merged
//! and disambiguated argument list, the optional body argument, and the
//! tool manifest entry. Each call owns a fresh [`ArgumentScope`], so no
//! naming state leaks between operations.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::compiler::OperationCompiler;
//! use apigen_core::{GeneratorConfig, ParameterLocation};
//! use apigen_schema::SchemaDocument;
//! use serde_json::json;
//!
//! let doc = SchemaDocument::from_value(json!({
//!     "paths": {"/items/{id}": {"get": {
//!         "operationId": "getItem",
//!         "parameters": [
//!             {"name": "id", "in": "path", "schema": {"type": "integer"}},
//!             {"name": "id", "in": "query", "schema": {"type": "string"}}
//!         ]
//!     }}}
//! }));
//! let config = GeneratorConfig::default();
//! let compiler = OperationCompiler::new(&doc, &config);
//!
//! let mut diagnostics = Vec::new();
//! let item = &doc.paths[0];
//! let op = compiler.compile(item, &item.operations[0], &mut diagnostics).unwrap();
//!
//! assert_eq!(op.function_name, "get_item");
//! let names: Vec<_> = op.arguments.iter().map(|a| a.arg_name.as_str()).collect();
//! assert_eq!(names, ["id", "id_query"]);
//! assert!(op.arguments[0].required);
//! assert_eq!(op.arguments[1].location, ParameterLocation::Query);
//! ```

use crate::ir::PyType;
use crate::manifest::{self, ToolManifestEntry};
use crate::naming::{function_name, to_identifier};
use crate::typemap::{TypeContext, TypeMapper};
use apigen_core::{
    Diagnostic, DiagnosticKind, GeneratorConfig, HttpMethod, MediaKind, ParameterLocation, TypeTag,
};
use apigen_schema::{Operation, ParameterSpec, PathItem, SchemaDocument};
use serde_json::Value;
use std::collections::HashSet;

/// Names bound by every generated method body.
///
/// Arguments may never take these; regular argument names cannot start
/// with `_`, so only the body argument can come close.
pub const METHOD_LOCALS: &[&str] = &[
    "_path_params",
    "_url",
    "_query",
    "_headers",
    "_cookies",
    "_response",
    "_expand_path",
];

/// Media type assumed for a request body that declares no `content`.
const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// A parameter after merging, validation and naming.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArgument {
    /// Name on the wire
    pub wire_name: String,
    /// Unique Python argument name
    pub arg_name: String,
    /// Where the value travels
    pub location: ParameterLocation,
    /// Declared `required`, or forced by a path location
    pub required: bool,
    /// Resolved type; `None` when undetermined
    pub type_tag: Option<TypeTag>,
    /// Array item type, where derivable
    pub item_type: Option<TypeTag>,
    /// Parameter description
    pub description: Option<String>,
    /// Raw schema node, kept for manifest enrichment
    pub schema: Option<Value>,
}

impl ResolvedArgument {
    /// The Python annotation (without `Optional`).
    #[must_use]
    pub fn python_type(&self) -> PyType {
        PyType::from_tags(self.type_tag, self.item_type)
    }
}

/// The request-body argument of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyArgument {
    /// Unique Python argument name
    pub arg_name: String,
    /// Whether the body was explicitly marked required
    pub required: bool,
    /// The negotiated media type
    pub media_type: String,
    /// How the body is encoded
    pub media_kind: MediaKind,
    /// Resolved type; `None` when undetermined
    pub type_tag: Option<TypeTag>,
    /// Array item type, where derivable
    pub item_type: Option<TypeTag>,
    /// Body description
    pub description: Option<String>,
    /// Schema of the negotiated media type
    pub schema: Option<Value>,
}

impl BodyArgument {
    /// The Python annotation (without `Optional`).
    #[must_use]
    pub fn python_type(&self) -> PyType {
        PyType::from_tags(self.type_tag, self.item_type)
    }
}

/// Everything the assembler needs to emit one method.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledOperation {
    /// Method name
    pub function_name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// URL template
    pub path: String,
    /// Operation summary
    pub summary: Option<String>,
    /// Operation description
    pub description: Option<String>,
    /// Whether the operation is marked deprecated
    pub deprecated: bool,
    /// Arguments in declaration order (path-scope first)
    pub arguments: Vec<ResolvedArgument>,
    /// Request-body argument
    pub body: Option<BodyArgument>,
    /// Tool manifest entry
    pub manifest: ToolManifestEntry,
}

impl CompiledOperation {
    /// Renames the generated method and its manifest entry.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.manifest.name.clone_from(&name);
        // the description fell back to the old function name
        if self.manifest.description == self.function_name {
            self.manifest.description.clone_from(&name);
        }
        self.function_name = name;
    }

    /// Iterates over arguments travelling in `location`.
    pub fn arguments_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &ResolvedArgument> {
        self.arguments.iter().filter(move |a| a.location == location)
    }

    /// Renders the full Python source of the generated method, indented for
    /// a class body.
    #[must_use]
    pub fn method_source(&self) -> String {
        crate::python::PythonEmitter::new().method(&crate::lowering::lower_operation(self), 1)
    }
}

/// Per-operation accumulator of claimed argument names.
///
/// # Examples
///
/// ```
/// use apigen_codegen::compiler::ArgumentScope;
/// use apigen_core::ParameterLocation;
///
/// let mut scope = ArgumentScope::new();
/// assert_eq!(scope.claim("id", ParameterLocation::Path), "id");
/// assert_eq!(scope.claim("id", ParameterLocation::Query), "id_query");
/// assert_eq!(scope.claim("id", ParameterLocation::Query), "id_query_2");
/// assert_eq!(scope.claim_body("id"), "_id");
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentScope {
    taken: HashSet<String>,
}

impl ArgumentScope {
    /// Creates a scope with the method-body locals already reserved.
    #[must_use]
    pub fn new() -> Self {
        Self {
            taken: METHOD_LOCALS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Claims a name for a parameter.
    ///
    /// Tries the normalized wire name, then `<name>_<location>`, then
    /// `<name>_<location>_<n>` counting from 2.
    pub fn claim(&mut self, wire_name: &str, location: ParameterLocation) -> String {
        let base = to_identifier(wire_name);
        if self.taken.insert(base.clone()) {
            return base;
        }

        let located = format!("{base}_{location}");
        if self.taken.insert(located.clone()) {
            return located;
        }

        let mut n = 2_usize;
        loop {
            let candidate = format!("{located}_{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Claims a name for the request body, prefixing `_` until unique.
    pub fn claim_body(&mut self, preferred: &str) -> String {
        let mut name = preferred.to_string();
        while self.taken.contains(&name) {
            name.insert(0, '_');
        }
        self.taken.insert(name.clone());
        name
    }

    /// Returns `true` if `name` has been claimed or reserved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

impl Default for ArgumentScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiles operations of one document.
#[derive(Debug, Clone, Copy)]
pub struct OperationCompiler<'a> {
    doc: &'a SchemaDocument,
    config: &'a GeneratorConfig,
    types: TypeMapper<'a>,
}

impl<'a> OperationCompiler<'a> {
    /// Creates a compiler over `doc`.
    #[must_use]
    pub const fn new(doc: &'a SchemaDocument, config: &'a GeneratorConfig) -> Self {
        Self {
            doc,
            config,
            types: TypeMapper::new(doc),
        }
    }

    /// Compiles one operation of `path`.
    ///
    /// Returns `None` when the operation is skipped; the reason is pushed to
    /// `diagnostics`. Skipped parameters and ignored bodies are reported the
    /// same way without skipping the operation.
    pub fn compile(
        &self,
        path: &'a PathItem,
        operation: &'a Operation,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<CompiledOperation> {
        let location = format!("{} {}", operation.method, path.template);

        if !operation.method.is_dispatchable() {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::UnsupportedMethod,
                &location,
                format!(
                    "no collaborator primitive for {}; operation skipped",
                    operation.method
                ),
            ));
            return None;
        }

        let mut scope = ArgumentScope::new();
        let mut arguments = Vec::new();

        for (index, param) in merge_parameters(path, operation).into_iter().enumerate() {
            if let Some(argument) = self.resolve_parameter(param, index, &location, &mut scope, diagnostics) {
                arguments.push(argument);
            }
        }

        let body = self.resolve_body(operation, &location, &mut scope, diagnostics);

        let function_name = function_name(
            operation.operation_id.as_deref(),
            operation.method,
            &path.template,
        );

        let manifest = manifest::build_entry(
            &self.types,
            &function_name,
            operation,
            &arguments,
            body.as_ref(),
        );

        tracing::debug!(
            function = %function_name,
            operation = %location,
            arguments = arguments.len(),
            has_body = body.is_some(),
            "compiled operation"
        );

        Some(CompiledOperation {
            function_name,
            method: operation.method,
            path: path.template.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            deprecated: operation.deprecated,
            arguments,
            body,
            manifest,
        })
    }

    fn resolve_parameter(
        &self,
        param: &'a ParameterSpec,
        index: usize,
        location: &str,
        scope: &mut ArgumentScope,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ResolvedArgument> {
        if let Some(reference) = &param.unresolved_ref {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::UnresolvedReference,
                location,
                format!("parameter #{} references '{reference}', which does not resolve; skipped", index + 1),
            ));
            return None;
        }

        let Some(wire_name) = param.name.as_deref().filter(|n| !n.is_empty()) else {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::MalformedParameter,
                location,
                format!("parameter #{} has no 'name'; skipped", index + 1),
            ));
            return None;
        };

        let Some(param_location) = param.parsed_location() else {
            let detail = param.location.as_deref().map_or_else(
                || "has no 'in'".to_string(),
                |raw| format!("has unknown location '{raw}'"),
            );
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::MalformedParameter,
                location,
                format!("parameter '{wire_name}' {detail}; skipped"),
            ));
            return None;
        };

        let schema = param.schema.as_ref();
        Some(ResolvedArgument {
            wire_name: wire_name.to_string(),
            arg_name: scope.claim(wire_name, param_location),
            location: param_location,
            required: param.required || param_location == ParameterLocation::Path,
            type_tag: self.types.map(schema, TypeContext::Scalar),
            item_type: self.types.item_type(schema),
            description: param.description.clone(),
            schema: param.schema.clone(),
        })
    }

    fn resolve_body(
        &self,
        operation: &'a Operation,
        location: &str,
        scope: &mut ArgumentScope,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<BodyArgument> {
        let body = operation.request_body.as_ref()?;

        if !operation.method.sends_body() {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::IgnoredRequestBody,
                location,
                format!("{} requests carry no body; requestBody ignored", operation.method),
            ));
            return None;
        }

        if let Some(reference) = &body.unresolved_ref {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::UnresolvedReference,
                location,
                format!("requestBody references '{reference}', which does not resolve; skipped"),
            ));
            return None;
        }

        let (media_type, schema) = body.select_media().map_or_else(
            || (DEFAULT_MEDIA_TYPE.to_string(), None),
            |media| (media.media_type.clone(), media.schema.as_ref()),
        );

        Some(BodyArgument {
            arg_name: scope.claim_body(&self.config.body_argument),
            required: body.required,
            media_kind: MediaKind::classify(&media_type),
            media_type,
            type_tag: self.types.map(schema, TypeContext::Body),
            item_type: self.types.item_type(schema),
            description: body.description.clone(),
            schema: schema.cloned(),
        })
    }

    /// The document this compiler reads from.
    #[must_use]
    pub const fn document(&self) -> &'a SchemaDocument {
        self.doc
    }
}

/// Path-scope parameters not overridden by an operation parameter with the
/// same (name, location), followed by the operation's own parameters.
fn merge_parameters<'p>(path: &'p PathItem, operation: &'p Operation) -> Vec<&'p ParameterSpec> {
    let overridden = |shared: &ParameterSpec| {
        shared.name.is_some()
            && operation
                .parameters
                .iter()
                .any(|own| own.name == shared.name && own.location == shared.location)
    };

    path.parameters
        .iter()
        .filter(|shared| !overridden(shared))
        .chain(operation.parameters.iter())
        .collect()
}
