//! In-memory model of an OpenAPI document.
//!
//! The model is built from an already-parsed JSON tree and never rejects it:
//! fields the generator cannot use stay `None`, entries that are not even
//! mappings are dropped with a [`Diagnostic`], and the decision whether a
//! parameter is usable is left to the compiler. Every collection keeps the
//! order in which the document declared it.
//!
//! # Examples
//!
//! ```
//! use apigen_schema::SchemaDocument;
//! use serde_json::json;
//!
//! let doc = SchemaDocument::from_value(json!({
//!     "openapi": "3.0.0",
//!     "info": {"title": "Pets", "version": "1.0"},
//!     "paths": {
//!         "/pets": {"get": {"operationId": "listPets"}}
//!     }
//! }));
//!
//! assert_eq!(doc.info.title.as_deref(), Some("Pets"));
//! assert_eq!(doc.operation_count(), 1);
//! ```

use apigen_core::{Diagnostic, DiagnosticKind, HttpMethod, MediaKind, ParameterLocation};
use serde_json::{Map, Value};

/// Maximum number of `$ref` hops followed before a reference is deemed cyclic.
const MAX_REF_HOPS: usize = 32;

/// The parsed OpenAPI tree.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Value of the top-level `openapi` field
    pub openapi: Option<String>,
    /// Document metadata
    pub info: Info,
    /// Declared servers, in order
    pub servers: Vec<Server>,
    /// Path items, in document order
    pub paths: Vec<PathItem>,
    /// Issues found while building the model
    pub diagnostics: Vec<Diagnostic>,
    root: Value,
}

/// `info` block of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    /// API title
    pub title: Option<String>,
    /// API version
    pub version: Option<String>,
    /// API description
    pub description: Option<String>,
}

/// One entry of `servers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// Base-URL template, possibly containing `{variable}` placeholders
    pub url: String,
    /// Optional server description
    pub description: Option<String>,
}

/// A URL template with its path-scope parameters and operations.
#[derive(Debug, Clone)]
pub struct PathItem {
    /// URL template, e.g. `/users/{user_id}`
    pub template: String,
    /// Parameters that apply to every operation on this path
    pub parameters: Vec<ParameterSpec>,
    /// Operations keyed by HTTP method, in document order
    pub operations: Vec<Operation>,
}

/// One HTTP-method endpoint.
#[derive(Debug, Clone)]
pub struct Operation {
    /// HTTP method
    pub method: HttpMethod,
    /// `operationId`
    pub operation_id: Option<String>,
    /// `summary`
    pub summary: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// Operation-scope parameters
    pub parameters: Vec<ParameterSpec>,
    /// `requestBody`
    pub request_body: Option<RequestBodySpec>,
    /// `deprecated`
    pub deprecated: bool,
}

/// A parameter declaration as written in the document.
///
/// `name` and `location` are optional here because the document may omit
/// them; such parameters are skipped by the compiler, not by the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSpec {
    /// Wire name
    pub name: Option<String>,
    /// Raw `in` value
    pub location: Option<String>,
    /// Declared `required` flag
    pub required: bool,
    /// Schema node (from `schema`, or from the first `content` entry)
    pub schema: Option<Value>,
    /// Parameter description
    pub description: Option<String>,
    /// Set when the parameter was a `$ref` that could not be resolved
    pub unresolved_ref: Option<String>,
}

impl ParameterSpec {
    /// Parses the declared location.
    ///
    /// Returns `None` when `in` is missing or not one of the four OpenAPI
    /// locations.
    #[must_use]
    pub fn parsed_location(&self) -> Option<ParameterLocation> {
        self.location.as_deref().and_then(|l| l.parse().ok())
    }
}

/// A request-body declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBodySpec {
    /// Declared `required` flag
    pub required: bool,
    /// Body description
    pub description: Option<String>,
    /// Media types with their schemas, in document order
    pub content: Vec<MediaTypeSpec>,
    /// Set when the body was a `$ref` that could not be resolved
    pub unresolved_ref: Option<String>,
}

/// One `content` entry of a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaTypeSpec {
    /// Media type string, e.g. `application/json`
    pub media_type: String,
    /// Schema node, if declared
    pub schema: Option<Value>,
}

impl MediaTypeSpec {
    /// Classifies the media type.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.media_type)
    }
}

impl RequestBodySpec {
    /// Selects the media type the generated method sends.
    ///
    /// Precedence: `application/json`, then
    /// `application/x-www-form-urlencoded`, then `multipart/form-data`, then
    /// the first declared entry. A `+json` vendor type is only chosen as the
    /// first declared entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_schema::{MediaTypeSpec, RequestBodySpec};
    ///
    /// let body = RequestBodySpec {
    ///     content: vec![
    ///         MediaTypeSpec { media_type: "text/plain".into(), schema: None },
    ///         MediaTypeSpec { media_type: "multipart/form-data".into(), schema: None },
    ///     ],
    ///     ..Default::default()
    /// };
    /// assert_eq!(body.select_media().unwrap().media_type, "multipart/form-data");
    /// ```
    #[must_use]
    pub fn select_media(&self) -> Option<&MediaTypeSpec> {
        let exact = |wanted: &str| {
            self.content
                .iter()
                .find(|m| media_essence(&m.media_type) == wanted)
        };

        exact("application/json")
            .or_else(|| exact("application/x-www-form-urlencoded"))
            .or_else(|| exact("multipart/form-data"))
            .or_else(|| self.content.first())
    }
}

fn media_essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl SchemaDocument {
    /// Builds the model from a parsed JSON tree.
    ///
    /// A root that is not a mapping yields an empty document; the loader
    /// rejects that case before calling this.
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        let mut diagnostics = Vec::new();

        let openapi = root.get("openapi").and_then(text);
        let info = root.get("info").map(parse_info).unwrap_or_default();
        let servers: Vec<Server> = root
            .get("servers")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(parse_server).collect())
            .unwrap_or_default();

        let mut paths = Vec::new();
        if let Some(entries) = root.get("paths").and_then(Value::as_object) {
            for (template, item) in entries {
                if let Some(path_item) = parse_path_item(&root, template, item, &mut diagnostics) {
                    paths.push(path_item);
                }
            }
        }

        tracing::debug!(
            paths = paths.len(),
            servers = servers.len(),
            "built schema model"
        );

        Self {
            openapi,
            info,
            servers,
            paths,
            diagnostics,
            root,
        }
    }

    /// Total number of operations across all paths.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }

    /// Follows local `$ref` chains starting at `node`.
    ///
    /// Returns the first node that is not a reference. Fails with the
    /// offending reference string if a hop points outside the document,
    /// at nothing, or the chain does not terminate.
    ///
    /// # Errors
    ///
    /// Returns the unresolvable `$ref` value.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_schema::SchemaDocument;
    /// use serde_json::json;
    ///
    /// let doc = SchemaDocument::from_value(json!({
    ///     "components": {"schemas": {"Id": {"type": "integer"}}}
    /// }));
    ///
    /// let node = json!({"$ref": "#/components/schemas/Id"});
    /// assert_eq!(doc.resolve(&node).unwrap()["type"], "integer");
    ///
    /// let missing = json!({"$ref": "#/components/schemas/Nope"});
    /// assert!(doc.resolve(&missing).is_err());
    /// ```
    pub fn resolve<'a>(&'a self, node: &'a Value) -> Result<&'a Value, String> {
        resolve_in(&self.root, node)
    }
}

fn resolve_in<'a>(root: &'a Value, node: &'a Value) -> Result<&'a Value, String> {
    let mut current = node;
    for _ in 0..MAX_REF_HOPS {
        let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
            return Ok(current);
        };
        current = reference
            .strip_prefix('#')
            .and_then(|pointer| root.pointer(pointer))
            .ok_or_else(|| reference.to_string())?;
    }
    Err(node
        .get("$ref")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

/// Reads a scalar as text; YAML happily types `version: 1.0` as a number.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(text)
}

fn flag(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn parse_info(value: &Value) -> Info {
    value.as_object().map_or_else(Info::default, |info| Info {
        title: field(info, "title"),
        version: field(info, "version"),
        description: field(info, "description"),
    })
}

fn parse_server(value: &Value) -> Option<Server> {
    let server = value.as_object()?;
    Some(Server {
        url: server.get("url")?.as_str()?.to_string(),
        description: field(server, "description"),
    })
}

fn parse_path_item(
    root: &Value,
    template: &str,
    value: &Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PathItem> {
    if template.trim().is_empty() {
        diagnostics.push(Diagnostic::warn(
            DiagnosticKind::MalformedOperation,
            "paths",
            "path item with an empty URL template skipped",
        ));
        return None;
    }

    let resolved = match resolve_in(root, value) {
        Ok(resolved) => resolved,
        Err(reference) => {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::UnresolvedReference,
                template,
                format!("path item reference '{reference}' could not be resolved"),
            ));
            return None;
        }
    };

    let Some(item) = resolved.as_object() else {
        diagnostics.push(Diagnostic::warn(
            DiagnosticKind::MalformedOperation,
            template,
            "path item is not a mapping",
        ));
        return None;
    };

    let parameters = parse_parameters(root, item.get("parameters"));

    let mut operations = Vec::new();
    for (key, entry) in item {
        let Ok(method) = key.parse::<HttpMethod>() else {
            continue;
        };
        match entry.as_object() {
            Some(operation) => operations.push(parse_operation(root, method, operation)),
            None => diagnostics.push(Diagnostic::warn(
                DiagnosticKind::MalformedOperation,
                format!("{method} {template}"),
                "operation is not a mapping",
            )),
        }
    }

    Some(PathItem {
        template: template.to_string(),
        parameters,
        operations,
    })
}

fn parse_operation(root: &Value, method: HttpMethod, operation: &Map<String, Value>) -> Operation {
    Operation {
        method,
        operation_id: field(operation, "operationId"),
        summary: field(operation, "summary"),
        description: field(operation, "description"),
        parameters: parse_parameters(root, operation.get("parameters")),
        request_body: operation
            .get("requestBody")
            .map(|body| parse_request_body(root, body)),
        deprecated: flag(operation, "deprecated"),
    }
}

fn parse_parameters(root: &Value, value: Option<&Value>) -> Vec<ParameterSpec> {
    value
        .and_then(Value::as_array)
        .map(|list| list.iter().map(|p| parse_parameter(root, p)).collect())
        .unwrap_or_default()
}

fn parse_parameter(root: &Value, value: &Value) -> ParameterSpec {
    let resolved = match resolve_in(root, value) {
        Ok(resolved) => resolved,
        Err(reference) => {
            return ParameterSpec {
                unresolved_ref: Some(reference),
                ..ParameterSpec::default()
            };
        }
    };

    let Some(param) = resolved.as_object() else {
        return ParameterSpec::default();
    };

    // `content` is the alternative to `schema` for complex parameters.
    let schema = param.get("schema").cloned().or_else(|| {
        param
            .get("content")
            .and_then(Value::as_object)
            .and_then(|content| content.values().next())
            .and_then(|media| media.get("schema"))
            .cloned()
    });

    ParameterSpec {
        name: param.get("name").and_then(Value::as_str).map(String::from),
        location: param.get("in").and_then(Value::as_str).map(String::from),
        required: flag(param, "required"),
        schema,
        description: field(param, "description"),
        unresolved_ref: None,
    }
}

fn parse_request_body(root: &Value, value: &Value) -> RequestBodySpec {
    let resolved = match resolve_in(root, value) {
        Ok(resolved) => resolved,
        Err(reference) => {
            return RequestBodySpec {
                unresolved_ref: Some(reference),
                ..RequestBodySpec::default()
            };
        }
    };

    let Some(body) = resolved.as_object() else {
        return RequestBodySpec::default();
    };

    let content = body
        .get("content")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(media_type, media)| MediaTypeSpec {
                    media_type: media_type.clone(),
                    schema: media.get("schema").cloned(),
                })
                .collect()
        })
        .unwrap_or_default();

    RequestBodySpec {
        required: flag(body, "required"),
        description: field(body, "description"),
        content,
        unresolved_ref: None,
    }
}
