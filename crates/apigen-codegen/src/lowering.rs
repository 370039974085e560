//! Lowering of compiled operations and client metadata to the code IR.

use crate::compiler::{BodyArgument, CompiledOperation, ResolvedArgument};
use crate::ir::{Expr, KWARGS, MethodDef, Param, PyType, Stmt};
use crate::manifest::ToolManifestEntry;
use apigen_core::{HttpMethod, MediaKind, ParameterLocation};
use serde_json::{Value, json};
use std::fmt::Write as _;

/// Name of the generated manifest-listing method.
pub const LIST_TOOLS: &str = "list_tools";

/// Name of the module-level path expansion helper.
pub const EXPAND_PATH: &str = "_expand_path";

const PATH_PARAMS: &str = "_path_params";
const URL: &str = "_url";
const QUERY: &str = "_query";
const HEADERS: &str = "_headers";
const COOKIES: &str = "_cookies";
const RESPONSE: &str = "_response";

/// Lowers one compiled operation to a method definition.
#[must_use]
pub fn lower_operation(op: &CompiledOperation) -> MethodDef {
    MethodDef {
        name: op.function_name.clone(),
        params: signature(op),
        var_kwargs: false,
        returns: Some(PyType::Any),
        docstring: Some(operation_docstring(op)),
        body: operation_body(op),
    }
}

/// Required arguments first, then optional ones; each group keeps
/// declaration order and the body goes last within its group.
fn signature(op: &CompiledOperation) -> Vec<Param> {
    let mut required = Vec::new();
    let mut optional = Vec::new();

    for argument in &op.arguments {
        if argument.required {
            required.push(Param::required(&argument.arg_name, argument.python_type()));
        } else {
            optional.push(Param::optional(&argument.arg_name, argument.python_type()));
        }
    }
    if let Some(body) = &op.body {
        if body.required {
            required.push(Param::required(&body.arg_name, body.python_type()));
        } else {
            optional.push(Param::optional(&body.arg_name, body.python_type()));
        }
    }

    required.extend(optional);
    required
}

fn operation_body(op: &CompiledOperation) -> Vec<Stmt> {
    let mut body = Vec::new();

    for argument in op.arguments.iter().filter(|a| a.required) {
        body.push(missing_guard(
            &argument.arg_name,
            Expr::name("MissingRequiredParameter").call_kw(
                vec![],
                vec![
                    ("argument".to_string(), Expr::str(&argument.arg_name)),
                    ("wire_name".to_string(), Expr::str(&argument.wire_name)),
                ],
            ),
        ));
    }
    if let Some(request_body) = op.body.as_ref().filter(|b| b.required) {
        body.push(missing_guard(
            &request_body.arg_name,
            Expr::name("MissingRequiredBody").call_kw(
                vec![],
                vec![("argument".to_string(), Expr::str(&request_body.arg_name))],
            ),
        ));
    }

    let path_pairs = wire_pairs(op.arguments_in(ParameterLocation::Path));
    let path_expr = if path_pairs.is_empty() {
        Expr::str(&op.path)
    } else {
        body.push(Stmt::Assign {
            target: PATH_PARAMS.to_string(),
            value: Expr::Dict(path_pairs),
        });
        Expr::name(EXPAND_PATH).call(vec![Expr::str(&op.path), Expr::name(PATH_PARAMS)])
    };
    body.push(Stmt::Assign {
        target: URL.to_string(),
        value: Expr::Add(
            Box::new(Expr::self_attr("api_base_url")),
            Box::new(path_expr),
        ),
    });

    let mut kwargs = Vec::new();

    let query_pairs = wire_pairs(op.arguments_in(ParameterLocation::Query));
    if !query_pairs.is_empty() {
        body.push(Stmt::Assign {
            target: QUERY.to_string(),
            value: Expr::PresentOnly(query_pairs),
        });
        kwargs.push(("params".to_string(), Expr::name(QUERY)));
    }

    let header_pairs = wire_pairs(op.arguments_in(ParameterLocation::Header));
    let cookie_pairs = wire_pairs(op.arguments_in(ParameterLocation::Cookie));
    if !header_pairs.is_empty() || !cookie_pairs.is_empty() {
        body.push(Stmt::Assign {
            target: HEADERS.to_string(),
            value: Expr::PresentOnly(header_pairs),
        });
        if !cookie_pairs.is_empty() {
            body.push(Stmt::Assign {
                target: COOKIES.to_string(),
                value: Expr::PresentOnly(cookie_pairs),
            });
            body.push(Stmt::If {
                test: Expr::name(COOKIES),
                body: vec![Stmt::SetItem {
                    target: HEADERS.to_string(),
                    key: Expr::str("Cookie"),
                    value: Expr::JoinPairs {
                        separator: "; ".to_string(),
                        mapping: Box::new(Expr::name(COOKIES)),
                    },
                }],
            });
        }
        kwargs.push(("headers".to_string(), Expr::name(HEADERS)));
    }

    if let Some(request_body) = &op.body {
        kwargs.push((
            body_keyword(request_body.media_kind).to_string(),
            Expr::name(&request_body.arg_name),
        ));
    }

    body.push(Stmt::Assign {
        target: RESPONSE.to_string(),
        value: Expr::self_attr(dispatcher(op.method)).call_kw(vec![Expr::name(URL)], kwargs),
    });
    body.push(Stmt::Expr(
        Expr::name(RESPONSE).attr("raise_for_status").call(vec![]),
    ));
    body.push(Stmt::Return(Expr::name(RESPONSE).attr("json").call(vec![])));
    body
}

fn missing_guard(arg_name: &str, error: Expr) -> Stmt {
    Stmt::If {
        test: Expr::IsNone(Box::new(Expr::name(arg_name))),
        body: vec![Stmt::Raise(error)],
    }
}

fn wire_pairs<'a>(arguments: impl Iterator<Item = &'a ResolvedArgument>) -> Vec<(Expr, Expr)> {
    arguments
        .map(|a| (Expr::str(&a.wire_name), Expr::name(&a.arg_name)))
        .collect()
}

/// Collaborator primitive for a dispatchable verb.
const fn dispatcher(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Post => "_post",
        HttpMethod::Put => "_put",
        HttpMethod::Patch => "_patch",
        HttpMethod::Delete => "_delete",
        _ => "_get",
    }
}

/// Keyword the collaborator takes the body under.
const fn body_keyword(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Json => "json",
        MediaKind::FormUrlEncoded | MediaKind::Multipart => "data",
        MediaKind::Raw => "content",
    }
}

fn operation_docstring(op: &CompiledOperation) -> String {
    let mut doc = String::new();
    let summary = op
        .summary
        .as_deref()
        .map(one_line)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{} {}", op.method, op.path));
    doc.push_str(&summary);

    if let Some(description) = op.description.as_deref().map(str::trim)
        && !description.is_empty()
        && description != summary
    {
        let _ = write!(doc, "\n\n{description}");
    }

    if op.deprecated {
        doc.push_str("\n\nDeprecated: this operation is marked deprecated by the API.");
    }

    if !op.arguments.is_empty() || op.body.is_some() {
        doc.push_str("\n\nArgs:");
        for argument in &op.arguments {
            let _ = write!(doc, "\n    {}: {}", argument.arg_name, argument_line(argument));
        }
        if let Some(body) = &op.body {
            let _ = write!(doc, "\n    {}: {}", body.arg_name, body_line(body));
        }
    }

    doc.push_str("\n\nReturns:\n    Any: The JSON-decoded response body.");

    let has_required_params = op.arguments.iter().any(|a| a.required);
    let has_required_body = op.body.as_ref().is_some_and(|b| b.required);
    doc.push_str("\n\nRaises:");
    if has_required_params {
        doc.push_str("\n    MissingRequiredParameter: If a required argument is None.");
    }
    if has_required_body {
        doc.push_str("\n    MissingRequiredBody: If the request body is None.");
    }
    doc.push_str("\n    HTTPStatusError: If the API responds with a 4xx or 5xx status.");
    doc
}

fn argument_line(argument: &ResolvedArgument) -> String {
    let text = argument
        .description
        .as_deref()
        .map(one_line)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("The '{}' {} parameter.", argument.wire_name, argument.location));
    if argument.arg_name == argument.wire_name {
        text
    } else {
        format!("{text} (sent as '{}')", argument.wire_name)
    }
}

fn body_line(body: &BodyArgument) -> String {
    let text = body
        .description
        .as_deref()
        .map(one_line)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "The request body.".to_string());
    format!("{text} ({})", body.media_type)
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowers the client initializer.
///
/// An explicit `api_base_url` argument wins over the schema-derived URL,
/// even when it is empty; an empty result warns at construction time.
#[must_use]
pub fn lower_init(class_name: &str, base_url: &str, integration_class: &str) -> MethodDef {
    let super_init = Expr::Call {
        func: Box::new(Expr::name("super").call(vec![]).attr("__init__")),
        args: vec![],
        kwargs: vec![
            ("name".to_string(), Expr::name("name")),
            ("integration".to_string(), Expr::name("integration")),
        ],
        splat: Some(KWARGS.to_string()),
    };

    MethodDef {
        name: "__init__".to_string(),
        params: vec![
            Param {
                name: "name".to_string(),
                annotation: Some(PyType::Str),
                default: Some(Expr::str(class_name)),
            },
            Param::optional("integration", PyType::Named(integration_class.to_string())),
            Param::optional("api_base_url", PyType::Str),
        ],
        var_kwargs: true,
        returns: Some(PyType::Named("None".to_string())),
        docstring: None,
        body: vec![
            Stmt::Expr(super_init),
            Stmt::Assign {
                target: "self.api_base_url".to_string(),
                value: Expr::IfElse {
                    body: Box::new(Expr::name("api_base_url")),
                    test: Box::new(Expr::IsNotNone(Box::new(Expr::name("api_base_url")))),
                    orelse: Box::new(Expr::str(base_url)),
                },
            },
            Stmt::If {
                test: Expr::Not(Box::new(Expr::self_attr("api_base_url"))),
                body: vec![Stmt::Warn(Expr::str(format!(
                    "No base URL is known for {class_name}; pass api_base_url explicitly."
                )))],
            },
        ],
    }
}

/// Lowers `list_tools`, which returns the manifest as a static literal.
#[must_use]
pub fn lower_list_tools(entries: &[ToolManifestEntry]) -> MethodDef {
    let tools: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "name": entry.name,
                "description": entry.description,
                "parameters": entry.parameters,
            })
        })
        .collect();

    MethodDef {
        name: LIST_TOOLS.to_string(),
        params: vec![],
        var_kwargs: false,
        returns: Some(PyType::ToolList),
        docstring: Some("Lists the tools available in this application.".to_string()),
        body: vec![Stmt::Return(Expr::Literal(Value::Array(tools)))],
    }
}
