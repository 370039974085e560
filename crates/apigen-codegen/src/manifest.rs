//! Tool manifest entries.
//!
//! A manifest entry describes one generated method for a calling agent:
//! its name, a description, and a JSON-Schema object over the method's
//! argument names. Arguments whose type is undetermined are left out of the
//! schema (and of its `required` list) but still exist on the method.

use crate::compiler::{BodyArgument, ResolvedArgument};
use crate::typemap::{TypeContext, TypeMapper};
use apigen_core::TypeTag;
use apigen_schema::Operation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;

/// How deep nested object properties of a request body are described.
const MAX_NESTING: usize = 3;

/// Description used for a body that declares none.
const DEFAULT_BODY_DESCRIPTION: &str = "The request body.";

/// One entry of the list returned by the generated `list_tools` method.
///
/// # Examples
///
/// ```
/// use apigen_codegen::ToolManifestEntry;
/// use serde_json::json;
///
/// let entry = ToolManifestEntry {
///     name: "list_pets".to_string(),
///     description: "List all pets".to_string(),
///     parameters: json!({"type": "object", "properties": {}}),
/// };
/// assert!(entry.required().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolManifestEntry {
    /// Tool name, equal to the generated method name
    pub name: String,
    /// Summary, description, or the method name as a last resort
    pub description: String,
    /// JSON-Schema object describing the arguments
    pub parameters: Value,
}

impl ToolManifestEntry {
    /// Names listed under `parameters.required`.
    #[must_use]
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Property keys under `parameters.properties`, in order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Builds the manifest entry for a compiled operation.
pub(crate) fn build_entry<'a>(
    types: &TypeMapper<'a>,
    function_name: &str,
    operation: &Operation,
    arguments: &'a [ResolvedArgument],
    body: Option<&'a BodyArgument>,
) -> ToolManifestEntry {
    let mut properties = Map::new();
    let mut required = BTreeSet::new();

    for argument in arguments {
        let Some(tag) = argument.type_tag else {
            continue;
        };
        let description = argument.description.clone().unwrap_or_else(|| {
            format!("The '{}' {} parameter.", argument.wire_name, argument.location)
        });
        let property = property_schema(
            types,
            tag,
            argument.item_type,
            argument.schema.as_ref(),
            &description,
            0,
        );
        properties.insert(argument.arg_name.clone(), property);
        if argument.required {
            required.insert(argument.arg_name.clone());
        }
    }

    if let Some(body) = body
        && let Some(tag) = body.type_tag
    {
        let description = body
            .description
            .as_deref()
            .unwrap_or(DEFAULT_BODY_DESCRIPTION);
        let property = property_schema(
            types,
            tag,
            body.item_type,
            body.schema.as_ref(),
            description,
            0,
        );
        properties.insert(body.arg_name.clone(), property);
        if body.required {
            required.insert(body.arg_name.clone());
        }
    }

    let mut parameters = Map::new();
    parameters.insert("type".to_string(), json!("object"));
    parameters.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        parameters.insert(
            "required".to_string(),
            Value::Array(required.into_iter().map(Value::String).collect()),
        );
    }

    let description = non_blank(operation.summary.as_deref())
        .or_else(|| non_blank(operation.description.as_deref()))
        .unwrap_or(function_name)
        .to_string();

    ToolManifestEntry {
        name: function_name.to_string(),
        description,
        parameters: Value::Object(parameters),
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn property_schema<'a>(
    types: &TypeMapper<'a>,
    tag: TypeTag,
    item_type: Option<TypeTag>,
    schema: Option<&'a Value>,
    description: &str,
    depth: usize,
) -> Value {
    let mut property = Map::new();
    property.insert("type".to_string(), json!(tag.as_str()));
    if !description.is_empty() {
        property.insert("description".to_string(), json!(description));
    }

    let node = schema.and_then(|s| types.concrete(s));
    if let Some(node) = node {
        if let Some(values) = node.get("enum").filter(|v| v.is_array()) {
            property.insert("enum".to_string(), values.clone());
        }
        if let Some(default) = node.get("default") {
            property.insert("default".to_string(), default.clone());
        }
    }

    if tag == TypeTag::Array
        && let Some(item) = item_type
    {
        property.insert("items".to_string(), json!({"type": item.as_str()}));
    }

    if tag == TypeTag::Object
        && depth < MAX_NESTING
        && let Some(fields) = node.and_then(|n| n.get("properties")).and_then(Value::as_object)
    {
        let mut nested = Map::new();
        for (field, field_schema) in fields {
            let Some(field_tag) = types.map(Some(field_schema), TypeContext::Scalar) else {
                continue;
            };
            let field_description = types
                .concrete(field_schema)
                .and_then(|n| n.get("description"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            nested.insert(
                field.clone(),
                property_schema(
                    types,
                    field_tag,
                    types.item_type(Some(field_schema)),
                    Some(field_schema),
                    field_description,
                    depth + 1,
                ),
            );
        }

        let nested_required: BTreeSet<&str> = node
            .and_then(|n| n.get("required"))
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|name| nested.contains_key(*name))
                    .collect()
            })
            .unwrap_or_default();

        property.insert("properties".to_string(), Value::Object(nested));
        if !nested_required.is_empty() {
            property.insert("required".to_string(), json!(nested_required));
        }
    }

    Value::Object(property)
}
