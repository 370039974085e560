//! Schema-node to [`TypeTag`] resolution.
//!
//! Local `$ref`s are followed before a node is inspected. Nullable unions
//! (`anyOf`/`oneOf` with a `null` member, or an OpenAPI 3.1 `type` array
//! containing `"null"`) resolve to their single concrete member. A union
//! with no concrete member, or with members of different types, is
//! *undetermined* and maps to `None`.

use apigen_core::TypeTag;
use apigen_schema::SchemaDocument;
use serde_json::Value;

/// Nesting limit for unions and single-member `allOf` chains.
const MAX_DEPTH: usize = 16;

/// Where a schema node is used; decides the fallback for untyped nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeContext {
    /// Parameters and nested properties: untyped means `string`
    Scalar,
    /// Request bodies: untyped means `object`
    Body,
}

impl TypeContext {
    const fn fallback(self) -> TypeTag {
        match self {
            Self::Scalar => TypeTag::String,
            Self::Body => TypeTag::Object,
        }
    }
}

/// Resolves schema nodes against one document.
///
/// # Examples
///
/// ```
/// use apigen_codegen::typemap::{TypeContext, TypeMapper};
/// use apigen_core::TypeTag;
/// use apigen_schema::SchemaDocument;
/// use serde_json::json;
///
/// let doc = SchemaDocument::from_value(json!({}));
/// let mapper = TypeMapper::new(&doc);
///
/// let nullable = json!({"anyOf": [{"type": "null"}, {"type": "integer"}]});
/// assert_eq!(mapper.map(Some(&nullable), TypeContext::Scalar), Some(TypeTag::Integer));
///
/// let only_null = json!({"anyOf": [{"type": "null"}]});
/// assert_eq!(mapper.map(Some(&only_null), TypeContext::Scalar), None);
///
/// assert_eq!(mapper.map(None, TypeContext::Body), Some(TypeTag::Object));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    doc: &'a SchemaDocument,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper for `doc`.
    #[must_use]
    pub const fn new(doc: &'a SchemaDocument) -> Self {
        Self { doc }
    }

    /// Maps a schema node to a type tag. `None` means undetermined.
    #[must_use]
    pub fn map(&self, schema: Option<&'a Value>, context: TypeContext) -> Option<TypeTag> {
        match schema {
            Some(node) => self.map_node(node, context, 0),
            None => Some(context.fallback()),
        }
    }

    /// Maps the `items` schema of an array node, if there is one.
    #[must_use]
    pub fn item_type(&self, schema: Option<&'a Value>) -> Option<TypeTag> {
        let node = self.concrete(schema?)?;
        let items = node.get("items")?;
        self.map_node(items, TypeContext::Scalar, 0)
    }

    /// Follows `$ref`s and nullable wrappers down to the node that carries
    /// the actual type information.
    ///
    /// Returns `None` for unresolvable references and undetermined unions.
    #[must_use]
    pub fn concrete(&self, schema: &'a Value) -> Option<&'a Value> {
        self.concrete_at(schema, 0)
    }

    fn concrete_at(&self, schema: &'a Value, depth: usize) -> Option<&'a Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        let node = self.doc.resolve(schema).ok()?;
        if node.get("type").is_some() {
            return Some(node);
        }
        if let Some(variants) = union_variants(node) {
            let mut concrete = variants.iter().filter(|v| !self.is_null_variant(v));
            return match (concrete.next(), concrete.next()) {
                (Some(only), None) => self.concrete_at(only, depth + 1),
                _ => None,
            };
        }
        if let Some([only]) = node.get("allOf").and_then(Value::as_array).map(Vec::as_slice) {
            return self.concrete_at(only, depth + 1);
        }
        Some(node)
    }

    fn map_node(&self, schema: &'a Value, context: TypeContext, depth: usize) -> Option<TypeTag> {
        if depth > MAX_DEPTH {
            return None;
        }
        let Ok(node) = self.doc.resolve(schema) else {
            return Some(TypeTag::Object);
        };
        let Some(object) = node.as_object() else {
            return Some(context.fallback());
        };

        if let Some(keyword) = object.get("type") {
            return match keyword {
                Value::String(name) => TypeTag::from_openapi(name),
                Value::Array(names) => single_concrete_type(names),
                _ => Some(context.fallback()),
            };
        }

        if let Some(variants) = union_variants(node) {
            return self.map_union(variants, context, depth);
        }

        if let Some(members) = object.get("allOf").and_then(Value::as_array) {
            return match members.as_slice() {
                [only] => self.map_node(only, context, depth + 1),
                _ => Some(TypeTag::Object),
            };
        }

        if object.contains_key("properties") || object.contains_key("additionalProperties") {
            return Some(TypeTag::Object);
        }
        if object.contains_key("items") {
            return Some(TypeTag::Array);
        }
        Some(context.fallback())
    }

    fn map_union(&self, variants: &'a [Value], context: TypeContext, depth: usize) -> Option<TypeTag> {
        let mut found: Option<TypeTag> = None;
        for variant in variants {
            if self.is_null_variant(variant) {
                continue;
            }
            let tag = self.map_node(variant, context, depth + 1)?;
            match found {
                None => found = Some(tag),
                Some(existing) if existing == tag => {}
                Some(_) => return None,
            }
        }
        found
    }

    fn is_null_variant(&self, variant: &'a Value) -> bool {
        let Ok(node) = self.doc.resolve(variant) else {
            return false;
        };
        match node.get("type") {
            Some(Value::String(name)) => name == "null",
            Some(Value::Array(names)) => {
                !names.is_empty() && names.iter().all(|n| n.as_str() == Some("null"))
            }
            _ => false,
        }
    }
}

fn union_variants(node: &Value) -> Option<&[Value]> {
    node.get("anyOf")
        .or_else(|| node.get("oneOf"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

/// `type: ["string", "null"]` resolves to `string`; more than one distinct
/// non-null member is undetermined.
fn single_concrete_type(names: &[Value]) -> Option<TypeTag> {
    let mut tags = names
        .iter()
        .filter_map(Value::as_str)
        .filter_map(TypeTag::from_openapi);
    let first = tags.next()?;
    tags.all(|t| t == first).then_some(first)
}
