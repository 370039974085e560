//! Schema loading from disk.
//!
//! [`load`] dispatches on the file extension: `.yaml`/`.yml` are parsed as
//! YAML, `.json` as JSON. Anything else is rejected before the file is read.
//!
//! # Examples
//!
//! ```no_run
//! use apigen_schema::load;
//! use std::path::Path;
//!
//! let doc = load(Path::new("openapi.yaml"))?;
//! println!("{} operations", doc.operation_count());
//! # Ok::<(), apigen_core::Error>(())
//! ```

use crate::model::SchemaDocument;
use apigen_core::{Error, Result};
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Serialization format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// JSON (`.json`)
    Json,
}

impl SchemaFormat {
    /// Detects the format from a file extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension,
    /// including none.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_schema::SchemaFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(SchemaFormat::from_path(Path::new("a.YML")).unwrap(), SchemaFormat::Yaml);
    /// assert!(SchemaFormat::from_path(Path::new("a.txt")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Returns the canonical name of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Loads an OpenAPI document from `path`.
///
/// # Errors
///
/// - [`Error::FileNotFound`] if the path does not exist
/// - [`Error::UnsupportedFormat`] if the extension is not yaml/yml/json
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::SchemaParseError`] if the content is malformed or its root is
///   not a mapping
pub fn load(path: &Path) -> Result<SchemaDocument> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = SchemaFormat::from_path(path)?;

    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), format = format.as_str(), "loading schema");

    parse_str(&content, format, path)
}

/// Parses document text that has already been read.
///
/// `origin` is only used to label errors.
///
/// # Errors
///
/// Returns [`Error::SchemaParseError`] if the content is malformed or its
/// root is not a mapping.
///
/// # Examples
///
/// ```
/// use apigen_schema::{SchemaFormat, parse_str};
/// use std::path::Path;
///
/// let doc = parse_str(
///     "openapi: 3.0.0\ninfo: {title: Demo, version: '1'}\npaths: {}\n",
///     SchemaFormat::Yaml,
///     Path::new("inline.yaml"),
/// )?;
/// assert_eq!(doc.info.title.as_deref(), Some("Demo"));
///
/// let err = parse_str("[1, 2]", SchemaFormat::Json, Path::new("list.json")).unwrap_err();
/// assert!(err.is_parse_error());
/// # Ok::<(), apigen_core::Error>(())
/// ```
pub fn parse_str(content: &str, format: SchemaFormat, origin: &Path) -> Result<SchemaDocument> {
    let root = match format {
        SchemaFormat::Json => {
            serde_json::from_str::<Value>(content).map_err(|e| Error::SchemaParseError {
                path: origin.to_path_buf(),
                message: e.to_string(),
                source: Some(Box::new(e)),
            })?
        }
        SchemaFormat::Yaml => {
            let yaml = serde_yaml::from_str::<serde_yaml::Value>(content).map_err(|e| {
                Error::SchemaParseError {
                    path: origin.to_path_buf(),
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                }
            })?;
            yaml_to_json(yaml)
        }
    };

    if !root.is_object() {
        return Err(Error::SchemaParseError {
            path: origin.to_path_buf(),
            message: "document root is not a mapping".to_string(),
            source: None,
        });
    }

    Ok(SchemaDocument::from_value(root))
}

/// Converts a YAML tree to JSON.
///
/// Non-string mapping keys (response codes such as `200:` are the usual
/// case) are stringified; tags are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SchemaFormat::from_path(Path::new("x.yaml")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            SchemaFormat::from_path(Path::new("x.JSON")).unwrap(),
            SchemaFormat::Json
        );
        let err = SchemaFormat::from_path(Path::new("x")).unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_yaml_numeric_keys_become_strings() {
        let doc = "paths:\n  /a:\n    get:\n      responses:\n        200:\n          description: ok\n";
        let yaml: serde_yaml::Value = serde_yaml::from_str(doc).unwrap();
        let json = yaml_to_json(yaml);
        assert_eq!(
            json["paths"]["/a"]["get"]["responses"]["200"]["description"],
            json!("ok")
        );
    }

    #[test]
    fn test_yaml_preserves_key_order() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("b: 1\na: 2\nc: 3\n").unwrap();
        let json = yaml_to_json(yaml);
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_str("{\"openapi\": ", SchemaFormat::Json, Path::new("bad.json"))
            .unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = parse_str("paths: [unclosed", SchemaFormat::Yaml, Path::new("bad.yaml"))
            .unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        let err = parse_str("just text", SchemaFormat::Yaml, Path::new("t.yaml")).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("not a mapping"));
    }
}
