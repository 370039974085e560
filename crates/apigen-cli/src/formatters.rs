//! Output formatters for CLI commands.
//!
//! Provides consistent formatting across all CLI commands for JSON, text, and pretty output modes.

use anyhow::Result;
use apigen_core::cli::OutputFormat;
use colored::Colorize;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Arguments
///
/// * `data` - The data to format (must be serializable)
/// * `format` - The output format (Json, Text, Pretty)
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use apigen_cli::formatters::format_output;
/// use apigen_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     class_name: String,
///     methods: usize,
/// }
///
/// let summary = Summary {
///     class_name: "PetStore".to_string(),
///     methods: 4,
/// };
///
/// let output = format_output(&summary, OutputFormat::Json)?;
/// assert!(output.contains("\"class_name\""));
///
/// let output = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(output, "class_name=PetStore\nmethods=4");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON.
    ///
    /// Uses pretty-printing with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Format data as `key=value` lines.
    ///
    /// Nested keys are joined with `.`, array elements are indexed as
    /// `key[i]`. Suitable for `grep` and `cut` in scripts.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, "", &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, prefix: &str, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, item) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    flatten(item, &path, lines);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (index, item) in items.iter().enumerate() {
                    flatten(item, &format!("{prefix}[{index}]"), lines);
                }
            }
            scalar => {
                let rendered = match scalar {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if prefix.is_empty() {
                    lines.push(rendered);
                } else {
                    lines.push(format!("{prefix}={rendered}"));
                }
            }
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Format data as colorized, human-readable output.
    ///
    /// Uses colors and formatting for better terminal readability.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        format_value(&value, 0, &mut out);
        Ok(out)
    }

    /// Recursively format a JSON value with colors and indentation.
    fn format_value(value: &Value, indent: usize, out: &mut String) {
        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => out.push_str(&"null".dimmed().to_string()),
            Value::Bool(b) => out.push_str(&b.to_string().yellow().to_string()),
            Value::Number(n) => out.push_str(&n.to_string().cyan().to_string()),
            Value::String(s) => {
                out.push('"');
                out.push_str(&s.green().to_string());
                out.push('"');
            }
            Value::Array(arr) if arr.is_empty() => out.push_str("[]"),
            Value::Object(obj) if obj.is_empty() => out.push_str("{}"),
            Value::Array(arr) => {
                out.push_str("[\n");
                for (i, item) in arr.iter().enumerate() {
                    out.push_str(&next_indent_str);
                    format_value(item, indent + 1, out);
                    if i + 1 < arr.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&indent_str);
                out.push(']');
            }
            Value::Object(obj) => {
                out.push_str("{\n");
                for (i, (key, item)) in obj.iter().enumerate() {
                    out.push_str(&next_indent_str);
                    out.push('"');
                    out.push_str(&key.blue().bold().to_string());
                    out.push_str("\": ");
                    format_value(item, indent + 1, out);
                    if i + 1 < obj.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&indent_str);
                out.push('}');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_format() {
        let data = json!({"name": "list_pets", "required": ["limit"]});
        let output = format_output(&data, OutputFormat::Json).unwrap();
        assert_eq!(
            output,
            "{\n  \"name\": \"list_pets\",\n  \"required\": [\n    \"limit\"\n  ]\n}"
        );
    }

    #[test]
    fn test_text_format_flattens() {
        let data = json!({
            "class_name": "PetStore",
            "operations": [{"name": "a", "args": []}, {"name": "b", "body": null}],
            "meta": {"deprecated": false}
        });
        let output = format_output(&data, OutputFormat::Text).unwrap();
        assert_eq!(
            output,
            "class_name=PetStore\n\
             operations[0].name=a\n\
             operations[0].args=[]\n\
             operations[1].name=b\n\
             operations[1].body=\n\
             meta.deprecated=false"
        );
    }

    #[test]
    fn test_text_format_scalar_root() {
        let output = format_output(&"plain", OutputFormat::Text).unwrap();
        assert_eq!(output, "plain");
    }

    #[test]
    fn test_pretty_format_without_colors() {
        colored::control::set_override(false);
        let data = json!({"name": "x", "tags": [1, true], "extra": null, "empty": {}});
        let output = format_output(&data, OutputFormat::Pretty).unwrap();
        assert_eq!(
            output,
            "{\n  \"name\": \"x\",\n  \"tags\": [\n    1,\n    true\n  ],\n  \"extra\": null,\n  \"empty\": {}\n}"
        );
    }
}
